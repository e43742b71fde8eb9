//! Fluent builder for constructing a [`Sim`].

use std::sync::Arc;

use ferry_core::{FerryConfig, SimRng, VehicleSpec};
use ferry_dock::{FerryState, StopListener, StopSignal, TerminationDetector, TollPlaza};

use crate::{Sim, SimResult};

/// Fluent builder for [`Sim`].
///
/// # Optional inputs (have defaults)
///
/// | Method                | Default                                  |
/// |-----------------------|------------------------------------------|
/// | `.stop_signal(s)`     | A fresh `StopSignal`                     |
///
/// # Example
///
/// ```rust,ignore
/// let stop = StopSignal::new();
/// let sim = SimBuilder::new(FerryConfig::default())
///     .stop_signal(stop.clone())
///     .build()?;
/// let outcome = sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder {
    config: FerryConfig,
    stop:   Option<StopSignal>,
}

impl SimBuilder {
    pub fn new(config: FerryConfig) -> Self {
        Self { config, stop: None }
    }

    /// Share an externally owned stop signal (e.g. the CLI's quit command).
    pub fn stop_signal(mut self, stop: StopSignal) -> Self {
        self.stop = Some(stop);
        self
    }

    /// Validate the configuration, resolve the population, and wire the
    /// shared primitives to the stop signal.
    pub fn build(self) -> SimResult<Sim> {
        self.config.validate()?;

        let mut rng = SimRng::new(self.config.seed);
        let population: Vec<VehicleSpec> = self.config.population(&mut rng);
        let ferry_rng = rng.child(1);

        let stop = self.stop.unwrap_or_default();
        let state = Arc::new(FerryState::new(
            &population,
            self.config.capacity,
            self.config.home,
            self.config.fairness_bound,
            stop.clone(),
        ));
        let tolls = Arc::new(TollPlaza::new(self.config.toll_permits, &stop));

        let listener: Arc<dyn StopListener> = state.clone();
        stop.register(&listener);
        let listener: Arc<dyn StopListener> = tolls.clone();
        stop.register(&listener);

        tracing::debug!(
            vehicles = population.len(),
            capacity = self.config.capacity,
            seed = self.config.seed,
            "simulation built",
        );

        Ok(Sim {
            detector: TerminationDetector::new(population.len()),
            config: self.config,
            population,
            ferry_rng,
            state,
            tolls,
            stop,
        })
    }
}
