//! The `Sim` struct and its run loop.

use std::sync::Arc;
use std::thread::{self, ScopedJoinHandle};
use std::time::{Duration, Instant};

use ferry_core::{FerryConfig, SimRng, TimeScale, VehicleRng, VehicleSpec};
use ferry_dock::{FerryState, StopCause, StopSignal, TerminationDetector, TollPlaza};

use crate::ferry::{FerryActor, FerryExit, FerryTiming};
use crate::vehicle::{VehicleActor, VehicleExit, VehicleTiming};
use crate::{SimError, SimObserver, SimOutcome, SimResult, SimSnapshot, VehicleReport};

/// Longest the observer loop sleeps between trip-log drains.
const MAX_POLL: Duration = Duration::from_millis(50);

// ── Sim ───────────────────────────────────────────────────────────────────────

/// A ready-to-run simulation.
///
/// Holds the validated configuration, the resolved population and the shared
/// primitives every actor will borrow.  Create via
/// [`SimBuilder`][crate::SimBuilder]; consume with [`Sim::run`].
pub struct Sim {
    pub(crate) config:     FerryConfig,
    pub(crate) population: Vec<VehicleSpec>,
    pub(crate) ferry_rng:  SimRng,
    pub(crate) state:      Arc<FerryState>,
    pub(crate) tolls:      Arc<TollPlaza>,
    pub(crate) detector:   TerminationDetector,
    pub(crate) stop:       StopSignal,
}

impl Sim {
    pub fn config(&self) -> &FerryConfig {
        &self.config
    }

    /// Every vehicle, in id order.
    pub fn population(&self) -> &[VehicleSpec] {
        &self.population
    }

    /// A handle that stops the run from any thread.
    pub fn stop_handle(&self) -> StopSignal {
        self.stop.clone()
    }

    /// The current state, copied out of the critical section.
    pub fn snapshot(&self) -> SimSnapshot {
        snapshot(&self.state, &self.tolls, &self.detector, self.config.time_scale)
    }

    /// Spawn one thread per vehicle plus the ferry, drive `observer` on the
    /// calling thread until they all exit, and report what happened.
    ///
    /// Returns once the ferry has halted at home with every vehicle done, or
    /// once every actor has reacted to the stop signal.
    pub fn run<O: SimObserver>(self, observer: &mut O) -> SimResult<SimOutcome> {
        let Sim { config, population, ferry_rng, state, tolls, detector, stop } = self;
        let scale = config.time_scale;
        let snapshot_every = scale.to_duration(config.snapshot_interval);
        let poll = snapshot_every.min(MAX_POLL);

        observer.on_start(&config, &population);
        tracing::info!(
            vehicles = population.len(),
            capacity = config.capacity,
            home = %config.home,
            "simulation started",
        );

        let state_ref: &FerryState = &state;
        let tolls_ref: &TollPlaza = &tolls;
        let detector_ref = &detector;
        let stop_ref = &stop;

        thread::scope(|scope| -> SimResult<()> {
            // ── Spawn actors ──────────────────────────────────────────────
            let ferry = FerryActor {
                rng: ferry_rng,
                timing: FerryTiming {
                    transit:   config.transit,
                    dock_wait: config.dock_wait,
                    scale,
                    max_trips: config.max_trips,
                },
                state: state_ref,
                detector: detector_ref,
                stop: stop_ref,
            };
            let ferry = thread::Builder::new().name("ferry".into()).spawn_scoped(scope, move || {
                let _guard = PanicGuard(stop_ref);
                ferry.run()
            })?;

            let timing = VehicleTiming { toll: config.toll_delay, dwell: config.dwell, scale };
            let mut vehicles: Vec<(String, ScopedJoinHandle<'_, VehicleExit>)> =
                Vec::with_capacity(population.len());
            for &spec in &population {
                let actor = VehicleActor {
                    spec,
                    rng: VehicleRng::new(config.seed, spec.id),
                    timing,
                    state: state_ref,
                    tolls: tolls_ref,
                    detector: detector_ref,
                    stop: stop_ref,
                };
                let label = spec.label();
                let spawned = thread::Builder::new().name(label.clone()).spawn_scoped(scope, move || {
                    let _guard = PanicGuard(stop_ref);
                    actor.run()
                });
                match spawned {
                    Ok(handle) => vehicles.push((label, handle)),
                    Err(e) => {
                        stop_ref.raise(StopCause::ActorFailed);
                        return Err(e.into());
                    }
                }
            }

            // ── Observe until every actor has exited ──────────────────────
            let mut cursor = 0;
            let mut next_snapshot = Instant::now();
            loop {
                let finished = ferry.is_finished() && vehicles.iter().all(|(_, h)| h.is_finished());

                for trip in state_ref.trips().since(cursor) {
                    observer.on_trip(&trip);
                    cursor += 1;
                }
                if finished {
                    break;
                }

                let now = Instant::now();
                if now >= next_snapshot {
                    observer.on_snapshot(&snapshot(state_ref, tolls_ref, detector_ref, scale));
                    next_snapshot = now + snapshot_every;
                }
                thread::sleep(poll);
            }

            // ── Join ──────────────────────────────────────────────────────
            let mut first_panic = None;
            match ferry.join() {
                Ok(FerryExit::Halted) => tracing::debug!("ferry actor halted"),
                Ok(FerryExit::Stopped) => tracing::debug!("ferry actor stopped"),
                Err(_) => first_panic = Some("ferry".to_string()),
            }
            for (label, handle) in vehicles {
                if handle.join().is_err() && first_panic.is_none() {
                    first_panic = Some(label);
                }
            }
            match first_panic {
                Some(actor) => Err(SimError::ActorPanicked { actor }),
                None => Ok(()),
            }
        })?;

        let last = snapshot(&state, &tolls, &detector, scale);
        observer.on_snapshot(&last);

        let vehicles: Vec<VehicleReport> = state
            .vehicle_records()
            .iter()
            .map(|r| VehicleReport::from_record(r, scale))
            .collect();
        let outcome = SimOutcome {
            trips:      state.trips().all(),
            completed:  detector.completed(),
            total:      detector.total(),
            stop_cause: stop.cause(),
            starvation: last.ferry.starvation.clone(),
            violations: last.ferry.violations,
            elapsed:    last.elapsed,
            last:       last.ferry,
            vehicles,
        };

        tracing::info!(
            trips = outcome.trips.len(),
            completed = outcome.completed,
            total = outcome.total,
            stop = ?outcome.stop_cause,
            "simulation finished",
        );
        observer.on_end(&outcome);
        Ok(outcome)
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn snapshot(
    state:    &FerryState,
    tolls:    &TollPlaza,
    detector: &TerminationDetector,
    scale:    TimeScale,
) -> SimSnapshot {
    SimSnapshot {
        ferry:     state.snapshot(),
        booths:    tolls.occupancy(),
        elapsed:   scale.to_units(state.epoch().elapsed()),
        completed: detector.completed(),
        total:     detector.total(),
    }
}

/// Raises the stop signal if an actor thread unwinds, so the remaining
/// actors do not wait forever on a peer that is gone.
pub(crate) struct PanicGuard<'a>(pub(crate) &'a StopSignal);

impl Drop for PanicGuard<'_> {
    fn drop(&mut self) {
        if thread::panicking() {
            self.0.raise(StopCause::ActorFailed);
        }
    }
}
