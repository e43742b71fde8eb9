//! The vehicle actor: one thread per vehicle.
//!
//! ```text
//! loop:
//!   AT_PORT  → TOLL      acquire a booth at the current port, hold it for the toll delay
//!   TOLL     → QUEUED    booth released, waiting area reached
//!   QUEUED   → ABOARD    FerryState::board (blocks until admitted)
//!   ABOARD   → AT_PORT'  FerryState::await_arrival (blocks until landed)
//!   legs == 2 → COMPLETED, report and exit
//!   otherwise → DWELLING for the dwell delay, then loop
//! ```
//!
//! Every blocking point returns early once the stop signal is raised; the
//! actor then marks itself cancelled and exits.

use ferry_core::{DelayRange, TimeScale, VehicleRng, VehicleSpec};
use ferry_dock::{Admission, Arrival, FerryState, Sleep, StopSignal, TerminationDetector, TollPlaza};
use tracing::debug;

/// How a vehicle actor ended.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum VehicleExit {
    Completed,
    Cancelled,
}

/// Delays a vehicle samples during its lifecycle.
#[derive(Copy, Clone, Debug)]
pub(crate) struct VehicleTiming {
    pub toll:  DelayRange,
    pub dwell: DelayRange,
    pub scale: TimeScale,
}

pub(crate) struct VehicleActor<'a> {
    pub spec:     VehicleSpec,
    pub rng:      VehicleRng,
    pub timing:   VehicleTiming,
    pub state:    &'a FerryState,
    pub tolls:    &'a TollPlaza,
    pub detector: &'a TerminationDetector,
    pub stop:     &'a StopSignal,
}

impl VehicleActor<'_> {
    pub fn run(mut self) -> VehicleExit {
        let id = self.spec.id;
        let label = self.spec.label();

        loop {
            // ── Toll ──────────────────────────────────────────────────────
            let port = self.state.enter_toll(id);
            {
                let Some(permit) = self.tolls.gate(port).acquire(id) else {
                    return self.cancel(&label);
                };
                debug!(vehicle = %label, %port, booth = permit.booth(), "at toll");
                let delay = self.timing.toll.sample(&mut self.rng);
                if self.stop.sleep(self.timing.scale.to_duration(delay)) == Sleep::Interrupted {
                    return self.cancel(&label);
                }
            }

            // ── Queue and board ───────────────────────────────────────────
            self.state.enqueue(id);
            if let Admission::Cancelled = self.state.board(id) {
                return self.cancel(&label);
            }

            // ── Crossing ──────────────────────────────────────────────────
            let legs = match self.state.await_arrival(id) {
                Arrival::Landed { legs, .. } => legs,
                Arrival::Cancelled => return self.cancel(&label),
            };

            if legs >= 2 {
                let done = self.state.complete(id, self.detector);
                tracing::info!(
                    vehicle = %label,
                    completed = done,
                    total = self.detector.total(),
                    "round trip complete",
                );
                return VehicleExit::Completed;
            }

            // ── Far side ──────────────────────────────────────────────────
            self.state.begin_dwell(id);
            let dwell = self.timing.dwell.sample(&mut self.rng);
            debug!(vehicle = %label, units = dwell, "dwelling");
            if self.stop.sleep(self.timing.scale.to_duration(dwell)) == Sleep::Interrupted {
                return self.cancel(&label);
            }
        }
    }

    fn cancel(&self, label: &str) -> VehicleExit {
        self.state.cancel(self.spec.id);
        debug!(vehicle = %label, "cancelled");
        VehicleExit::Cancelled
    }
}
