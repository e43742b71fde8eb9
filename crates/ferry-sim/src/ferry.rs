//! The ferry actor: load, depart, cross, arrive, repeat.
//!
//! ```text
//! loop:
//!   ① Sample   draw this cycle's transit time
//!   ② Dock     FerryState::await_departure until a departure condition holds;
//!              in the same critical section either freeze admissions and
//!              log the trip, or report that max_trips were already made
//!   ③ Cross    sleep the sampled transit time (no lock held)
//!   ④ Arrive   flip side, release everyone aboard
//! ```
//!
//! The actor halts when every vehicle is done and it is docked at home.  A
//! stop signal at any point lands the ferry in place and cancels the
//! vehicles still aboard.

use std::time::Instant;

use ferry_core::{DelayRange, SimRng, TimeScale};
use ferry_dock::{DepartureTerms, DockDecision, FerryState, Sleep, StopCause, StopSignal, TerminationDetector};
use tracing::{info, warn};

/// How the ferry actor ended.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum FerryExit {
    /// Every vehicle done, ferry docked at home.
    Halted,
    /// The stop signal was raised.
    Stopped,
}

#[derive(Copy, Clone, Debug)]
pub(crate) struct FerryTiming {
    pub transit:   DelayRange,
    pub dock_wait: f64,
    pub scale:     TimeScale,
    pub max_trips: Option<u32>,
}

pub(crate) struct FerryActor<'a> {
    pub rng:      SimRng,
    pub timing:   FerryTiming,
    pub state:    &'a FerryState,
    pub detector: &'a TerminationDetector,
    pub stop:     &'a StopSignal,
}

impl FerryActor<'_> {
    pub fn run(mut self) -> FerryExit {
        loop {
            let terms = DepartureTerms {
                deadline:  Instant::now() + self.timing.scale.to_duration(self.timing.dock_wait),
                duration:  self.timing.transit.sample_sim(&mut self.rng),
                max_trips: self.timing.max_trips,
            };
            let trip = match self.state.await_departure(terms, self.detector) {
                DockDecision::Depart(trip) => trip,
                DockDecision::Halt => {
                    info!(port = %self.state.home(), "all vehicles done, ferry halted");
                    return FerryExit::Halted;
                }
                DockDecision::TripLimit => {
                    info!(departures = self.state.trips().len(), "trip limit reached");
                    self.stop.raise(StopCause::TripLimit);
                    return self.shutdown();
                }
                DockDecision::Stopped => return self.shutdown(),
            };

            info!(
                trip = trip.id.0,
                direction = %trip.direction,
                reason = trip.reason.as_str(),
                vehicles = trip.vehicles.len(),
                load = trip.capacity_used,
                capacity = self.state.capacity(),
                "departed",
            );

            if self.stop.sleep(self.timing.scale.to_duration(trip.duration)) == Sleep::Interrupted {
                return self.shutdown();
            }

            let (port, released) = self.state.arrive();
            info!(trip = trip.id.0, %port, unloaded = released.len(), "arrived");
        }
    }

    fn shutdown(&self) -> FerryExit {
        let aboard = self.state.shutdown();
        warn!(
            cause = ?self.stop.cause(),
            cancelled_aboard = aboard,
            "ferry stopped",
        );
        FerryExit::Stopped
    }
}
