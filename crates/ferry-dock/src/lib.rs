//! `ferry-dock` — the synchronization core of the ferry simulation.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                     |
//! |-----------------|--------------------------------------------------------------|
//! | [`stop`]        | `StopSignal` (global cancellation), `StopListener`, `StopCause` |
//! | [`toll`]        | `TollGate`, `TollPlaza`, `TollPermit` (per-port booth pool)  |
//! | [`state`]       | `FerryState`, the single critical section over the ferry     |
//! | [`termination`] | `TerminationDetector` (round-trip completion count)          |
//! | [`trip`]        | `TripRecord`, `TripLog`, `DepartureReason`                   |
//! | [`snapshot`]    | `FerrySnapshot`, `VehicleView`, `VehiclePhase`               |
//!
//! # Locking discipline
//!
//! Every admission, departure decision, arrival and vehicle phase change
//! happens inside the one mutex owned by [`FerryState`].  Waits for a state
//! change block on the condition variable paired with that mutex and
//! re-check their predicate on wake, so check-then-act is always atomic.
//!
//! Toll booths have their own lock and never nest with the ferry lock.  The
//! trip log's lock is only ever taken *inside* the ferry lock (or alone by
//! readers), so lock order is fixed and deadlock-free.
//!
//! Nobody holds a lock while sleeping through a simulated delay.

pub mod snapshot;
pub mod state;
pub mod stop;
pub mod termination;
pub mod toll;
pub mod trip;

#[cfg(test)]
mod tests;

pub use snapshot::{FerrySnapshot, LegTimes, StarvationFlag, Timeline, VehiclePhase, VehicleRecord, VehicleView, Violations};
pub use state::{Admission, Arrival, DepartureTerms, DockDecision, FerryState};
pub use stop::{Sleep, StopCause, StopListener, StopSignal};
pub use termination::TerminationDetector;
pub use toll::{TollGate, TollPermit, TollPlaza};
pub use trip::{DepartureReason, TripLog, TripRecord};

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Lock `mutex`, recovering the guard if another thread panicked while
/// holding it.  Every critical section in this crate finishes its update
/// before calling anything that can panic, so the data is still consistent.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
