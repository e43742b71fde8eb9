//! Simulation observer trait for progress reporting and data collection.

use ferry_core::{FerryConfig, VehicleSpec};
use ferry_dock::TripRecord;

use crate::{SimOutcome, SimSnapshot};

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] on the calling thread
/// while the actors run on their own threads.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.  Observers only ever see copies; nothing
/// they do can influence a boarding or departure decision.
///
/// # Example: departure printer
///
/// ```rust,ignore
/// struct TripPrinter;
///
/// impl SimObserver for TripPrinter {
///     fn on_trip(&mut self, trip: &TripRecord) {
///         println!("trip {}: {} vehicles", trip.id.0, trip.vehicles.len());
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called once before any actor starts.
    fn on_start(&mut self, _config: &FerryConfig, _population: &[VehicleSpec]) {}

    /// Called once per departure, in departure order.
    fn on_trip(&mut self, _trip: &TripRecord) {}

    /// Called roughly every `config.snapshot_interval` delay units, and once
    /// more after every actor has exited.
    fn on_snapshot(&mut self, _snapshot: &SimSnapshot) {}

    /// Called once after every actor has exited and every trip was delivered.
    fn on_end(&mut self, _outcome: &SimOutcome) {}
}

/// A [`SimObserver`] that does nothing.  Use when you need to call `run` but
/// don't want progress callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}

/// Fan every callback out to two observers, first `A` then `B`.
impl<A: SimObserver, B: SimObserver> SimObserver for (A, B) {
    fn on_start(&mut self, config: &FerryConfig, population: &[VehicleSpec]) {
        self.0.on_start(config, population);
        self.1.on_start(config, population);
    }

    fn on_trip(&mut self, trip: &TripRecord) {
        self.0.on_trip(trip);
        self.1.on_trip(trip);
    }

    fn on_snapshot(&mut self, snapshot: &SimSnapshot) {
        self.0.on_snapshot(snapshot);
        self.1.on_snapshot(snapshot);
    }

    fn on_end(&mut self, outcome: &SimOutcome) {
        self.0.on_end(outcome);
        self.1.on_end(outcome);
    }
}

impl<O: SimObserver + ?Sized> SimObserver for &mut O {
    fn on_start(&mut self, config: &FerryConfig, population: &[VehicleSpec]) {
        (**self).on_start(config, population);
    }

    fn on_trip(&mut self, trip: &TripRecord) {
        (**self).on_trip(trip);
    }

    fn on_snapshot(&mut self, snapshot: &SimSnapshot) {
        (**self).on_snapshot(snapshot);
    }

    fn on_end(&mut self, outcome: &SimOutcome) {
        (**self).on_end(outcome);
    }
}

/// An absent observer ignores every callback.
impl<O: SimObserver> SimObserver for Option<O> {
    fn on_start(&mut self, config: &FerryConfig, population: &[VehicleSpec]) {
        if let Some(o) = self {
            o.on_start(config, population);
        }
    }

    fn on_trip(&mut self, trip: &TripRecord) {
        if let Some(o) = self {
            o.on_trip(trip);
        }
    }

    fn on_snapshot(&mut self, snapshot: &SimSnapshot) {
        if let Some(o) = self {
            o.on_snapshot(snapshot);
        }
    }

    fn on_end(&mut self, outcome: &SimOutcome) {
        if let Some(o) = self {
            o.on_end(outcome);
        }
    }
}
