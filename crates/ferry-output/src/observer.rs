//! `OutputObserver<W>` — bridges `SimObserver` to an `OutputWriter`.

use ferry_core::{FerryConfig, TimeScale, VehicleSpec};
use ferry_dock::{StopCause, TripRecord};
use ferry_sim::{SimObserver, SimOutcome};

use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult, RunSummary, TripRow, VehicleRow};

/// A [`SimObserver`] that writes trips as they depart and vehicle reports at
/// the end of the run to any [`OutputWriter`] backend.
///
/// Errors from the writer are stored internally because `SimObserver` methods
/// have no return value.  After `sim.run()` returns, check for errors with
/// [`take_error`][Self::take_error].
pub struct OutputObserver<W: OutputWriter> {
    writer:     W,
    capacity:   u32,
    scale:      TimeScale,
    labels:     Vec<String>,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> OutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            capacity:   0,
            scale:      TimeScale::default(),
            labels:     Vec::new(),
            last_error: None,
        }
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the sim).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for OutputObserver<W> {
    fn on_start(&mut self, config: &FerryConfig, population: &[VehicleSpec]) {
        self.capacity = config.capacity;
        self.scale = config.time_scale;
        self.labels = population.iter().map(VehicleSpec::label).collect();
        let result = self.writer.write_config(config);
        self.store_err(result);
    }

    fn on_trip(&mut self, trip: &TripRecord) {
        let row = TripRow::new(trip, self.capacity, self.scale, &self.labels);
        let result = self.writer.write_trip(&row);
        self.store_err(result);
    }

    fn on_end(&mut self, outcome: &SimOutcome) {
        let rows: Vec<VehicleRow> = outcome.vehicles.iter().map(VehicleRow::from).collect();
        let result = self.writer.write_vehicles(&rows);
        self.store_err(result);

        let summary = RunSummary {
            total_vehicles: outcome.total,
            completed:      outcome.completed,
            ferry_capacity: self.capacity,
            total_trips:    outcome.trips.len(),
            duration:       outcome.elapsed,
            stopped:        outcome.stop_cause.map(|cause| match cause {
                StopCause::External => "external",
                StopCause::TripLimit => "trip-limit",
                StopCause::ActorFailed => "actor-failed",
            }),
            starvation:     outcome.starvation.clone(),
        };
        let result = self.writer.write_summary(&summary);
        self.store_err(result);

        let result = self.writer.finish();
        self.store_err(result);
    }
}
