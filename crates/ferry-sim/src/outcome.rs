//! What the run hands back: periodic snapshots and the final outcome.

use std::time::Instant;

use ferry_core::{Port, TimeScale, VehicleClass, VehicleId};
use ferry_dock::{
    FerrySnapshot, StarvationFlag, StopCause, Timeline, TripRecord, VehiclePhase, VehicleRecord,
    Violations,
};

// ── SimSnapshot ───────────────────────────────────────────────────────────────

/// Read-only view handed to [`SimObserver::on_snapshot`][crate::SimObserver::on_snapshot].
#[derive(Clone, Debug)]
pub struct SimSnapshot {
    pub ferry:     FerrySnapshot,
    /// Booth occupants, indexed by [`Port::index`].
    pub booths:    [Vec<Option<VehicleId>>; 2],
    /// Delay units since the run started.
    pub elapsed:   f64,
    /// Round trips reported to the termination detector.
    pub completed: usize,
    pub total:     usize,
}

// ── VehicleReport ─────────────────────────────────────────────────────────────

/// End-of-run summary of one vehicle.  Times are in delay units.
#[derive(Clone, Debug, PartialEq)]
pub struct VehicleReport {
    pub id:         VehicleId,
    pub class:      VehicleClass,
    pub label:      String,
    pub start_port: Port,
    pub final_port: Port,
    pub legs:       u8,
    pub completed:  bool,
    pub phase:      VehiclePhase,
    /// Queue-to-boarding wait, indexed by the port the leg left from.
    pub wait:       [f64; 2],
    /// Boarding-to-landing time, indexed by the port the leg left from.
    pub crossing:   [f64; 2],
    /// First toll to completion; `None` unless the round trip finished.
    pub round_trip: Option<f64>,
}

impl VehicleReport {
    pub(crate) fn from_record(record: &VehicleRecord, scale: TimeScale) -> Self {
        let Timeline { started, finished, legs } = record.timeline;
        let span = |from: Option<Instant>, to: Option<Instant>| match (from, to) {
            (Some(a), Some(b)) => scale.to_units(b.saturating_duration_since(a)),
            _ => 0.0,
        };

        let mut wait = [0.0; 2];
        let mut crossing = [0.0; 2];
        for leg in legs {
            if let Some(port) = leg.from {
                wait[port.index()] += span(leg.queued, leg.boarded);
                crossing[port.index()] += span(leg.boarded, leg.arrived);
            }
        }

        let completed = record.phase == VehiclePhase::Completed;
        Self {
            id: record.spec.id,
            class: record.spec.class,
            label: record.spec.label(),
            start_port: record.spec.start,
            final_port: record.port,
            legs: record.legs,
            completed,
            phase: record.phase,
            wait,
            crossing,
            round_trip: if completed { Some(span(started, finished)) } else { None },
        }
    }

    /// Time spent queued over both legs.
    pub fn total_wait(&self) -> f64 {
        self.wait.iter().sum()
    }
}

// ── SimOutcome ────────────────────────────────────────────────────────────────

/// Everything [`Sim::run`][crate::Sim::run] learned.
#[derive(Clone, Debug)]
pub struct SimOutcome {
    /// Every departure, in order.
    pub trips:      Vec<TripRecord>,
    /// One report per vehicle, in id order.
    pub vehicles:   Vec<VehicleReport>,
    pub completed:  usize,
    pub total:      usize,
    /// `None` if the run ended because every vehicle completed.
    pub stop_cause: Option<StopCause>,
    pub starvation: Vec<StarvationFlag>,
    pub violations: Violations,
    /// The state the ferry was left in.
    pub last:       FerrySnapshot,
    /// Delay units from start to the last actor exiting.
    pub elapsed:    f64,
}

impl SimOutcome {
    /// `true` when every vehicle completed its round trip.
    pub fn all_done(&self) -> bool {
        self.completed == self.total
    }

    /// Departures that carried nobody.
    pub fn empty_trips(&self) -> usize {
        self.trips.iter().filter(|t| t.is_empty()).count()
    }
}
