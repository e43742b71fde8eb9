//! Plain data row types written by output backends.
//!
//! Rows are flattened, label-resolved copies of the simulation's records:
//! vehicle ids become `Car3`-style labels and wall-clock offsets become
//! delay units, so every backend writes the same values.

use serde::Serialize;

use ferry_core::{Port, TimeScale};
use ferry_dock::{StarvationFlag, TripRecord};
use ferry_sim::VehicleReport;

/// One departure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripRow {
    pub id:               u32,
    /// `Origin->Destination` or `Destination->Origin`.
    pub direction:        String,
    pub reason:           &'static str,
    /// Planned crossing time in delay units.
    pub duration:         f64,
    /// Delay units from the start of the run to the departure.
    pub departed_at:      f64,
    pub capacity_used:    u32,
    pub capacity_percent: f64,
    /// Vehicle labels in boarding order.
    pub vehicles:         Vec<String>,
}

impl TripRow {
    /// `labels` maps a vehicle's registry slot to its label.
    pub fn new(trip: &TripRecord, capacity: u32, scale: TimeScale, labels: &[String]) -> Self {
        Self {
            id:               trip.id.0,
            direction:        trip.direction.to_string(),
            reason:           trip.reason.as_str(),
            duration:         trip.duration,
            departed_at:      scale.to_units(trip.departed_at),
            capacity_used:    trip.capacity_used,
            capacity_percent: percent(trip.capacity_used as f64, capacity as f64),
            vehicles:         trip
                .vehicles
                .iter()
                .map(|id| labels.get(id.slot()).cloned().unwrap_or_else(|| id.to_string()))
                .collect(),
        }
    }
}

/// One vehicle's end-of-run report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleRow {
    pub id:                u32,
    pub label:             String,
    #[serde(rename = "type")]
    pub class:             &'static str,
    pub start:             &'static str,
    pub wait_origin:       f64,
    pub wait_destination:  f64,
    pub ferry_origin:      f64,
    pub ferry_destination: f64,
    /// `None` unless the round trip finished.
    pub round_trip:        Option<f64>,
    pub completed:         bool,
}

impl From<&VehicleReport> for VehicleRow {
    fn from(v: &VehicleReport) -> Self {
        let o = Port::Origin.index();
        let d = Port::Destination.index();
        Self {
            id:                v.id.0,
            label:             v.label.clone(),
            class:             v.class.name(),
            start:             port_name(v.start_port),
            wait_origin:       v.wait[o],
            wait_destination:  v.wait[d],
            ferry_origin:      v.crossing[o],
            ferry_destination: v.crossing[d],
            round_trip:        v.round_trip,
            completed:         v.completed,
        }
    }
}

/// Run-level totals for the JSON document header.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub total_vehicles: usize,
    pub completed:      usize,
    pub ferry_capacity: u32,
    pub total_trips:    usize,
    /// Delay units from start to finish.
    pub duration:       f64,
    /// `"trip-limit"`, `"external"`, `"actor-failed"`, or `None` for a run
    /// that finished.
    pub stopped:        Option<&'static str>,
    pub starvation:     Vec<StarvationFlag>,
}

pub(crate) fn percent(part: f64, whole: f64) -> f64 {
    if whole > 0.0 { part / whole * 100.0 } else { 0.0 }
}

fn port_name(port: Port) -> &'static str {
    match port {
        Port::Origin => "Origin",
        Port::Destination => "Destination",
    }
}
