//! Read-only views of the ferry state handed to collaborators.
//!
//! A snapshot is copied out of the critical section in one go, so every
//! field reflects the same committed state.  Freshness beyond "most recent
//! committed state" is not guaranteed: the actors keep running.

use std::fmt;
use std::time::Instant;

use ferry_core::{Port, TripId, VehicleClass, VehicleId, VehicleSpec};

// ── VehiclePhase ──────────────────────────────────────────────────────────────

/// Where a vehicle is in its lifecycle.
///
/// `Boarding` has no variant: admission moves a vehicle from `Queued` to
/// `Aboard` inside one critical section, so the intermediate state is never
/// observable.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VehiclePhase {
    /// Waiting at a port before the toll (also right after landing).
    AtPort,
    /// Holding or waiting for a toll booth.
    Toll,
    /// In the waiting area, eligible for admission.
    Queued,
    /// Counted in the ferry's load and listed in its manifest.
    Aboard,
    /// Activity at the far side between the two legs.
    Dwelling,
    /// Both legs done, back at the starting port.
    Completed,
    /// Left the simulation because the stop signal was raised.
    Cancelled,
}

impl VehiclePhase {
    /// Phases in which the vehicle is at a port and may still want to board.
    pub fn is_pending(self) -> bool {
        matches!(
            self,
            VehiclePhase::AtPort | VehiclePhase::Toll | VehiclePhase::Queued | VehiclePhase::Dwelling
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, VehiclePhase::Completed | VehiclePhase::Cancelled)
    }
}

impl fmt::Display for VehiclePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            VehiclePhase::AtPort => "at-port",
            VehiclePhase::Toll => "toll",
            VehiclePhase::Queued => "queued",
            VehiclePhase::Aboard => "aboard",
            VehiclePhase::Dwelling => "dwelling",
            VehiclePhase::Completed => "completed",
            VehiclePhase::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

// ── Per-vehicle views ─────────────────────────────────────────────────────────

/// One vehicle as seen in a snapshot.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VehicleView {
    pub id:    VehicleId,
    pub class: VehicleClass,
    pub cost:  u32,
    pub start: Port,
    pub port:  Port,
    pub phase: VehiclePhase,
    /// Crossings completed: 0, 1 or 2.
    pub legs:  u8,
}

/// Wall-clock timestamps of one leg.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct LegTimes {
    /// Port the leg departs from.
    pub from:    Option<Port>,
    pub queued:  Option<Instant>,
    pub boarded: Option<Instant>,
    pub arrived: Option<Instant>,
}

/// Wall-clock history of one vehicle.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Timeline {
    pub started:  Option<Instant>,
    pub finished: Option<Instant>,
    pub legs:     [LegTimes; 2],
}

/// Full per-vehicle record, used to build end-of-run reports.
#[derive(Clone, Debug, PartialEq)]
pub struct VehicleRecord {
    pub spec:     VehicleSpec,
    pub port:     Port,
    pub phase:    VehiclePhase,
    pub legs:     u8,
    pub timeline: Timeline,
}

// ── Starvation and invariant counters ─────────────────────────────────────────

/// A vehicle passed over by more consecutive departures than allowed.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StarvationFlag {
    pub vehicle: VehicleId,
    pub port:    Port,
    /// Consecutive departures it was left behind by.
    pub cycles:  u32,
    /// The departure that crossed the bound.
    pub trip:    TripId,
}

/// Invariant violations observed inside the critical section.
///
/// The locking discipline makes these unreachable; they are counted so the
/// test suite can assert they stay zero under contention.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Violations {
    /// Load exceeded capacity after an admission.
    pub over_capacity:     u32,
    /// Manifest changed while the in-transit flag was set.
    pub transit_mutations: u32,
    /// Manifest membership and `Aboard` phase disagreed.
    pub manifest_mismatch: u32,
}

impl Violations {
    pub fn is_clean(&self) -> bool {
        *self == Violations::default()
    }
}

// ── FerrySnapshot ─────────────────────────────────────────────────────────────

/// A consistent copy of the ferry state.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FerrySnapshot {
    pub side:       Port,
    pub load:       u32,
    pub capacity:   u32,
    pub in_transit: bool,
    /// Vehicles aboard, in boarding order.
    pub manifest:   Vec<VehicleId>,
    /// Departures so far.
    pub departures: u32,
    /// Arrivals so far.
    pub arrivals:   u32,
    pub vehicles:   Vec<VehicleView>,
    /// Vehicles in `Completed`.
    pub completed:  usize,
    pub starvation: Vec<StarvationFlag>,
    pub violations: Violations,
}

impl FerrySnapshot {
    /// Vehicles at `port` in the given phase.
    pub fn at(&self, port: Port, phase: VehiclePhase) -> impl Iterator<Item = &VehicleView> {
        self.vehicles
            .iter()
            .filter(move |v| v.port == port && v.phase == phase)
    }

    /// Vehicles at `port` that still have crossing to do.
    pub fn waiting_at(&self, port: Port) -> usize {
        self.vehicles
            .iter()
            .filter(|v| v.port == port && v.phase.is_pending())
            .count()
    }
}
