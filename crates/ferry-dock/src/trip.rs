//! Trip records and the append-only trip log.

use std::sync::Mutex;
use std::time::Duration;

use ferry_core::{Direction, TripId, VehicleId};

use crate::lock;

/// Why the ferry ended a loading phase.  Exactly one is recorded per trip.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DepartureReason {
    /// No waiting or arriving vehicle fits the remaining capacity.
    Full,
    /// Nobody left at this port could ever board on this visit.
    NoDemand,
    /// The dock-wait deadline elapsed.
    DockTimeout,
    /// Every vehicle is done; the ferry returns empty to halt at home.
    Homecoming,
}

impl DepartureReason {
    pub fn as_str(self) -> &'static str {
        match self {
            DepartureReason::Full => "full",
            DepartureReason::NoDemand => "no-demand",
            DepartureReason::DockTimeout => "dock-timeout",
            DepartureReason::Homecoming => "homecoming",
        }
    }
}

/// Immutable summary of one crossing, created at departure.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TripRecord {
    pub id:            TripId,
    pub direction:     Direction,
    pub reason:        DepartureReason,
    /// Planned crossing time in delay units.
    pub duration:      f64,
    /// Manifest at departure, in boarding order.
    pub vehicles:      Vec<VehicleId>,
    /// Capacity units in use at departure.
    pub capacity_used: u32,
    /// Wall-clock offset of the departure from the start of the run.
    pub departed_at:   Duration,
}

impl TripRecord {
    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }
}

/// Ordered, append-only log of every departure.
///
/// Records are appended by the ferry actor in departure order and never
/// modified.  Readers get clones; incremental consumers track a cursor with
/// [`TripLog::since`].
#[derive(Default)]
pub struct TripLog {
    records: Mutex<Vec<TripRecord>>,
}

impl TripLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn append(&self, record: TripRecord) {
        lock(&self.records).push(record);
    }

    pub fn len(&self) -> usize {
        lock(&self.records).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.records).is_empty()
    }

    /// Records appended after the first `cursor` records.
    pub fn since(&self, cursor: usize) -> Vec<TripRecord> {
        let records = lock(&self.records);
        records.get(cursor..).map(<[TripRecord]>::to_vec).unwrap_or_default()
    }

    /// The most recent record.
    pub fn last(&self) -> Option<TripRecord> {
        lock(&self.records).last().cloned()
    }

    /// Every record so far.
    pub fn all(&self) -> Vec<TripRecord> {
        lock(&self.records).clone()
    }
}
