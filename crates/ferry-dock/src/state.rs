//! `FerryState`: the single critical section shared by every actor.
//!
//! # What the lock protects
//!
//! ```text
//! Dock (behind one Mutex, paired with one Condvar)
//!   side, load, in_transit, manifest, trip counters
//!   per-vehicle registry: port, phase, legs, skip counter, timeline
//!   starvation flags, violation counters
//! ```
//!
//! Vehicle actors and the ferry actor only touch this state through the
//! methods below.  Each method is one critical section; the blocking ones
//! ([`board`](FerryState::board), [`await_arrival`](FerryState::await_arrival),
//! [`await_departure`](FerryState::await_departure)) wait on the condition
//! variable and re-validate their predicate under the lock after every
//! wake-up.  Every mutation ends with `notify_all`.
//!
//! # Admission
//!
//! A queued vehicle is admitted when, inside the same critical section:
//!
//! 1. the ferry is docked at the vehicle's port,
//! 2. the ferry is not in transit and not halted,
//! 3. `load + cost <= capacity`.
//!
//! The ferry's departure decision and the admission freeze run in one
//! critical section, so the ferry can never leave while an admission is
//! half-applied and two admissions can never jointly overshoot the capacity.

use std::sync::{Condvar, Mutex, MutexGuard};
use std::time::Instant;

use ferry_core::{Direction, Port, TripId, VehicleId, VehicleSpec};

use crate::snapshot::{
    FerrySnapshot, StarvationFlag, Timeline, VehiclePhase, VehicleRecord, VehicleView, Violations,
};
use crate::{DepartureReason, StopListener, StopSignal, TerminationDetector, TripLog, TripRecord, lock};

// ── Results handed back to actors ─────────────────────────────────────────────

/// Outcome of [`FerryState::board`].
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Admission {
    /// Aboard for the given departure.
    Boarded(TripId),
    /// The stop signal was raised while queued.
    Cancelled,
}

/// Outcome of [`FerryState::await_arrival`].
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Arrival {
    /// Unloaded at `port`; `legs` crossings are now complete.
    Landed { port: Port, legs: u8 },
    /// The stop signal was raised while aboard.
    Cancelled,
}

/// What the ferry commits to before it starts waiting at the dock.
#[derive(Copy, Clone, Debug)]
pub struct DepartureTerms {
    /// Leave with [`DepartureReason::DockTimeout`] once this passes.
    pub deadline:  Instant,
    /// Planned crossing time recorded in the trip, in delay units.
    pub duration:  f64,
    /// Refuse to depart once this many departures were made.
    pub max_trips: Option<u32>,
}

/// Outcome of [`FerryState::await_departure`].
#[derive(Clone, PartialEq, Debug)]
pub enum DockDecision {
    /// Admissions are frozen and the trip is logged; cross now.
    Depart(TripRecord),
    /// Every vehicle is done and the ferry is home.  Admissions are closed.
    Halt,
    /// A departure condition held but the trip limit was already reached.
    TripLimit,
    /// The stop signal was raised while docked.
    Stopped,
}

enum Readiness {
    Halt,
    Depart(DepartureReason),
    Wait,
}

// ── Internal state ────────────────────────────────────────────────────────────

struct VehicleSlot {
    spec:     VehicleSpec,
    port:     Port,
    phase:    VehiclePhase,
    legs:     u8,
    /// Consecutive departures from `port` that left this vehicle queued.
    skipped:  u32,
    /// Already flagged as starving during the current wait.
    flagged:  bool,
    timeline: Timeline,
}

impl VehicleSlot {
    fn view(&self) -> VehicleView {
        VehicleView {
            id:    self.spec.id,
            class: self.spec.class,
            cost:  self.spec.cost,
            start: self.spec.start,
            port:  self.port,
            phase: self.phase,
            legs:  self.legs,
        }
    }

    /// The leg currently in progress (0 before the first landing, 1 after).
    fn leg_index(&self) -> usize {
        (self.legs as usize).min(1)
    }
}

struct Dock {
    side:       Port,
    load:       u32,
    in_transit: bool,
    halted:     bool,
    manifest:   Vec<VehicleId>,
    next_trip:  TripId,
    arrivals:   u32,
    vehicles:   Vec<VehicleSlot>,
    starvation: Vec<StarvationFlag>,
    violations: Violations,
}

impl Dock {
    fn slot(&self, vehicle: VehicleId) -> &VehicleSlot {
        &self.vehicles[vehicle.slot()]
    }

    fn slot_mut(&mut self, vehicle: VehicleId) -> &mut VehicleSlot {
        &mut self.vehicles[vehicle.slot()]
    }

    /// Recount manifest membership against `Aboard` phases.
    fn audit_manifest(&mut self) {
        let aboard = self
            .vehicles
            .iter()
            .filter(|v| v.phase == VehiclePhase::Aboard)
            .count();
        let consistent = aboard == self.manifest.len()
            && self
                .manifest
                .iter()
                .all(|&id| self.vehicles[id.slot()].phase == VehiclePhase::Aboard);
        if !consistent {
            self.violations.manifest_mismatch += 1;
        }
    }
}

// ── FerryState ────────────────────────────────────────────────────────────────

/// Shared, synchronized state of the ferry and every vehicle's lifecycle.
pub struct FerryState {
    capacity:       u32,
    home:           Port,
    fairness_bound: u32,
    epoch:          Instant,
    dock:           Mutex<Dock>,
    changed:        Condvar,
    stop:           StopSignal,
    trips:          TripLog,
}

impl FerryState {
    /// Create the state with the ferry docked at `home` and every vehicle
    /// at its starting port.
    pub fn new(
        population:     &[VehicleSpec],
        capacity:       u32,
        home:           Port,
        fairness_bound: u32,
        stop:           StopSignal,
    ) -> Self {
        let vehicles = population
            .iter()
            .map(|&spec| VehicleSlot {
                spec,
                port:     spec.start,
                phase:    VehiclePhase::AtPort,
                legs:     0,
                skipped:  0,
                flagged:  false,
                timeline: Timeline::default(),
            })
            .collect();

        Self {
            capacity,
            home,
            fairness_bound,
            epoch: Instant::now(),
            dock: Mutex::new(Dock {
                side:       home,
                load:       0,
                in_transit: false,
                halted:     false,
                manifest:   Vec::new(),
                next_trip:  TripId(0),
                arrivals:   0,
                vehicles,
                starvation: Vec::new(),
                violations: Violations::default(),
            }),
            changed: Condvar::new(),
            stop,
            trips: TripLog::new(),
        }
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn home(&self) -> Port {
        self.home
    }

    pub fn vehicle_count(&self) -> usize {
        lock(&self.dock).vehicles.len()
    }

    /// The append-only departure log.
    pub fn trips(&self) -> &TripLog {
        &self.trips
    }

    pub fn stop_signal(&self) -> &StopSignal {
        &self.stop
    }

    fn wait<'a>(&self, guard: MutexGuard<'a, Dock>) -> MutexGuard<'a, Dock> {
        match self.changed.wait(guard) {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    // ── Vehicle side ──────────────────────────────────────────────────────

    /// `AT_PORT → TOLL`: the vehicle heads for a toll booth at its port.
    ///
    /// Returns the port the vehicle is at.
    pub fn enter_toll(&self, vehicle: VehicleId) -> Port {
        let mut dock = lock(&self.dock);
        let now = Instant::now();
        let slot = dock.slot_mut(vehicle);
        slot.phase = VehiclePhase::Toll;
        slot.timeline.started.get_or_insert(now);
        let port = slot.port;
        self.changed.notify_all();
        port
    }

    /// `TOLL → QUEUED`: the vehicle reached the waiting area.
    pub fn enqueue(&self, vehicle: VehicleId) {
        let mut dock = lock(&self.dock);
        let now = Instant::now();
        let slot = dock.slot_mut(vehicle);
        slot.phase = VehiclePhase::Queued;
        slot.skipped = 0;
        slot.flagged = false;
        let leg = slot.leg_index();
        slot.timeline.legs[leg].from = Some(slot.port);
        slot.timeline.legs[leg].queued = Some(now);
        self.changed.notify_all();
    }

    /// `QUEUED → ABOARD`: block until admitted or the stop signal rises.
    ///
    /// On `Cancelled` the vehicle holds no reservation: admission either
    /// happened completely or not at all.
    pub fn board(&self, vehicle: VehicleId) -> Admission {
        let mut dock = lock(&self.dock);
        loop {
            if self.stop.is_raised() {
                return Admission::Cancelled;
            }

            let slot = dock.slot(vehicle);
            let cost = slot.spec.cost;
            let admissible = !dock.in_transit
                && !dock.halted
                && dock.side == slot.port
                && dock.load + cost <= self.capacity;

            if admissible {
                let trip = dock.next_trip;
                dock.load += cost;
                dock.manifest.push(vehicle);
                if dock.load > self.capacity {
                    dock.violations.over_capacity += 1;
                }

                let load = dock.load;
                let now = Instant::now();
                let slot = dock.slot_mut(vehicle);
                slot.phase = VehiclePhase::Aboard;
                slot.skipped = 0;
                slot.flagged = false;
                let leg = slot.leg_index();
                slot.timeline.legs[leg].boarded = Some(now);

                tracing::debug!(
                    vehicle = %slot.spec.label(),
                    port = %slot.port,
                    load,
                    capacity = self.capacity,
                    "boarded",
                );
                self.changed.notify_all();
                return Admission::Boarded(trip);
            }

            dock = self.wait(dock);
        }
    }

    /// `ABOARD → AT_PORT'`: block until the ferry lands this vehicle.
    ///
    /// The ferry flips the vehicle's port, increments its legs and clears it
    /// from the manifest inside [`arrive`](Self::arrive); this only observes
    /// the result.  If the stop signal rises first the vehicle leaves the
    /// manifest to the ferry's [`shutdown`](Self::shutdown).
    pub fn await_arrival(&self, vehicle: VehicleId) -> Arrival {
        let mut dock = lock(&self.dock);
        loop {
            let slot = dock.slot(vehicle);
            match slot.phase {
                VehiclePhase::Aboard => {}
                VehiclePhase::Cancelled => return Arrival::Cancelled,
                _ => return Arrival::Landed { port: slot.port, legs: slot.legs },
            }
            if self.stop.is_raised() {
                return Arrival::Cancelled;
            }
            dock = self.wait(dock);
        }
    }

    /// `AT_PORT' → DWELLING`: activity at the far side before returning.
    pub fn begin_dwell(&self, vehicle: VehicleId) {
        let mut dock = lock(&self.dock);
        dock.slot_mut(vehicle).phase = VehiclePhase::Dwelling;
        self.changed.notify_all();
    }

    /// `AT_PORT' → COMPLETED`: report the round trip to `detector`.
    ///
    /// Phase change and report happen in one critical section so the ferry
    /// never sees a finished vehicle that is not yet counted.  Returns the
    /// detector's new count.
    pub fn complete(&self, vehicle: VehicleId, detector: &TerminationDetector) -> usize {
        let mut dock = lock(&self.dock);
        let now = Instant::now();
        let slot = dock.slot_mut(vehicle);
        slot.phase = VehiclePhase::Completed;
        slot.timeline.finished = Some(now);
        let done = detector.report();
        self.changed.notify_all();
        done
    }

    /// The vehicle actor is exiting because of the stop signal.
    ///
    /// Vehicles still aboard are left for the ferry's
    /// [`shutdown`](Self::shutdown), which owns the manifest.
    pub fn cancel(&self, vehicle: VehicleId) {
        let mut dock = lock(&self.dock);
        let slot = dock.slot_mut(vehicle);
        if slot.phase.is_pending() {
            slot.phase = VehiclePhase::Cancelled;
            self.changed.notify_all();
        }
    }

    // ── Ferry side ────────────────────────────────────────────────────────

    /// Block while docked until a departure condition holds, then depart.
    ///
    /// Checked in this order, under the lock, after every state change:
    ///
    /// 1. stop signal → [`DockDecision::Stopped`]
    /// 2. every vehicle done → `Halt` at home, depart with `Homecoming` elsewhere
    /// 3. load == capacity → depart with `Full`
    /// 4. no vehicle pending at this port → depart with `NoDemand`
    /// 5. no pending vehicle fits the remaining capacity → depart with `Full`
    /// 6. `terms.deadline` passed → depart with `DockTimeout`
    ///
    /// A vehicle is pending at a port while it is there and neither aboard
    /// nor finished: at the port, at the toll, queued, or dwelling.
    ///
    /// The departure itself (see [`depart`](Self::depart)) happens in the
    /// same critical section as the decision, so the recorded reason always
    /// describes the manifest that was frozen.  With `terms.max_trips`
    /// departures already made the ferry stays docked and gets
    /// [`DockDecision::TripLimit`] instead.
    pub fn await_departure(&self, terms: DepartureTerms, detector: &TerminationDetector) -> DockDecision {
        let mut dock = lock(&self.dock);
        loop {
            if self.stop.is_raised() {
                return DockDecision::Stopped;
            }

            let now = Instant::now();
            match self.readiness(&dock, detector, now >= terms.deadline) {
                Readiness::Halt => {
                    dock.halted = true;
                    self.changed.notify_all();
                    return DockDecision::Halt;
                }
                Readiness::Depart(reason) => {
                    if terms.max_trips.is_some_and(|max| dock.next_trip.0 >= max) {
                        return DockDecision::TripLimit;
                    }
                    return DockDecision::Depart(self.depart_locked(&mut dock, reason, terms.duration));
                }
                Readiness::Wait => {}
            }

            dock = match self.changed.wait_timeout(dock, terms.deadline - now) {
                Ok((g, _)) => g,
                Err(poisoned) => poisoned.into_inner().0,
            };
        }
    }

    fn readiness(&self, dock: &Dock, detector: &TerminationDetector, timed_out: bool) -> Readiness {
        if detector.all_done() {
            return if dock.side == self.home {
                Readiness::Halt
            } else {
                Readiness::Depart(DepartureReason::Homecoming)
            };
        }

        let remaining = self.capacity - dock.load;
        if remaining == 0 {
            return Readiness::Depart(DepartureReason::Full);
        }

        let side = dock.side;
        let mut pending = dock
            .vehicles
            .iter()
            .filter(|v| v.port == side && v.phase.is_pending())
            .peekable();
        if pending.peek().is_none() {
            return Readiness::Depart(DepartureReason::NoDemand);
        }
        if !pending.any(|v| v.spec.cost <= remaining) {
            return Readiness::Depart(DepartureReason::Full);
        }

        if timed_out {
            Readiness::Depart(DepartureReason::DockTimeout)
        } else {
            Readiness::Wait
        }
    }

    /// Freeze admissions and record a departure for `reason` unconditionally.
    ///
    /// Sets the in-transit flag, snapshots the manifest into a
    /// [`TripRecord`], appends it to the trip log, and advances the
    /// starvation counters of vehicles left queued at this port.
    pub fn depart(&self, reason: DepartureReason, duration: f64) -> TripRecord {
        let mut dock = lock(&self.dock);
        self.depart_locked(&mut dock, reason, duration)
    }

    fn depart_locked(&self, dock: &mut Dock, reason: DepartureReason, duration: f64) -> TripRecord {
        dock.in_transit = true;

        let id = dock.next_trip;
        dock.next_trip = id.next();
        let side = dock.side;
        let record = TripRecord {
            id,
            direction: Direction::leaving(side),
            reason,
            duration,
            vehicles: dock.manifest.clone(),
            capacity_used: dock.load,
            departed_at: self.epoch.elapsed(),
        };

        let bound = self.fairness_bound;
        let mut flags = Vec::new();
        for slot in dock
            .vehicles
            .iter_mut()
            .filter(|v| v.port == side && v.phase == VehiclePhase::Queued)
        {
            slot.skipped += 1;
            if slot.skipped > bound && !slot.flagged {
                slot.flagged = true;
                flags.push(StarvationFlag {
                    vehicle: slot.spec.id,
                    port:    side,
                    cycles:  slot.skipped,
                    trip:    id,
                });
                tracing::warn!(
                    vehicle = %slot.spec.label(),
                    port = %side,
                    cycles = slot.skipped,
                    bound,
                    "vehicle starving: left behind by too many departures",
                );
            }
        }
        dock.starvation.extend(flags);

        self.trips.append(record.clone());
        self.changed.notify_all();
        record
    }

    /// Land at the opposite port and release every vehicle aboard.
    ///
    /// Flips the side, moves each manifest vehicle to the new port with one
    /// more leg completed, then clears load, manifest and the in-transit
    /// flag in one critical section.  Returns the port landed at and the
    /// vehicles released.
    pub fn arrive(&self) -> (Port, Vec<VehicleId>) {
        let mut dock = lock(&self.dock);
        let side = dock.side.opposite();
        dock.side = side;

        let now = Instant::now();
        let released = std::mem::take(&mut dock.manifest);
        let departed = self.trips.last().map(|t| t.vehicles).unwrap_or_default();
        if released != departed {
            dock.violations.transit_mutations += 1;
        }
        for &id in &released {
            let slot = dock.slot_mut(id);
            let leg = slot.leg_index();
            slot.timeline.legs[leg].arrived = Some(now);
            slot.port = side;
            slot.legs += 1;
            slot.phase = VehiclePhase::AtPort;
        }
        dock.load = 0;
        dock.in_transit = false;
        dock.arrivals += 1;
        dock.audit_manifest();

        self.changed.notify_all();
        (side, released)
    }

    /// Cancellation: land wherever the ferry is and retire everyone aboard.
    ///
    /// Vehicles in the manifest move to `Cancelled`; load and manifest are
    /// cleared so no phantom reservation survives the stop.  Returns how many
    /// vehicles were aboard.
    pub fn shutdown(&self) -> usize {
        let mut dock = lock(&self.dock);
        let manifest = std::mem::take(&mut dock.manifest);
        for &id in &manifest {
            dock.slot_mut(id).phase = VehiclePhase::Cancelled;
        }
        dock.load = 0;
        dock.in_transit = false;
        dock.halted = true;
        self.changed.notify_all();
        manifest.len()
    }

    // ── Read-only access ──────────────────────────────────────────────────

    /// A consistent copy of the whole state.
    pub fn snapshot(&self) -> FerrySnapshot {
        let dock = lock(&self.dock);
        FerrySnapshot {
            side:       dock.side,
            load:       dock.load,
            capacity:   self.capacity,
            in_transit: dock.in_transit,
            manifest:   dock.manifest.clone(),
            departures: dock.next_trip.0,
            arrivals:   dock.arrivals,
            vehicles:   dock.vehicles.iter().map(VehicleSlot::view).collect(),
            completed:  dock
                .vehicles
                .iter()
                .filter(|v| v.phase == VehiclePhase::Completed)
                .count(),
            starvation: dock.starvation.clone(),
            violations: dock.violations,
        }
    }

    /// Full per-vehicle records, including timelines.
    pub fn vehicle_records(&self) -> Vec<VehicleRecord> {
        lock(&self.dock)
            .vehicles
            .iter()
            .map(|v| VehicleRecord {
                spec:     v.spec,
                port:     v.port,
                phase:    v.phase,
                legs:     v.legs,
                timeline: v.timeline,
            })
            .collect()
    }

    /// Wall-clock instant the state was created; trip `departed_at` offsets
    /// are measured from here.
    pub fn epoch(&self) -> Instant {
        self.epoch
    }
}

impl StopListener for FerryState {
    fn wake_all(&self) {
        let _dock = lock(&self.dock);
        self.changed.notify_all();
    }
}
