//! Toll booths: the per-port resource gate.
//!
//! Each port owns a small pool of numbered booths.  A vehicle holds a booth
//! only while its toll is processed; the boarding decision never looks at
//! booths.  Waiters are served in whatever order the OS wakes them: toll
//! order affects throughput, never correctness.

use std::sync::{Condvar, Mutex};

use ferry_core::{Port, VehicleId};

use crate::{StopListener, StopSignal, lock};

// ── TollGate ──────────────────────────────────────────────────────────────────

/// The booths of one port.
pub struct TollGate {
    port:   Port,
    /// `Some(vehicle)` while a booth is occupied.
    booths: Mutex<Vec<Option<VehicleId>>>,
    freed:  Condvar,
    stop:   StopSignal,
}

impl TollGate {
    pub fn new(port: Port, permits: u32, stop: StopSignal) -> Self {
        Self {
            port,
            booths: Mutex::new(vec![None; permits as usize]),
            freed: Condvar::new(),
            stop,
        }
    }

    pub fn port(&self) -> Port {
        self.port
    }

    /// Block until a booth is free, then occupy it.
    ///
    /// Returns `None` if the stop signal is raised while waiting.
    pub fn acquire(&self, vehicle: VehicleId) -> Option<TollPermit<'_>> {
        let mut booths = lock(&self.booths);
        loop {
            if self.stop.is_raised() {
                return None;
            }
            if let Some(booth) = booths.iter().position(Option::is_none) {
                booths[booth] = Some(vehicle);
                return Some(TollPermit { gate: self, booth, vehicle });
            }
            booths = match self.freed.wait(booths) {
                Ok(g) => g,
                Err(poisoned) => poisoned.into_inner(),
            };
        }
    }

    /// Current occupant of every booth.
    pub fn occupancy(&self) -> Vec<Option<VehicleId>> {
        lock(&self.booths).clone()
    }

    /// Number of booths currently occupied.
    pub fn in_use(&self) -> usize {
        lock(&self.booths).iter().filter(|b| b.is_some()).count()
    }

    pub fn capacity(&self) -> usize {
        lock(&self.booths).len()
    }

    fn release(&self, booth: usize) {
        lock(&self.booths)[booth] = None;
        self.freed.notify_one();
    }
}

impl StopListener for TollGate {
    fn wake_all(&self) {
        let _booths = lock(&self.booths);
        self.freed.notify_all();
    }
}

// ── TollPermit ────────────────────────────────────────────────────────────────

/// An occupied booth.  Dropping the permit frees the booth.
pub struct TollPermit<'a> {
    gate:    &'a TollGate,
    booth:   usize,
    vehicle: VehicleId,
}

impl TollPermit<'_> {
    pub fn booth(&self) -> usize {
        self.booth
    }

    pub fn port(&self) -> Port {
        self.gate.port
    }

    pub fn vehicle(&self) -> VehicleId {
        self.vehicle
    }
}

impl Drop for TollPermit<'_> {
    fn drop(&mut self) {
        self.gate.release(self.booth);
    }
}

// ── TollPlaza ─────────────────────────────────────────────────────────────────

/// One [`TollGate`] per port.
pub struct TollPlaza {
    gates: [TollGate; 2],
}

impl TollPlaza {
    pub fn new(permits_per_port: u32, stop: &StopSignal) -> Self {
        Self {
            gates: [
                TollGate::new(Port::Origin, permits_per_port, stop.clone()),
                TollGate::new(Port::Destination, permits_per_port, stop.clone()),
            ],
        }
    }

    #[inline]
    pub fn gate(&self, port: Port) -> &TollGate {
        &self.gates[port.index()]
    }

    /// Booth occupancy for both ports, indexed by [`Port::index`].
    pub fn occupancy(&self) -> [Vec<Option<VehicleId>>; 2] {
        [self.gates[0].occupancy(), self.gates[1].occupancy()]
    }
}

impl StopListener for TollPlaza {
    fn wake_all(&self) {
        for gate in &self.gates {
            gate.wake_all();
        }
    }
}
