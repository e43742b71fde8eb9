//! Start configuration for one simulation run.
//!
//! `FerryConfig` is assembled by the application (the CLI maps its flags onto
//! it) and validated once by [`FerryConfig::validate`] before any actor is
//! created.  An invalid configuration never reaches the simulation core.

use crate::{
    ClassSpec, ConfigError, DelayRange, Port, SimRng, TimeScale, VehicleClass, VehicleId,
};

// ── StartPorts ────────────────────────────────────────────────────────────────

/// Where each vehicle begins (and must end) its round trip.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StartPorts {
    /// Each vehicle picks a port uniformly from the simulation RNG.
    Random,
    /// Every vehicle starts at the same port.
    All(Port),
    /// One entry per vehicle, in vehicle-id order.
    Explicit(Vec<Port>),
}

// ── VehicleSpec ───────────────────────────────────────────────────────────────

/// The fixed identity of one vehicle, resolved from the configuration.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VehicleSpec {
    pub id:    VehicleId,
    pub class: VehicleClass,
    /// Capacity units this vehicle occupies aboard.
    pub cost:  u32,
    /// Home port: where the round trip starts and ends.
    pub start: Port,
}

impl VehicleSpec {
    /// The label used in logs and exports, e.g. `Car1` or `Truck27`.
    pub fn label(&self) -> String {
        format!("{}{}", self.class.name(), self.id.0)
    }
}

// ── FerryConfig ───────────────────────────────────────────────────────────────

/// Top-level simulation configuration.
///
/// Delays are in abstract units (see [`TimeScale`]).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FerryConfig {
    /// Population, in id order: every vehicle of `classes[0]` first, etc.
    pub classes: Vec<ClassSpec>,

    /// Maximum load in capacity units.
    pub capacity: u32,

    /// Interchangeable toll permits per port.
    pub toll_permits: u32,

    /// How long a vehicle holds its toll permit.
    pub toll_delay: DelayRange,

    /// Crossing duration, drawn once per departure.
    pub transit: DelayRange,

    /// Activity at the far side between the two legs.
    pub dwell: DelayRange,

    /// Longest the ferry stays docked waiting for more vehicles.
    pub dock_wait: f64,

    /// The ferry starts here and only halts here.
    pub home: Port,

    pub start_ports: StartPorts,

    /// A vehicle skipped by more than this many consecutive departures from
    /// its port is flagged as starving.
    pub fairness_bound: u32,

    /// Departures allowed before the run is stopped.  `None` means no limit.
    pub max_trips: Option<u32>,

    /// Master RNG seed.
    pub seed: u64,

    pub time_scale: TimeScale,

    /// How often `Sim::run` hands a snapshot to its observer.
    pub snapshot_interval: f64,
}

impl Default for FerryConfig {
    fn default() -> Self {
        Self {
            classes: vec![
                ClassSpec::new(VehicleClass::Car, 12),
                ClassSpec::new(VehicleClass::Minibus, 10),
                ClassSpec::new(VehicleClass::Truck, 8),
            ],
            capacity:          20,
            toll_permits:      2,
            toll_delay:        DelayRange::fixed(0.1),
            transit:           DelayRange::new(2.0, 9.0),
            dwell:             DelayRange::new(1.0, 5.0),
            dock_wait:         2.5,
            home:              Port::Origin,
            start_ports:       StartPorts::Random,
            fairness_bound:    8,
            max_trips:         Some(100),
            seed:              42,
            time_scale:        TimeScale::REAL_TIME,
            snapshot_interval: 0.5,
        }
    }
}

impl FerryConfig {
    /// Total number of vehicles across all classes.
    pub fn vehicle_count(&self) -> usize {
        self.classes.iter().map(|c| c.count as usize).sum()
    }

    /// Cost of the largest vehicle class that actually has vehicles.
    pub fn largest_cost(&self) -> u32 {
        self.classes
            .iter()
            .filter(|c| c.count > 0)
            .map(|c| c.cost)
            .max()
            .unwrap_or(0)
    }

    /// Reject anything the simulation cannot run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if self.toll_permits == 0 {
            return Err(ConfigError::ZeroTollPermits);
        }
        if self.fairness_bound == 0 {
            return Err(ConfigError::ZeroFairnessBound);
        }

        let mut seen: Vec<VehicleClass> = Vec::with_capacity(self.classes.len());
        for spec in &self.classes {
            if seen.contains(&spec.class) {
                return Err(ConfigError::DuplicateClass(spec.class));
            }
            seen.push(spec.class);

            if spec.count == 0 {
                continue;
            }
            if spec.cost == 0 {
                return Err(ConfigError::ZeroCost(spec.class));
            }
            if spec.cost > self.capacity {
                return Err(ConfigError::ClassExceedsCapacity {
                    class:    spec.class,
                    cost:     spec.cost,
                    capacity: self.capacity,
                });
            }
        }

        let count = self.vehicle_count();
        if count == 0 {
            return Err(ConfigError::NoVehicles);
        }
        if let StartPorts::Explicit(ports) = &self.start_ports {
            if ports.len() != count {
                return Err(ConfigError::StartPortCountMismatch {
                    expected: count,
                    got:      ports.len(),
                });
            }
        }

        for (what, range) in [
            ("toll delay", self.toll_delay),
            ("transit", self.transit),
            ("dwell", self.dwell),
        ] {
            if !range.is_valid() {
                return Err(ConfigError::InvalidRange { what, min: range.min, max: range.max });
            }
        }
        if !(self.dock_wait.is_finite() && self.dock_wait >= 0.0) {
            return Err(ConfigError::InvalidRange {
                what: "dock wait",
                min:  self.dock_wait,
                max:  self.dock_wait,
            });
        }
        if !(self.snapshot_interval.is_finite() && self.snapshot_interval > 0.0) {
            return Err(ConfigError::InvalidRange {
                what: "snapshot interval",
                min:  self.snapshot_interval,
                max:  self.snapshot_interval,
            });
        }
        if !self.time_scale.is_valid() {
            return Err(ConfigError::InvalidTimeScale(self.time_scale.secs_per_unit));
        }
        for (what, units) in [
            ("toll delay", self.toll_delay.max),
            ("transit", self.transit.max),
            ("dwell", self.dwell.max),
            ("dock wait", self.dock_wait),
            ("snapshot interval", self.snapshot_interval),
        ] {
            if !self.time_scale.fits(units) {
                return Err(ConfigError::DelayTooLong {
                    what,
                    units,
                    secs_per_unit: self.time_scale.secs_per_unit,
                });
            }
        }
        Ok(())
    }

    /// Resolve the population into one [`VehicleSpec`] per vehicle.
    ///
    /// Random start ports are drawn from `rng`; call after [`validate`][Self::validate].
    pub fn population(&self, rng: &mut SimRng) -> Vec<VehicleSpec> {
        let mut out = Vec::with_capacity(self.vehicle_count());
        for spec in &self.classes {
            for _ in 0..spec.count {
                let slot = out.len();
                let start = match &self.start_ports {
                    StartPorts::Random => {
                        if rng.gen_bool(0.5) { Port::Origin } else { Port::Destination }
                    }
                    StartPorts::All(port) => *port,
                    StartPorts::Explicit(ports) => ports[slot],
                };
                out.push(VehicleSpec {
                    id:    VehicleId::from_slot(slot),
                    class: spec.class,
                    cost:  spec.cost,
                    start,
                });
            }
        }
        out
    }
}
