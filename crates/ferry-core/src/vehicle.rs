//! Vehicle classes and their capacity-unit costs.

use std::fmt;

/// The fixed set of vehicle classes.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VehicleClass {
    Car,
    Minibus,
    Truck,
}

impl VehicleClass {
    pub const ALL: [VehicleClass; 3] = [VehicleClass::Car, VehicleClass::Minibus, VehicleClass::Truck];

    /// Capacity units this class occupies unless the configuration overrides it.
    pub fn default_cost(self) -> u32 {
        match self {
            VehicleClass::Car => 1,
            VehicleClass::Minibus => 2,
            VehicleClass::Truck => 4,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            VehicleClass::Car => "Car",
            VehicleClass::Minibus => "Minibus",
            VehicleClass::Truck => "Truck",
        }
    }
}

impl fmt::Display for VehicleClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How many vehicles of one class take part, and what each one costs.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClassSpec {
    pub class: VehicleClass,
    pub count: u32,
    /// Capacity units per vehicle.
    pub cost:  u32,
}

impl ClassSpec {
    /// `count` vehicles of `class` at the class's default cost.
    pub fn new(class: VehicleClass, count: u32) -> Self {
        Self { class, count, cost: class.default_cost() }
    }

    pub fn with_cost(mut self, cost: u32) -> Self {
        self.cost = cost;
        self
    }
}
