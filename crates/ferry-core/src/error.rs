//! Framework error types.
//!
//! Configuration problems are the only runtime errors the simulation core
//! knows about: every delay is simulated, so nothing can fail mid-run.  They
//! are detected once, before any actor exists, by
//! [`FerryConfig::validate`][crate::FerryConfig::validate].

use thiserror::Error;

use crate::VehicleClass;

/// A rejected start configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("vehicle population is empty")]
    NoVehicles,

    #[error("ferry capacity must be at least 1 unit")]
    ZeroCapacity,

    #[error("each port needs at least one toll permit")]
    ZeroTollPermits,

    #[error("{0} must cost at least 1 capacity unit")]
    ZeroCost(VehicleClass),

    #[error("{class} costs {cost} units but the ferry only holds {capacity}")]
    ClassExceedsCapacity {
        class:    VehicleClass,
        cost:     u32,
        capacity: u32,
    },

    #[error("{0} is listed more than once")]
    DuplicateClass(VehicleClass),

    #[error("{what} range [{min}, {max}] is invalid")]
    InvalidRange {
        what: &'static str,
        min:  f64,
        max:  f64,
    },

    #[error("time scale must be positive and finite, got {0}")]
    InvalidTimeScale(f64),

    #[error("{what} of {units} units at {secs_per_unit} s per unit is too long to wait for")]
    DelayTooLong {
        what:          &'static str,
        units:         f64,
        secs_per_unit: f64,
    },

    #[error("{got} explicit start ports given for {expected} vehicles")]
    StartPortCountMismatch { expected: usize, got: usize },

    #[error("fairness bound must be at least 1 cycle")]
    ZeroFairnessBound,
}

/// The top-level error type for `ferry-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Shorthand result type for all `ferry-*` crates.
pub type CoreResult<T> = Result<T, CoreError>;
