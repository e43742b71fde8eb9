//! Simulated time.
//!
//! # Design
//!
//! Every delay in the simulation (toll processing, crossing, destination
//! dwell, dock wait) is expressed in abstract **units**.  A [`TimeScale`]
//! maps units onto wall-clock time:
//!
//!   wall = units * unit_duration
//!
//! The default maps one unit to one second; the CLI's `--speed` flag divides
//! that, and tests shrink it to a millisecond or less so a full round trip of
//! the whole population finishes quickly.
//!
//! Only simulated delays ever sleep.  Nothing in the core sleeps to pace a
//! polling loop; waits for state changes block on a condition variable.

use std::time::Duration;

use crate::SimRng;
use crate::VehicleRng;

// ── TimeScale ─────────────────────────────────────────────────────────────────

/// Longest wall-clock delay, in seconds, a single simulated wait may take.
///
/// Deadlines are built as `Instant::now() + delay`, which must not overflow.
pub const MAX_WALL_SECS: f64 = 1.0e9;

/// Converts between delay units and wall-clock `Duration`s.
///
/// `TimeScale` is cheap to copy and intentionally holds no heap data.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeScale {
    /// Wall-clock seconds one unit represents.
    pub secs_per_unit: f64,
}

impl TimeScale {
    /// One unit per second.
    pub const REAL_TIME: TimeScale = TimeScale { secs_per_unit: 1.0 };

    pub fn new(secs_per_unit: f64) -> Self {
        Self { secs_per_unit }
    }

    /// Real time sped up by `factor` (2.0 runs twice as fast).
    pub fn with_speed(factor: f64) -> Self {
        Self { secs_per_unit: 1.0 / factor }
    }

    /// `true` if conversion is well-defined.
    pub fn is_valid(&self) -> bool {
        self.secs_per_unit.is_finite() && self.secs_per_unit > 0.0
    }

    /// `true` if `units` maps to at most [`MAX_WALL_SECS`].
    pub fn fits(&self, units: f64) -> bool {
        units * self.secs_per_unit <= MAX_WALL_SECS
    }

    /// Wall-clock duration of `units`.  Negative or NaN values clamp to
    /// zero, and anything past [`MAX_WALL_SECS`] clamps to it.
    #[inline]
    pub fn to_duration(&self, units: f64) -> Duration {
        let secs = units * self.secs_per_unit;
        if secs.is_nan() || secs <= 0.0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(secs.min(MAX_WALL_SECS))
    }

    /// Units spanned by a wall-clock duration.
    #[inline]
    pub fn to_units(&self, wall: Duration) -> f64 {
        wall.as_secs_f64() / self.secs_per_unit
    }
}

impl Default for TimeScale {
    fn default() -> Self {
        Self::REAL_TIME
    }
}

// ── DelayRange ────────────────────────────────────────────────────────────────

/// An inclusive range of delay units, sampled uniformly.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DelayRange {
    pub min: f64,
    pub max: f64,
}

impl DelayRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// A degenerate range that always yields `units`.
    pub fn fixed(units: f64) -> Self {
        Self { min: units, max: units }
    }

    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min >= 0.0 && self.min <= self.max
    }

    /// Draw a delay using a vehicle's private RNG.
    pub fn sample(&self, rng: &mut VehicleRng) -> f64 {
        if self.min >= self.max {
            return self.min;
        }
        rng.gen_range(self.min..=self.max)
    }

    /// Draw a delay using the ferry's RNG.
    pub fn sample_sim(&self, rng: &mut SimRng) -> f64 {
        if self.min >= self.max {
            return self.min;
        }
        rng.gen_range(self.min..=self.max)
    }
}
