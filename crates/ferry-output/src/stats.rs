//! End-of-run statistics over a [`SimOutcome`].
//!
//! All times are in delay units.  Per-side and per-class averages divide by
//! the number of vehicles in the group, so vehicles that never crossed from a
//! side pull that side's average down.

use std::fmt;

use ferry_core::{Port, VehicleClass};
use ferry_sim::SimOutcome;
use serde::Serialize;

use crate::row::percent;

/// Total-wait ratio above which starvation risk is reported as high.
pub const STARVATION_RATIO_LIMIT: f64 = 3.0;

/// Mean, extremes and population standard deviation of a sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Spread {
    pub avg:     f64,
    pub min:     f64,
    pub max:     f64,
    pub std_dev: f64,
}

impl Spread {
    /// `None` for an empty sample.
    pub fn of(values: &[f64]) -> Option<Spread> {
        if values.is_empty() {
            return None;
        }
        let n = values.len() as f64;
        let avg = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / n;
        Some(Spread {
            avg,
            min: values.iter().copied().fold(f64::INFINITY, f64::min),
            max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            std_dev: variance.sqrt(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StarvationRisk {
    Low,
    High,
}

impl fmt::Display for StarvationRisk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StarvationRisk::Low => "Low",
            StarvationRisk::High => "High",
        })
    }
}

/// Aggregate figures for one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimStatistics {
    pub vehicles:          usize,
    pub completed:         usize,
    pub trips:             usize,
    pub duration:          f64,
    /// Average queue wait per vehicle, indexed by the port waited at.
    pub avg_wait:          [f64; 2],
    /// Average time aboard per vehicle, indexed by departure port.
    pub avg_crossing:      [f64; 2],
    /// Average total wait for each class present in the population.
    pub avg_wait_by_class: Vec<(VehicleClass, f64)>,
    /// Average total wait, indexed by starting port.
    pub avg_wait_by_start: [f64; 2],
    /// Round-trip spread over vehicles that completed.
    pub round_trip:        Option<Spread>,
    /// Capacity used over capacity offered, in percent.
    pub utilization:       f64,
    pub empty_trips:       usize,
    pub empty_percent:     f64,
    /// Time aboard leaving Origin relative to time aboard leaving
    /// Destination, in percent.
    pub direction_balance: f64,
    pub max_wait:          f64,
    /// Smallest non-zero total wait.
    pub min_wait:          f64,
    pub starvation_ratio:  f64,
    pub starvation_risk:   StarvationRisk,
    /// Vehicles flagged for exceeding the fairness bound.
    pub starvation_flags:  usize,
}

impl SimStatistics {
    pub fn compute(outcome: &SimOutcome, capacity: u32) -> Self {
        let vehicles = &outcome.vehicles;
        let n = vehicles.len();
        let mean = |sum: f64, count: usize| if count > 0 { sum / count as f64 } else { 0.0 };

        let mut wait = [0.0; 2];
        let mut crossing = [0.0; 2];
        let mut by_start = [(0.0, 0usize); 2];
        let mut by_class: Vec<(VehicleClass, f64, usize)> = Vec::new();
        let mut max_wait: f64 = 0.0;
        let mut min_wait = f64::INFINITY;

        for v in vehicles {
            let total = v.total_wait();
            for side in Port::BOTH {
                wait[side.index()] += v.wait[side.index()];
                crossing[side.index()] += v.crossing[side.index()];
            }

            let start = &mut by_start[v.start_port.index()];
            start.0 += total;
            start.1 += 1;

            match by_class.iter_mut().find(|(c, _, _)| *c == v.class) {
                Some(entry) => {
                    entry.1 += total;
                    entry.2 += 1;
                }
                None => by_class.push((v.class, total, 1)),
            }

            max_wait = max_wait.max(total);
            if total > 0.0 {
                min_wait = min_wait.min(total);
            }
        }
        by_class.sort_by_key(|(c, _, _)| *c);
        if !min_wait.is_finite() {
            min_wait = 0.0;
        }

        let round_trips: Vec<f64> = vehicles.iter().filter_map(|v| v.round_trip).collect();

        let trips = outcome.trips.len();
        let used: f64 = outcome.trips.iter().map(|t| t.capacity_used as f64).sum();
        let empty_trips = outcome.empty_trips();

        let o = Port::Origin.index();
        let d = Port::Destination.index();
        let starvation_ratio = max_wait / if min_wait > 0.0 { min_wait } else { 1.0 };

        SimStatistics {
            vehicles:          n,
            completed:         outcome.completed,
            trips,
            duration:          outcome.elapsed,
            avg_wait:          [mean(wait[o], n), mean(wait[d], n)],
            avg_crossing:      [mean(crossing[o], n), mean(crossing[d], n)],
            avg_wait_by_class: by_class.into_iter().map(|(c, sum, k)| (c, mean(sum, k))).collect(),
            avg_wait_by_start: [
                mean(by_start[o].0, by_start[o].1),
                mean(by_start[d].0, by_start[d].1),
            ],
            round_trip:        Spread::of(&round_trips),
            utilization:       percent(used, trips as f64 * capacity as f64),
            empty_trips,
            empty_percent:     percent(empty_trips as f64, trips as f64),
            direction_balance: percent(crossing[o], if crossing[d] > 0.0 { crossing[d] } else { 1.0 }),
            max_wait,
            min_wait,
            starvation_ratio,
            starvation_risk:   if starvation_ratio > STARVATION_RATIO_LIMIT {
                StarvationRisk::High
            } else {
                StarvationRisk::Low
            },
            starvation_flags:  outcome.starvation.len(),
        }
    }
}
