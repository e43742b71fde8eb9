//! Integration tests for ferry-sim: real threads under a fast time scale.

use ferry_core::{
    ClassSpec, DelayRange, FerryConfig, Port, StartPorts, TimeScale, VehicleClass, VehicleSpec,
};
use ferry_dock::{TripRecord, VehiclePhase};

use crate::{SimObserver, SimOutcome, SimSnapshot};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Deterministic delays, 2 ms per unit, and a dock wait long enough that the
/// ferry only leaves on `Full`, `NoDemand` or `Homecoming`.
fn fast_config(classes: Vec<ClassSpec>, capacity: u32) -> FerryConfig {
    FerryConfig {
        classes,
        capacity,
        toll_delay:        DelayRange::fixed(0.0),
        transit:           DelayRange::fixed(1.0),
        dwell:             DelayRange::fixed(1.0),
        dock_wait:         500.0,
        start_ports:       StartPorts::All(Port::Origin),
        max_trips:         None,
        time_scale:        TimeScale::new(0.002),
        snapshot_interval: 1.0,
        ..FerryConfig::default()
    }
}

/// The default population and delay ranges, sped up.
fn busy_config(secs_per_unit: f64) -> FerryConfig {
    FerryConfig {
        max_trips:         None,
        time_scale:        TimeScale::new(secs_per_unit),
        snapshot_interval: 5.0,
        ..FerryConfig::default()
    }
}

fn cars(n: u32) -> Vec<ClassSpec> {
    vec![ClassSpec::new(VehicleClass::Car, n)]
}

/// Checks every snapshot and trip it sees against the core invariants.
#[derive(Default)]
struct InvariantObserver {
    starts:    usize,
    ends:      usize,
    snapshots: usize,
    trips:     Vec<TripRecord>,
    failures:  Vec<String>,
}

impl SimObserver for InvariantObserver {
    fn on_start(&mut self, _config: &FerryConfig, _population: &[VehicleSpec]) {
        self.starts += 1;
    }

    fn on_trip(&mut self, trip: &TripRecord) {
        if trip.id.0 as usize != self.trips.len() {
            self.failures.push(format!("trip {} delivered out of order", trip.id.0));
        }
        self.trips.push(trip.clone());
    }

    fn on_snapshot(&mut self, snap: &SimSnapshot) {
        self.snapshots += 1;
        let ferry = &snap.ferry;
        if ferry.load > ferry.capacity {
            self.failures.push(format!("load {} > capacity {}", ferry.load, ferry.capacity));
        }
        let aboard: Vec<_> = ferry
            .vehicles
            .iter()
            .filter(|v| v.phase == VehiclePhase::Aboard)
            .collect();
        if aboard.len() != ferry.manifest.len()
            || aboard.iter().any(|v| !ferry.manifest.contains(&v.id))
        {
            self.failures.push(format!("manifest {:?} disagrees with aboard phases", ferry.manifest));
        }
        let cost: u32 = aboard.iter().map(|v| v.cost).sum();
        if cost != ferry.load {
            self.failures.push(format!("load {} but aboard vehicles cost {cost}", ferry.load));
        }
        if !ferry.violations.is_clean() {
            self.failures.push(format!("violations {:?}", ferry.violations));
        }
    }

    fn on_end(&mut self, _outcome: &SimOutcome) {
        self.ends += 1;
    }
}

fn assert_round_trips(outcome: &SimOutcome) {
    assert!(outcome.all_done(), "{} of {} done", outcome.completed, outcome.total);
    for v in &outcome.vehicles {
        assert_eq!(v.legs, 2, "{}", v.label);
        assert_eq!(v.final_port, v.start_port, "{}", v.label);
        assert!(v.completed);
        assert!(v.round_trip.is_some());
    }
}

// ── SimBuilder validation ─────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use ferry_core::{ConfigError, VehicleId};

    use super::*;
    use crate::{SimBuilder, SimError};

    #[test]
    fn builds_with_defaults() {
        let sim = SimBuilder::new(FerryConfig::default()).build().unwrap();
        assert_eq!(sim.population().len(), 30);
        assert_eq!(sim.population()[0].label(), "Car1");
        assert_eq!(sim.population()[12].label(), "Minibus13");
        assert_eq!(sim.population()[29].label(), "Truck30");

        let snap = sim.snapshot();
        assert_eq!(snap.ferry.side, Port::Origin);
        assert_eq!(snap.ferry.load, 0);
        assert_eq!((snap.completed, snap.total), (0, 30));
        assert_eq!(snap.booths[0].len(), 2);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = FerryConfig { capacity: 0, ..FerryConfig::default() };
        let err = SimBuilder::new(config).build().err().unwrap();
        assert!(matches!(err, SimError::Config(ConfigError::ZeroCapacity)));
    }

    #[test]
    fn time_scale_too_slow_is_rejected_before_running() {
        let config = FerryConfig { time_scale: TimeScale::with_speed(1e-300), ..FerryConfig::default() };
        let err = SimBuilder::new(config).build().err().unwrap();
        assert!(matches!(err, SimError::Config(ConfigError::DelayTooLong { .. })));
    }

    #[test]
    fn oversized_class_is_rejected() {
        let config = FerryConfig { capacity: 3, ..FerryConfig::default() };
        let err = SimBuilder::new(config).build().err().unwrap();
        assert!(matches!(
            err,
            SimError::Config(ConfigError::ClassExceedsCapacity { class: VehicleClass::Truck, .. })
        ));
    }

    #[test]
    fn explicit_start_ports_are_used() {
        let mut config = fast_config(cars(2), 2);
        config.start_ports = StartPorts::Explicit(vec![Port::Destination, Port::Origin]);
        let sim = SimBuilder::new(config).build().unwrap();
        assert_eq!(sim.population()[0].start, Port::Destination);
        assert_eq!(sim.population()[1].start, Port::Origin);
        assert_eq!(sim.population()[1].id, VehicleId(2));
    }

    #[test]
    fn same_seed_same_population() {
        let a = SimBuilder::new(FerryConfig::default()).build().unwrap();
        let b = SimBuilder::new(FerryConfig::default()).build().unwrap();
        assert_eq!(a.population(), b.population());
    }

    #[test]
    fn shared_stop_signal_is_used() {
        let stop = ferry_dock::StopSignal::new();
        let sim = SimBuilder::new(FerryConfig::default()).stop_signal(stop.clone()).build().unwrap();
        stop.raise(ferry_dock::StopCause::External);
        assert!(sim.stop_handle().is_raised());
    }
}

#[cfg(test)]
mod panic_guard_tests {
    use std::thread;

    use ferry_dock::{StopCause, StopSignal};

    use crate::sim::PanicGuard;

    #[test]
    fn unwinding_actor_raises_actor_failed() {
        let stop = StopSignal::new();
        let joined = thread::scope(|scope| {
            scope
                .spawn(|| {
                    let _guard = PanicGuard(&stop);
                    panic!("actor blew up");
                })
                .join()
        });
        assert!(joined.is_err());
        assert_eq!(stop.cause(), Some(StopCause::ActorFailed));
    }

    #[test]
    fn clean_exit_leaves_the_signal_alone() {
        let stop = StopSignal::new();
        drop(PanicGuard(&stop));
        assert!(!stop.is_raised());
    }
}

// ── Concrete scenarios ────────────────────────────────────────────────────────

#[cfg(test)]
mod scenario_tests {
    use ferry_core::VehicleId;
    use ferry_dock::DepartureReason;

    use super::*;
    use crate::SimBuilder;

    #[test]
    fn single_vehicle_single_slot_makes_two_trips() {
        let sim = SimBuilder::new(fast_config(cars(1), 1)).build().unwrap();
        let mut obs = InvariantObserver::default();
        let outcome = sim.run(&mut obs).unwrap();

        assert_eq!(outcome.trips.len(), 2);
        for trip in &outcome.trips {
            assert_eq!(trip.vehicles, vec![VehicleId(1)]);
            assert_eq!(trip.capacity_used, 1);
            assert_eq!(trip.reason, DepartureReason::Full);
        }
        assert_eq!(outcome.trips[0].direction.from, Port::Origin);
        assert_eq!(outcome.trips[1].direction.from, Port::Destination);
        assert_eq!(outcome.stop_cause, None);
        assert_round_trips(&outcome);
        assert!(obs.failures.is_empty(), "{:?}", obs.failures);
    }

    #[test]
    fn three_vehicles_two_slots_split_two_then_one() {
        let sim = SimBuilder::new(fast_config(cars(3), 2)).build().unwrap();
        let mut obs = InvariantObserver::default();
        let outcome = sim.run(&mut obs).unwrap();

        let from_origin: Vec<usize> = outcome
            .trips
            .iter()
            .filter(|t| t.direction.from == Port::Origin)
            .map(|t| t.vehicles.len())
            .collect();
        assert_eq!(&from_origin[..2], &[2, 1]);
        assert_eq!(from_origin.iter().take(2).sum::<usize>(), 3);

        // Nobody crosses twice from Origin before everyone crossed once.
        let mut carried: Vec<VehicleId> = outcome
            .trips
            .iter()
            .filter(|t| t.direction.from == Port::Origin)
            .take(2)
            .flat_map(|t| t.vehicles.clone())
            .collect();
        carried.sort();
        assert_eq!(carried, vec![VehicleId(1), VehicleId(2), VehicleId(3)]);

        assert_eq!(outcome.trips.len(), 4);
        assert_round_trips(&outcome);
        assert!(obs.failures.is_empty(), "{:?}", obs.failures);
    }

    #[test]
    fn empty_first_crossing_and_homecoming() {
        let mut config = fast_config(cars(1), 1);
        config.start_ports = StartPorts::All(Port::Destination);
        let outcome = SimBuilder::new(config).build().unwrap().run(&mut InvariantObserver::default()).unwrap();

        let reasons: Vec<DepartureReason> = outcome.trips.iter().map(|t| t.reason).collect();
        assert_eq!(
            reasons,
            vec![
                DepartureReason::NoDemand,
                DepartureReason::Full,
                DepartureReason::Full,
                DepartureReason::Homecoming,
            ],
        );
        assert_eq!(outcome.empty_trips(), 2);
        assert_eq!(outcome.last.side, Port::Origin);
        assert_round_trips(&outcome);
    }

    #[test]
    fn cancellation_mid_run_terminates_cleanly() {
        use std::time::{Duration, Instant};

        use ferry_dock::StopCause;

        let sim = SimBuilder::new(busy_config(0.05)).build().unwrap();
        let stop = sim.stop_handle();
        let stopper = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(150));
            stop.raise(StopCause::External);
            Instant::now()
        });

        let mut obs = InvariantObserver::default();
        let outcome = sim.run(&mut obs).unwrap();
        let raised_at = stopper.join().unwrap();
        assert!(raised_at.elapsed() < Duration::from_secs(2), "slow shutdown");

        assert_eq!(outcome.stop_cause, Some(StopCause::External));
        assert!(!outcome.all_done());
        assert_eq!(outcome.last.load, 0);
        assert!(outcome.last.manifest.is_empty());
        assert!(!outcome.last.in_transit);
        assert!(outcome.last.vehicles.iter().all(|v| v.phase.is_terminal()));
        assert!(outcome.violations.is_clean());
        assert!(obs.failures.is_empty(), "{:?}", obs.failures);
    }
}

// ── Whole-population runs ─────────────────────────────────────────────────────

#[cfg(test)]
mod run_tests {
    use ferry_dock::StopCause;

    use super::*;
    use crate::{NoopObserver, SimBuilder};

    #[test]
    fn default_population_completes() {
        let sim = SimBuilder::new(busy_config(0.0005)).build().unwrap();
        let mut obs = InvariantObserver::default();
        let outcome = sim.run(&mut obs).unwrap();

        assert_round_trips(&outcome);
        assert_eq!(outcome.stop_cause, None);
        assert!(outcome.violations.is_clean());
        assert_eq!(outcome.last.side, Port::Origin);
        assert!(obs.failures.is_empty(), "{:?}", obs.failures);
        assert_eq!(obs.trips, outcome.trips);
        assert_eq!((obs.starts, obs.ends), (1, 1));
        assert!(obs.snapshots >= 1);

        // Every vehicle crossed exactly twice.
        let crossings: usize = outcome.trips.iter().map(|t| t.vehicles.len()).sum();
        assert_eq!(crossings, 60);
        for trip in &outcome.trips {
            assert!(trip.capacity_used <= 20);
        }
    }

    #[test]
    fn tight_capacity_still_completes() {
        let classes = vec![
            ClassSpec::new(VehicleClass::Car, 6),
            ClassSpec::new(VehicleClass::Minibus, 4),
            ClassSpec::new(VehicleClass::Truck, 3),
        ];
        let config = FerryConfig {
            classes,
            capacity: 5,
            start_ports: StartPorts::Random,
            ..busy_config(0.0005)
        };
        let outcome = SimBuilder::new(config).build().unwrap().run(&mut NoopObserver).unwrap();
        assert_round_trips(&outcome);
        assert!(outcome.violations.is_clean());
    }

    #[test]
    fn trip_limit_stops_the_run() {
        let config = FerryConfig { max_trips: Some(3), ..busy_config(0.0005) };
        let outcome = SimBuilder::new(config).build().unwrap().run(&mut NoopObserver).unwrap();

        assert_eq!(outcome.trips.len(), 3);
        assert_eq!(outcome.stop_cause, Some(StopCause::TripLimit));
        assert!(outcome.last.vehicles.iter().all(|v| v.phase.is_terminal()));
        assert_eq!(outcome.last.load, 0);
    }

    #[test]
    fn reports_carry_timings() {
        let outcome = SimBuilder::new(fast_config(cars(1), 1))
            .build()
            .unwrap()
            .run(&mut NoopObserver)
            .unwrap();
        let report = &outcome.vehicles[0];
        assert_eq!(report.label, "Car1");
        // Crossing is one unit each way; allow scheduler slack.
        for port in Port::BOTH {
            assert!(report.crossing[port.index()] >= 0.9, "{:?}", report.crossing);
        }
        let round_trip = report.round_trip.unwrap();
        assert!(round_trip >= report.crossing.iter().sum::<f64>());
        assert!(outcome.elapsed >= round_trip);
    }

    #[test]
    fn paired_observers_both_see_everything() {
        let sim = SimBuilder::new(fast_config(cars(2), 2)).build().unwrap();
        let mut a = InvariantObserver::default();
        let mut b = InvariantObserver::default();
        let outcome = sim.run(&mut (&mut a, &mut b)).unwrap();
        assert_eq!(a.trips, outcome.trips);
        assert_eq!(b.trips, outcome.trips);
        assert_eq!((a.ends, b.ends), (1, 1));
    }

    #[test]
    fn absent_observer_is_skipped() {
        let sim = SimBuilder::new(fast_config(cars(2), 2)).build().unwrap();
        let mut present = Some(InvariantObserver::default());
        let mut absent: Option<InvariantObserver> = None;
        let outcome = sim.run(&mut (&mut present, &mut absent)).unwrap();
        let present = present.unwrap();
        assert_eq!(present.trips, outcome.trips);
        assert_eq!(present.ends, 1);
    }
}
