//! Unit tests for the ferry-dock synchronization primitives.

#[cfg(test)]
mod fixtures {
    use std::sync::Arc;

    use ferry_core::{Port, VehicleClass, VehicleId, VehicleSpec};

    use crate::{FerryState, StopListener, StopSignal};

    pub fn class_for(cost: u32) -> VehicleClass {
        match cost {
            1 => VehicleClass::Car,
            2 => VehicleClass::Minibus,
            _ => VehicleClass::Truck,
        }
    }

    /// One vehicle per `(cost, start)` pair, ids from 1.
    pub fn specs(vehicles: &[(u32, Port)]) -> Vec<VehicleSpec> {
        vehicles
            .iter()
            .enumerate()
            .map(|(slot, &(cost, start))| VehicleSpec {
                id: VehicleId::from_slot(slot),
                class: class_for(cost),
                cost,
                start,
            })
            .collect()
    }

    /// A registered state docked at Origin.
    pub fn state(vehicles: &[(u32, Port)], capacity: u32, fairness: u32) -> (Arc<FerryState>, StopSignal) {
        let stop = StopSignal::new();
        let state = Arc::new(FerryState::new(&specs(vehicles), capacity, Port::Origin, fairness, stop.clone()));
        let listener: Arc<dyn StopListener> = state.clone();
        stop.register(&listener);
        (state, stop)
    }

    pub fn queue(state: &FerryState, id: u32) {
        state.enter_toll(VehicleId(id));
        state.enqueue(VehicleId(id));
    }
}

#[cfg(test)]
mod stop {
    use std::thread;
    use std::time::{Duration, Instant};

    use crate::{Sleep, StopCause, StopSignal};

    #[test]
    fn first_raise_wins() {
        let stop = StopSignal::new();
        assert!(!stop.is_raised());
        assert_eq!(stop.cause(), None);

        assert!(stop.raise(StopCause::TripLimit));
        assert!(!stop.raise(StopCause::External));
        assert!(stop.is_raised());
        assert_eq!(stop.cause(), Some(StopCause::TripLimit));
    }

    #[test]
    fn sleep_runs_to_completion() {
        let stop = StopSignal::new();
        let t0 = Instant::now();
        assert_eq!(stop.sleep(Duration::from_millis(20)), Sleep::Completed);
        assert!(t0.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn raise_interrupts_sleep() {
        let stop = StopSignal::new();
        let sleeper = {
            let stop = stop.clone();
            thread::spawn(move || {
                let t0 = Instant::now();
                (stop.sleep(Duration::from_secs(30)), t0.elapsed())
            })
        };
        thread::sleep(Duration::from_millis(20));
        stop.raise(StopCause::External);

        let (outcome, slept) = sleeper.join().unwrap();
        assert_eq!(outcome, Sleep::Interrupted);
        assert!(slept < Duration::from_secs(5), "slept {slept:?}");
    }

    #[test]
    fn sleep_after_raise_returns_immediately() {
        let stop = StopSignal::new();
        stop.raise(StopCause::External);
        assert_eq!(stop.sleep(Duration::from_secs(30)), Sleep::Interrupted);
    }
}

#[cfg(test)]
mod toll {
    use std::sync::Arc;
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;

    use ferry_core::{Port, VehicleId};

    use crate::{StopCause, StopListener, StopSignal, TollGate, TollPlaza};

    #[test]
    fn booths_are_numbered_and_freed_on_drop() {
        let gate = TollGate::new(Port::Origin, 2, StopSignal::new());
        let a = gate.acquire(VehicleId(1)).unwrap();
        let b = gate.acquire(VehicleId(2)).unwrap();
        assert_eq!((a.booth(), b.booth()), (0, 1));
        assert_eq!(gate.in_use(), 2);
        assert_eq!(gate.occupancy(), vec![Some(VehicleId(1)), Some(VehicleId(2))]);

        drop(a);
        assert_eq!(gate.in_use(), 1);
        let c = gate.acquire(VehicleId(3)).unwrap();
        assert_eq!(c.booth(), 0);
        assert_eq!(c.vehicle(), VehicleId(3));
        assert_eq!(c.port(), Port::Origin);
    }

    #[test]
    fn waiter_gets_booth_when_released() {
        let gate = Arc::new(TollGate::new(Port::Destination, 1, StopSignal::new()));
        let held = gate.acquire(VehicleId(1)).unwrap();

        let (tx, rx) = mpsc::channel();
        let waiter = {
            let gate = Arc::clone(&gate);
            thread::spawn(move || {
                let permit = gate.acquire(VehicleId(2)).map(|p| p.booth());
                tx.send(permit).unwrap();
            })
        };

        assert!(rx.recv_timeout(Duration::from_millis(50)).is_err(), "acquired a held booth");
        drop(held);
        assert_eq!(rx.recv_timeout(Duration::from_secs(5)).unwrap(), Some(0));
        waiter.join().unwrap();
        assert_eq!(gate.in_use(), 0);
    }

    #[test]
    fn never_more_holders_than_booths() {
        let gate = Arc::new(TollGate::new(Port::Origin, 2, StopSignal::new()));
        let handles: Vec<_> = (1..=16)
            .map(|n| {
                let gate = Arc::clone(&gate);
                thread::spawn(move || {
                    for _ in 0..20 {
                        let _permit = gate.acquire(VehicleId(n)).unwrap();
                        assert!(gate.in_use() <= 2);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(gate.in_use(), 0);
    }

    #[test]
    fn stop_releases_waiters() {
        let stop = StopSignal::new();
        let plaza = Arc::new(TollPlaza::new(1, &stop));
        let listener: Arc<dyn StopListener> = plaza.clone();
        stop.register(&listener);

        let _held = plaza.gate(Port::Origin).acquire(VehicleId(1)).unwrap();
        let waiter = {
            let plaza = Arc::clone(&plaza);
            thread::spawn(move || plaza.gate(Port::Origin).acquire(VehicleId(2)).is_none())
        };
        thread::sleep(Duration::from_millis(20));
        stop.raise(StopCause::External);
        assert!(waiter.join().unwrap());
    }

    #[test]
    fn plaza_keeps_ports_separate() {
        let plaza = TollPlaza::new(1, &StopSignal::new());
        let _o = plaza.gate(Port::Origin).acquire(VehicleId(1)).unwrap();
        let d = plaza.gate(Port::Destination).acquire(VehicleId(2)).unwrap();
        assert_eq!(d.port(), Port::Destination);
        assert_eq!(plaza.occupancy(), [vec![Some(VehicleId(1))], vec![Some(VehicleId(2))]]);
    }
}

#[cfg(test)]
mod termination {
    use std::sync::Arc;
    use std::thread;

    use crate::TerminationDetector;

    #[test]
    fn counts_to_total() {
        let det = TerminationDetector::new(2);
        assert!(!det.all_done());
        assert_eq!(det.report(), 1);
        assert!(!det.all_done());
        assert_eq!(det.report(), 2);
        assert!(det.all_done());
        assert_eq!(det.total(), 2);
    }

    #[test]
    fn empty_population_is_done() {
        assert!(TerminationDetector::new(0).all_done());
    }

    #[test]
    fn concurrent_reports_are_not_lost() {
        let det = Arc::new(TerminationDetector::new(64));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let det = Arc::clone(&det);
                thread::spawn(move || {
                    for _ in 0..8 {
                        det.report();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(det.completed(), 64);
        assert!(det.all_done());
    }
}

#[cfg(test)]
mod trip_log {
    use ferry_core::{Port, VehicleId};

    use super::fixtures;
    use crate::DepartureReason;

    #[test]
    fn records_are_appended_in_departure_order() {
        let (state, _stop) = fixtures::state(&[(1, Port::Origin)], 5, 8);
        fixtures::queue(&state, 1);
        state.board(VehicleId(1));

        let first = state.depart(DepartureReason::Full, 3.0);
        state.arrive();
        let second = state.depart(DepartureReason::NoDemand, 4.0);

        let log = state.trips();
        assert_eq!(log.len(), 2);
        assert_eq!(first.id.0, 0);
        assert_eq!(second.id.0, 1);
        assert_eq!(first.vehicles, vec![VehicleId(1)]);
        assert_eq!(first.capacity_used, 1);
        assert!(second.is_empty());
        assert_eq!(log.since(1), vec![second.clone()]);
        assert!(log.since(2).is_empty());
        assert!(log.since(10).is_empty());
        assert_eq!(log.last(), Some(second));
    }

    #[test]
    fn reason_names() {
        assert_eq!(DepartureReason::Full.as_str(), "full");
        assert_eq!(DepartureReason::NoDemand.as_str(), "no-demand");
        assert_eq!(DepartureReason::DockTimeout.as_str(), "dock-timeout");
        assert_eq!(DepartureReason::Homecoming.as_str(), "homecoming");
    }
}

#[cfg(test)]
mod admission {
    use std::sync::Arc;
    use std::thread;
    use std::time::{Duration, Instant};

    use ferry_core::{Port, VehicleId};

    use super::fixtures;
    use crate::{Admission, Arrival, DepartureReason, StopCause, VehiclePhase};

    fn wait_for(mut pred: impl FnMut() -> bool) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while !pred() {
            assert!(Instant::now() < deadline, "condition never held");
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn boarding_adds_cost_and_manifest_entry() {
        let (state, _stop) = fixtures::state(&[(2, Port::Origin), (4, Port::Origin)], 10, 8);
        fixtures::queue(&state, 1);
        fixtures::queue(&state, 2);

        assert_eq!(state.board(VehicleId(2)), Admission::Boarded(ferry_core::TripId(0)));
        assert_eq!(state.board(VehicleId(1)), Admission::Boarded(ferry_core::TripId(0)));

        let snap = state.snapshot();
        assert_eq!(snap.load, 6);
        assert_eq!(snap.manifest, vec![VehicleId(2), VehicleId(1)]);
        assert_eq!(snap.at(Port::Origin, VehiclePhase::Aboard).count(), 2);
        assert!(snap.violations.is_clean());
    }

    #[test]
    fn concurrent_boarding_never_exceeds_capacity() {
        let vehicles: Vec<_> = (0..20).map(|_| (1, Port::Origin)).collect();
        let (state, stop) = fixtures::state(&vehicles, 10, 8);
        for id in 1..=20 {
            fixtures::queue(&state, id);
        }

        let handles: Vec<_> = (1..=20)
            .map(|id| {
                let state = Arc::clone(&state);
                thread::spawn(move || state.board(VehicleId(id)))
            })
            .collect();

        wait_for(|| state.snapshot().load == 10);
        stop.raise(StopCause::External);

        let outcomes: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let boarded = outcomes.iter().filter(|a| matches!(a, Admission::Boarded(_))).count();
        assert_eq!(boarded, 10);

        let snap = state.snapshot();
        assert_eq!(snap.load, 10);
        assert_eq!(snap.manifest.len(), 10);
        assert_eq!(snap.violations.over_capacity, 0);
    }

    #[test]
    fn mixed_costs_fill_without_overshoot() {
        let vehicles = [
            (4, Port::Origin),
            (4, Port::Origin),
            (2, Port::Origin),
            (2, Port::Origin),
            (1, Port::Origin),
            (4, Port::Origin),
        ];
        let (state, stop) = fixtures::state(&vehicles, 7, 8);
        for id in 1..=6 {
            fixtures::queue(&state, id);
        }
        let handles: Vec<_> = (1..=6)
            .map(|id| {
                let state = Arc::clone(&state);
                thread::spawn(move || state.board(VehicleId(id)))
            })
            .collect();

        // Every vehicle has either boarded or cannot fit what is left.
        wait_for(|| {
            let snap = state.snapshot();
            let remaining = snap.capacity - snap.load;
            snap.at(Port::Origin, VehiclePhase::Queued).all(|v| v.cost > remaining)
        });
        stop.raise(StopCause::External);
        for h in handles {
            h.join().unwrap();
        }

        let snap = state.snapshot();
        let aboard: u32 = snap.at(Port::Origin, VehiclePhase::Aboard).map(|v| v.cost).sum();
        assert_eq!(aboard, snap.load);
        assert!(snap.load <= 7);
        assert!(snap.violations.is_clean());
    }

    #[test]
    fn no_admission_at_the_other_port() {
        let (state, _stop) = fixtures::state(&[(1, Port::Destination)], 5, 8);
        fixtures::queue(&state, 1);

        let waiter = {
            let state = Arc::clone(&state);
            thread::spawn(move || state.board(VehicleId(1)))
        };
        thread::sleep(Duration::from_millis(30));
        assert_eq!(state.snapshot().load, 0);

        // Crossing empty to Destination admits the waiter.
        state.depart(DepartureReason::NoDemand, 1.0);
        state.arrive();
        assert!(matches!(waiter.join().unwrap(), Admission::Boarded(_)));
        assert_eq!(state.snapshot().load, 1);
    }

    #[test]
    fn no_admission_while_in_transit() {
        let (state, _stop) = fixtures::state(&[(1, Port::Origin), (1, Port::Origin)], 5, 8);
        fixtures::queue(&state, 1);
        state.board(VehicleId(1));
        let trip = state.depart(DepartureReason::DockTimeout, 1.0);
        fixtures::queue(&state, 2);

        let late = {
            let state = Arc::clone(&state);
            thread::spawn(move || state.board(VehicleId(2)))
        };
        thread::sleep(Duration::from_millis(30));
        assert_eq!(state.snapshot().manifest, trip.vehicles);

        // Arrive at Destination, then come back for the late vehicle.
        state.arrive();
        state.depart(DepartureReason::NoDemand, 1.0);
        state.arrive();
        assert!(matches!(late.join().unwrap(), Admission::Boarded(ferry_core::TripId(2))));
    }

    #[test]
    fn arrival_moves_vehicles_and_counts_legs() {
        let (state, _stop) = fixtures::state(&[(2, Port::Origin)], 5, 8);
        fixtures::queue(&state, 1);
        state.board(VehicleId(1));

        let rider = {
            let state = Arc::clone(&state);
            thread::spawn(move || state.await_arrival(VehicleId(1)))
        };
        state.depart(DepartureReason::NoDemand, 2.0);
        let (port, released) = state.arrive();

        assert_eq!(port, Port::Destination);
        assert_eq!(released, vec![VehicleId(1)]);
        assert_eq!(rider.join().unwrap(), Arrival::Landed { port: Port::Destination, legs: 1 });

        let snap = state.snapshot();
        assert_eq!(snap.side, Port::Destination);
        assert_eq!(snap.load, 0);
        assert!(snap.manifest.is_empty());
        assert!(!snap.in_transit);
        assert_eq!((snap.departures, snap.arrivals), (1, 1));
        assert!(snap.violations.is_clean());

        let records = state.vehicle_records();
        let leg = records[0].timeline.legs[0];
        assert_eq!(leg.from, Some(Port::Origin));
        assert!(leg.queued.unwrap() <= leg.boarded.unwrap());
        assert!(leg.boarded.unwrap() <= leg.arrived.unwrap());
    }
}

#[cfg(test)]
mod departure {
    use std::sync::Arc;
    use std::thread;
    use std::time::{Duration, Instant};

    use ferry_core::{Port, VehicleId};

    use super::fixtures;
    use crate::{
        DepartureReason, DepartureTerms, DockDecision, FerryState, StopCause, TerminationDetector,
    };

    fn terms(deadline: Instant) -> DepartureTerms {
        DepartureTerms { deadline, duration: 1.0, max_trips: None }
    }

    fn soon() -> DepartureTerms {
        terms(Instant::now() + Duration::from_secs(5))
    }

    /// Reason of a departure; panics on any other decision.
    fn departed(state: &FerryState, terms: DepartureTerms, det: &TerminationDetector) -> DepartureReason {
        match state.await_departure(terms, det) {
            DockDecision::Depart(trip) => trip.reason,
            other => panic!("expected a departure, got {other:?}"),
        }
    }

    #[test]
    fn full_when_load_reaches_capacity() {
        let (state, _stop) = fixtures::state(&[(4, Port::Origin), (1, Port::Origin)], 4, 8);
        let det = TerminationDetector::new(2);
        fixtures::queue(&state, 1);
        state.board(VehicleId(1));
        assert_eq!(departed(&state, soon(), &det), DepartureReason::Full);
    }

    #[test]
    fn full_when_nobody_pending_fits() {
        let (state, _stop) = fixtures::state(&[(4, Port::Origin), (4, Port::Origin)], 5, 8);
        let det = TerminationDetector::new(2);
        fixtures::queue(&state, 1);
        state.board(VehicleId(1));
        assert_eq!(departed(&state, soon(), &det), DepartureReason::Full);
    }

    #[test]
    fn no_demand_when_port_is_empty() {
        let (state, _stop) = fixtures::state(&[(1, Port::Destination)], 5, 8);
        let det = TerminationDetector::new(1);
        assert_eq!(departed(&state, soon(), &det), DepartureReason::NoDemand);
    }

    #[test]
    fn dock_timeout_when_demand_stays_unmet() {
        let (state, _stop) = fixtures::state(&[(1, Port::Origin)], 5, 8);
        let det = TerminationDetector::new(1);
        let t0 = Instant::now();
        let reason = departed(&state, terms(t0 + Duration::from_millis(30)), &det);
        assert_eq!(reason, DepartureReason::DockTimeout);
        assert!(t0.elapsed() >= Duration::from_millis(30));
    }

    #[test]
    fn halt_at_home_and_homecoming_elsewhere() {
        let (state, _stop) = fixtures::state(&[(1, Port::Origin)], 5, 8);
        let det = TerminationDetector::new(1);
        state.complete(VehicleId(1), &det);
        assert_eq!(state.await_departure(soon(), &det), DockDecision::Halt);

        let (away, _stop) = fixtures::state(&[(1, Port::Origin)], 5, 8);
        away.depart(DepartureReason::NoDemand, 1.0);
        away.arrive();
        let det = TerminationDetector::new(1);
        away.complete(VehicleId(1), &det);
        assert_eq!(departed(&away, soon(), &det), DepartureReason::Homecoming);
    }

    #[test]
    fn decision_and_freeze_are_one_step() {
        // Two cars queued, room for three: the ferry times out with both
        // aboard, and a third car queued afterwards cannot slip in.
        let (state, _stop) = fixtures::state(&[(1, Port::Origin), (1, Port::Origin), (1, Port::Origin)], 3, 8);
        let det = TerminationDetector::new(3);
        for id in 1..=2 {
            fixtures::queue(&state, id);
            state.board(VehicleId(id));
        }

        let trip = match state.await_departure(terms(Instant::now() + Duration::from_millis(20)), &det) {
            DockDecision::Depart(trip) => trip,
            other => panic!("expected a departure, got {other:?}"),
        };
        assert_eq!(trip.reason, DepartureReason::DockTimeout);
        assert_eq!(trip.capacity_used, 2);
        assert_eq!(trip.duration, 1.0);
        assert_eq!(state.trips().all(), vec![trip.clone()]);

        let snap = state.snapshot();
        assert!(snap.in_transit);
        assert_eq!(snap.manifest, trip.vehicles);

        fixtures::queue(&state, 3);
        let late = {
            let state = Arc::clone(&state);
            thread::spawn(move || state.board(VehicleId(3)))
        };
        thread::sleep(Duration::from_millis(30));
        assert_eq!(state.snapshot().load, 2);

        state.arrive();
        state.depart(DepartureReason::NoDemand, 1.0);
        state.arrive();
        late.join().unwrap();
        assert_eq!(state.snapshot().load, 1);
    }

    #[test]
    fn trip_limit_keeps_the_ferry_docked() {
        let (state, _stop) = fixtures::state(&[(1, Port::Destination)], 5, 8);
        let det = TerminationDetector::new(1);
        let limited = DepartureTerms { max_trips: Some(1), ..soon() };

        assert_eq!(departed(&state, limited, &det), DepartureReason::NoDemand);
        state.arrive();
        // Everyone done away from home would mean a homecoming trip.
        state.complete(VehicleId(1), &det);
        assert_eq!(state.await_departure(limited, &det), DockDecision::TripLimit);

        let snap = state.snapshot();
        assert!(!snap.in_transit);
        assert_eq!(snap.departures, 1);
        assert_eq!(state.trips().len(), 1);
    }

    #[test]
    fn halt_closes_admissions() {
        let (state, stop) = fixtures::state(&[(1, Port::Origin), (1, Port::Origin)], 5, 8);
        let det = TerminationDetector::new(1);
        state.complete(VehicleId(1), &det);
        assert_eq!(state.await_departure(soon(), &det), DockDecision::Halt);

        fixtures::queue(&state, 2);
        let waiter = {
            let state = Arc::clone(&state);
            thread::spawn(move || state.board(VehicleId(2)))
        };
        thread::sleep(Duration::from_millis(30));
        assert_eq!(state.snapshot().load, 0);
        stop.raise(StopCause::External);
        assert_eq!(waiter.join().unwrap(), crate::Admission::Cancelled);
    }

    #[test]
    fn stop_wakes_a_docked_ferry() {
        let (state, stop) = fixtures::state(&[(1, Port::Origin)], 5, 8);
        let det = TerminationDetector::new(1);
        let ferry = {
            let state = Arc::clone(&state);
            thread::spawn(move || state.await_departure(terms(Instant::now() + Duration::from_secs(60)), &det))
        };
        thread::sleep(Duration::from_millis(20));
        stop.raise(StopCause::External);
        assert_eq!(ferry.join().unwrap(), DockDecision::Stopped);
    }
}

#[cfg(test)]
mod cancellation {
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    use ferry_core::{Port, VehicleId};

    use super::fixtures;
    use crate::{Admission, Arrival, DepartureReason, StopCause, VehiclePhase};

    #[test]
    fn stop_cancels_a_queued_vehicle() {
        let (state, stop) = fixtures::state(&[(1, Port::Destination)], 5, 8);
        fixtures::queue(&state, 1);
        let waiter = {
            let state = Arc::clone(&state);
            thread::spawn(move || state.board(VehicleId(1)))
        };
        thread::sleep(Duration::from_millis(20));
        stop.raise(StopCause::External);
        assert_eq!(waiter.join().unwrap(), Admission::Cancelled);

        state.cancel(VehicleId(1));
        let snap = state.snapshot();
        assert_eq!(snap.vehicles[0].phase, VehiclePhase::Cancelled);
        assert_eq!(snap.load, 0);
    }

    #[test]
    fn shutdown_clears_the_manifest() {
        let (state, stop) = fixtures::state(&[(2, Port::Origin), (1, Port::Origin)], 5, 8);
        fixtures::queue(&state, 1);
        fixtures::queue(&state, 2);
        state.board(VehicleId(1));
        state.board(VehicleId(2));
        state.depart(DepartureReason::Full, 5.0);

        let rider = {
            let state = Arc::clone(&state);
            thread::spawn(move || state.await_arrival(VehicleId(1)))
        };
        stop.raise(StopCause::External);
        assert_eq!(rider.join().unwrap(), Arrival::Cancelled);

        // Cancelling an aboard vehicle leaves it to the ferry.
        state.cancel(VehicleId(1));
        assert_eq!(state.snapshot().vehicles[0].phase, VehiclePhase::Aboard);

        assert_eq!(state.shutdown(), 2);
        let snap = state.snapshot();
        assert_eq!(snap.load, 0);
        assert!(snap.manifest.is_empty());
        assert!(!snap.in_transit);
        assert!(snap.vehicles.iter().all(|v| v.phase == VehiclePhase::Cancelled));
    }

    #[test]
    fn completed_vehicles_stay_completed() {
        let (state, _stop) = fixtures::state(&[(1, Port::Origin)], 5, 8);
        let det = crate::TerminationDetector::new(1);
        state.complete(VehicleId(1), &det);
        state.cancel(VehicleId(1));
        assert_eq!(state.snapshot().vehicles[0].phase, VehiclePhase::Completed);
        assert_eq!(state.snapshot().completed, 1);
    }
}

#[cfg(test)]
mod starvation {
    use ferry_core::{Port, VehicleId};

    use super::fixtures;
    use crate::DepartureReason;

    #[test]
    fn flagged_once_past_the_bound() {
        let (state, _stop) = fixtures::state(&[(1, Port::Origin)], 5, 1);
        fixtures::queue(&state, 1);

        // Three departures from Origin leave the vehicle behind.
        for _ in 0..3 {
            state.depart(DepartureReason::DockTimeout, 1.0);
            state.arrive();
            state.depart(DepartureReason::NoDemand, 1.0);
            state.arrive();
        }

        let snap = state.snapshot();
        assert_eq!(snap.starvation.len(), 1);
        let flag = snap.starvation[0];
        assert_eq!(flag.vehicle, VehicleId(1));
        assert_eq!(flag.port, Port::Origin);
        assert_eq!(flag.cycles, 2);
        assert_eq!(flag.trip.0, 2);
    }

    #[test]
    fn boarding_resets_the_counter() {
        let (state, _stop) = fixtures::state(&[(1, Port::Origin)], 5, 1);
        fixtures::queue(&state, 1);
        state.depart(DepartureReason::DockTimeout, 1.0);
        state.arrive();
        state.depart(DepartureReason::NoDemand, 1.0);
        state.arrive();

        state.board(VehicleId(1));
        state.depart(DepartureReason::NoDemand, 1.0);
        state.arrive();
        assert!(state.snapshot().starvation.is_empty());
    }

    #[test]
    fn other_port_departures_do_not_count() {
        let (state, _stop) = fixtures::state(&[(1, Port::Destination)], 5, 0);
        fixtures::queue(&state, 1);
        state.depart(DepartureReason::NoDemand, 1.0);
        assert!(state.snapshot().starvation.is_empty());
    }
}
