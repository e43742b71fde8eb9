//! Plain-text rendering: the run banner, periodic state tables, the trip log
//! and the final statistics.

use ferry_core::{FerryConfig, Port, VehicleId, VehicleSpec};
use ferry_dock::VehiclePhase;
use ferry_output::SimStatistics;
use ferry_sim::{SimObserver, SimOutcome, SimSnapshot};

/// Prints to stdout as the run progresses.
pub struct TextObserver {
    quiet:    bool,
    capacity: u32,
    labels:   Vec<String>,
}

impl TextObserver {
    /// A quiet observer skips the periodic state tables.
    pub fn new(quiet: bool) -> Self {
        Self { quiet, capacity: 0, labels: Vec::new() }
    }

    fn label(&self, id: VehicleId) -> String {
        self.labels.get(id.slot()).cloned().unwrap_or_else(|| id.to_string())
    }

    fn names(&self, ids: impl Iterator<Item = VehicleId>) -> String {
        let names: Vec<String> = ids.map(|id| self.label(id)).collect();
        if names.is_empty() { "-".to_string() } else { names.join(" ") }
    }

    fn print_state(&self, s: &SimSnapshot) {
        let f = &s.ferry;
        let position = if f.in_transit {
            format!("crossing {}->{}", f.side, f.side.opposite())
        } else {
            format!("docked at {}", f.side)
        };
        println!(
            "── t={:>8.2} ── {}/{} done ── ferry {} ── load {}/{}",
            s.elapsed, s.completed, s.total, position, f.load, f.capacity,
        );
        println!("  aboard      {}", self.names(f.manifest.iter().copied()));
        for port in Port::BOTH {
            let booths: Vec<String> = s.booths[port.index()]
                .iter()
                .map(|b| b.map_or_else(|| "·".to_string(), |id| self.label(id)))
                .collect();
            println!("  {port}");
            println!("    booths    [{}]", booths.join(" | "));
            for (name, phase) in [
                ("queued", VehiclePhase::Queued),
                ("at port", VehiclePhase::AtPort),
                ("dwelling", VehiclePhase::Dwelling),
            ] {
                println!("    {name:<9} {}", self.names(f.at(port, phase).map(|v| v.id)));
            }
        }
        if !f.starvation.is_empty() {
            println!("  starved     {}", self.names(f.starvation.iter().map(|flag| flag.vehicle)));
        }
    }

    fn print_trips(&self, outcome: &SimOutcome) {
        println!();
        println!("=== Trips ({}) ===", outcome.trips.len());
        println!("{:>4}  {:<21} {:<13} {:>6} {:>7}  vehicles", "#", "direction", "reason", "units", "load");
        for trip in &outcome.trips {
            println!(
                "{:>4}  {:<21} {:<13} {:>6.2} {:>3}/{:<3}  {}",
                trip.id.0,
                trip.direction.to_string(),
                trip.reason.as_str(),
                trip.duration,
                trip.capacity_used,
                self.capacity,
                self.names(trip.vehicles.iter().copied()),
            );
        }
    }

    fn print_statistics(&self, outcome: &SimOutcome) {
        let s = SimStatistics::compute(outcome, self.capacity);
        let o = Port::Origin.index();
        let d = Port::Destination.index();

        println!();
        println!("=== Statistics ===");
        println!("  vehicles completed     {}/{}", s.completed, s.vehicles);
        println!("  trips                  {}", s.trips);
        println!("  duration               {:.2} units", s.duration);
        println!();
        println!("  {:<22} {:>10} {:>12}", "", "Origin", "Destination");
        println!("  {:<22} {:>10.2} {:>12.2}", "avg wait", s.avg_wait[o], s.avg_wait[d]);
        println!("  {:<22} {:>10.2} {:>12.2}", "avg crossing", s.avg_crossing[o], s.avg_crossing[d]);
        println!(
            "  {:<22} {:>10.2} {:>12.2}",
            "avg wait by start", s.avg_wait_by_start[o], s.avg_wait_by_start[d],
        );
        println!();
        for (class, wait) in &s.avg_wait_by_class {
            println!("  avg wait {:<13} {wait:.2}", class.name());
        }
        match s.round_trip {
            Some(rt) => println!(
                "  round trip             avg {:.2}  min {:.2}  max {:.2}  sd {:.2}",
                rt.avg, rt.min, rt.max, rt.std_dev,
            ),
            None => println!("  round trip             -"),
        }
        println!();
        println!("  utilization            {:.1}%", s.utilization);
        println!("  empty trips            {} ({:.1}%)", s.empty_trips, s.empty_percent);
        println!("  direction balance      {:.1}%", s.direction_balance);
        println!("  wait max / min         {:.2} / {:.2}", s.max_wait, s.min_wait);
        println!("  starvation risk        {} (ratio {:.2})", s.starvation_risk, s.starvation_ratio);
        if s.starvation_flags > 0 {
            println!("  starvation flags       {}", s.starvation_flags);
        }
        if !outcome.violations.is_clean() {
            println!("  invariant violations   {:?}", outcome.violations);
        }
    }
}

impl SimObserver for TextObserver {
    fn on_start(&mut self, config: &FerryConfig, population: &[VehicleSpec]) {
        self.capacity = config.capacity;
        self.labels = population.iter().map(VehicleSpec::label).collect();

        println!("=== Ferry simulation ===");
        for spec in &config.classes {
            println!("  {:<8} {:>3} x {} units", spec.class.name(), spec.count, spec.cost);
        }
        println!("  capacity {} units, {} toll booths per port", config.capacity, config.toll_permits);
        println!("  {:.3} s per delay unit, seed {}", config.time_scale.secs_per_unit, config.seed);
        println!("Type q + Enter to stop.");
        println!();
    }

    fn on_snapshot(&mut self, snapshot: &SimSnapshot) {
        if !self.quiet {
            self.print_state(snapshot);
        }
    }

    fn on_end(&mut self, outcome: &SimOutcome) {
        self.print_trips(outcome);
        self.print_statistics(outcome);
        println!();
    }
}
