//! ferry — run the two-port ferry simulation from the command line.
//!
//! Every vehicle and the ferry run on their own threads.  The terminal shows a
//! state table every half delay unit, then the trip log and the final
//! statistics.  Type `q` and Enter to stop the run early.
//!
//! ```text
//! ferry --speed 10 --json ferry_log.json
//! ferry --cars 4 --minibuses 0 --trucks 2 --capacity 8 --quiet --csv out/
//! ```

mod render;

use std::fs;
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::thread;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use ferry_core::{ClassSpec, FerryConfig, Port, StartPorts, TimeScale, VehicleClass};
use ferry_dock::{StopCause, StopSignal};
use ferry_output::{CsvWriter, JsonLogWriter, OutputObserver};
use ferry_sim::SimBuilder;

use render::TextObserver;

// ── Command line ──────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "ferry")]
#[command(about = "Two-port ferry simulation with one thread per vehicle")]
struct Cli {
    /// Number of cars
    #[arg(long, default_value_t = 12)]
    cars: u32,

    /// Number of minibuses
    #[arg(long, default_value_t = 10)]
    minibuses: u32,

    /// Number of trucks
    #[arg(long, default_value_t = 8)]
    trucks: u32,

    /// Capacity units per car (default 1)
    #[arg(long)]
    car_cost: Option<u32>,

    /// Capacity units per minibus (default 2)
    #[arg(long)]
    minibus_cost: Option<u32>,

    /// Capacity units per truck (default 4)
    #[arg(long)]
    truck_cost: Option<u32>,

    /// Ferry capacity in units
    #[arg(long, default_value_t = 20)]
    capacity: u32,

    /// Toll booths per port
    #[arg(long, default_value_t = 2)]
    tolls: u32,

    /// Speed multiplier: 1 runs one delay unit per second
    #[arg(long, default_value_t = 1.0)]
    speed: f64,

    /// RNG seed
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Where vehicles start
    #[arg(long, value_enum, default_value_t = Start::Random)]
    start: Start,

    /// Skipped departures before a waiting vehicle is flagged as starved
    #[arg(long, default_value_t = 8)]
    fairness: u32,

    /// Stop after this many departures (0 = no limit)
    #[arg(long, default_value_t = 100)]
    max_trips: u32,

    /// Write the JSON trip log to this file
    #[arg(long)]
    json: Option<PathBuf>,

    /// Write trips.csv and vehicles.csv into this directory
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Log admissions, toll passages and dwells
    #[arg(long, short)]
    verbose: bool,

    /// Skip the periodic state tables and log warnings only
    #[arg(long, short, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Start {
    Random,
    Origin,
    Destination,
}

impl Cli {
    fn config(&self) -> FerryConfig {
        let class = |class: VehicleClass, count: u32, cost: Option<u32>| {
            let spec = ClassSpec::new(class, count);
            cost.map_or(spec, |c| spec.with_cost(c))
        };
        let classes = [
            class(VehicleClass::Car, self.cars, self.car_cost),
            class(VehicleClass::Minibus, self.minibuses, self.minibus_cost),
            class(VehicleClass::Truck, self.trucks, self.truck_cost),
        ];

        FerryConfig {
            classes:        classes.into_iter().filter(|c| c.count > 0).collect(),
            capacity:       self.capacity,
            toll_permits:   self.tolls,
            start_ports:    match self.start {
                Start::Random => StartPorts::Random,
                Start::Origin => StartPorts::All(Port::Origin),
                Start::Destination => StartPorts::All(Port::Destination),
            },
            fairness_bound: self.fairness,
            max_trips:      (self.max_trips > 0).then_some(self.max_trips),
            seed:           self.seed,
            time_scale:     TimeScale::with_speed(self.speed),
            ..FerryConfig::default()
        }
    }
}

// ── Main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let sim = SimBuilder::new(cli.config()).build().context("invalid configuration")?;
    spawn_quit_listener(sim.stop_handle())?;

    let mut text = TextObserver::new(cli.quiet);
    let mut csv = match &cli.csv {
        Some(dir) => {
            fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
            Some(OutputObserver::new(CsvWriter::new(dir)?))
        }
        None => None,
    };
    let mut json = cli.json.as_deref().map(|path| OutputObserver::new(JsonLogWriter::new(path)));

    let outcome = sim.run(&mut (&mut text, (&mut csv, &mut json)))?;

    if let Some(err) = csv.as_mut().and_then(OutputObserver::take_error) {
        return Err(err).context("writing CSV output");
    }
    if let Some(err) = json.as_mut().and_then(OutputObserver::take_error) {
        return Err(err).context("writing JSON trip log");
    }
    if let Some(dir) = &cli.csv {
        println!("CSV output written to {}", dir.display());
    }
    if let Some(path) = &cli.json {
        println!("Trip log written to {}", path.display());
    }

    match outcome.stop_cause {
        None => println!("All {} round trips completed.", outcome.total),
        Some(StopCause::TripLimit) => println!(
            "Trip limit reached: {}/{} round trips completed.",
            outcome.completed, outcome.total,
        ),
        Some(StopCause::ActorFailed) => println!(
            "An actor failed: {}/{} round trips completed.",
            outcome.completed, outcome.total,
        ),
        Some(StopCause::External) => println!(
            "Stopped by user: {}/{} round trips completed.",
            outcome.completed, outcome.total,
        ),
    }
    Ok(())
}

/// Raise the stop signal when `q` is typed on stdin.
///
/// The thread is detached; it dies with the process if stdin never closes.
fn spawn_quit_listener(stop: StopSignal) -> Result<()> {
    thread::Builder::new()
        .name("stdin".into())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                if line.trim().eq_ignore_ascii_case("q") {
                    if stop.raise(StopCause::External) {
                        tracing::warn!("quit requested, stopping");
                    }
                    break;
                }
            }
        })
        .context("spawning stdin listener")?;
    Ok(())
}
