//! `ferry-output` — output writers and statistics for the ferry simulation.
//!
//! Two backends are provided:
//!
//! | Backend  | Files created                      |
//! |----------|------------------------------------|
//! | CSV      | `trips.csv`, `vehicles.csv`        |
//! | JSON     | one document, e.g. `ferry_log.json` |
//!
//! Both implement [`OutputWriter`] and are driven by [`OutputObserver`],
//! which implements `ferry_sim::SimObserver`.  [`SimStatistics`] summarizes
//! a finished run.
//!
//! # Usage
//!
//! ```rust,ignore
//! use ferry_output::{CsvWriter, OutputObserver};
//!
//! let mut obs = OutputObserver::new(CsvWriter::new(Path::new("./output"))?);
//! let outcome = sim.run(&mut obs)?;
//! obs.take_error().map(|e| eprintln!("output error: {e}"));
//! ```

pub mod csv;
pub mod error;
pub mod json;
pub mod observer;
pub mod row;
pub mod stats;
pub mod writer;


pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use json::JsonLogWriter;
pub use observer::OutputObserver;
pub use row::{RunSummary, TripRow, VehicleRow};
pub use stats::{STARVATION_RATIO_LIMIT, SimStatistics, Spread, StarvationRisk};
pub use writer::OutputWriter;
