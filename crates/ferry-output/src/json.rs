//! JSON trip log backend.
//!
//! Accumulates everything in memory and writes one pretty-printed document
//! (conventionally `ferry_log.json`) on [`finish`][OutputWriter::finish]:
//!
//! ```text
//! { total_vehicles, completed, ferry_capacity, total_trips, duration,
//!   stopped, starvation[], config, trips[], vehicles[] }
//! ```

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use ferry_core::FerryConfig;
use serde::Serialize;

use crate::writer::OutputWriter;
use crate::{OutputResult, RunSummary, TripRow, VehicleRow};

#[derive(Serialize)]
struct JsonLog<'a> {
    #[serde(flatten)]
    summary:  Option<&'a RunSummary>,
    config:   Option<&'a FerryConfig>,
    trips:    &'a [TripRow],
    vehicles: &'a [VehicleRow],
}

/// Writes the whole run as a single JSON document.
pub struct JsonLogWriter {
    path:     PathBuf,
    config:   Option<FerryConfig>,
    summary:  Option<RunSummary>,
    trips:    Vec<TripRow>,
    vehicles: Vec<VehicleRow>,
    finished: bool,
}

impl JsonLogWriter {
    /// The file is created when the writer finishes, not before.
    pub fn new(path: &Path) -> Self {
        Self {
            path:     path.to_path_buf(),
            config:   None,
            summary:  None,
            trips:    Vec::new(),
            vehicles: Vec::new(),
            finished: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl OutputWriter for JsonLogWriter {
    fn write_config(&mut self, config: &FerryConfig) -> OutputResult<()> {
        self.config = Some(config.clone());
        Ok(())
    }

    fn write_trip(&mut self, row: &TripRow) -> OutputResult<()> {
        self.trips.push(row.clone());
        Ok(())
    }

    fn write_vehicles(&mut self, rows: &[VehicleRow]) -> OutputResult<()> {
        self.vehicles.extend_from_slice(rows);
        Ok(())
    }

    fn write_summary(&mut self, summary: &RunSummary) -> OutputResult<()> {
        self.summary = Some(summary.clone());
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;

        let doc = JsonLog {
            summary:  self.summary.as_ref(),
            config:   self.config.as_ref(),
            trips:    &self.trips,
            vehicles: &self.vehicles,
        };
        let mut out = BufWriter::new(File::create(&self.path)?);
        serde_json::to_writer_pretty(&mut out, &doc)?;
        out.write_all(b"\n")?;
        out.flush()?;
        Ok(())
    }
}
