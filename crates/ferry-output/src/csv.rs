//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `trips.csv`
//! - `vehicles.csv`
//!
//! Vehicle labels within one trip are joined with spaces.

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{OutputResult, TripRow, VehicleRow};

/// Writes simulation output to two CSV files.
pub struct CsvWriter {
    trips:    Writer<File>,
    vehicles: Writer<File>,
    finished: bool,
}

impl CsvWriter {
    /// Open (or create) the two CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut trips = Writer::from_path(dir.join("trips.csv"))?;
        trips.write_record([
            "id",
            "direction",
            "reason",
            "duration",
            "departed_at",
            "capacity_used",
            "capacity_percent",
            "vehicles",
        ])?;

        let mut vehicles = Writer::from_path(dir.join("vehicles.csv"))?;
        vehicles.write_record([
            "id",
            "label",
            "type",
            "start",
            "wait_origin",
            "wait_destination",
            "ferry_origin",
            "ferry_destination",
            "round_trip",
            "completed",
        ])?;

        Ok(Self { trips, vehicles, finished: false })
    }
}

impl OutputWriter for CsvWriter {
    fn write_trip(&mut self, row: &TripRow) -> OutputResult<()> {
        self.trips.write_record(&[
            row.id.to_string(),
            row.direction.clone(),
            row.reason.to_string(),
            format!("{:.3}", row.duration),
            format!("{:.3}", row.departed_at),
            row.capacity_used.to_string(),
            format!("{:.1}", row.capacity_percent),
            row.vehicles.join(" "),
        ])?;
        Ok(())
    }

    fn write_vehicles(&mut self, rows: &[VehicleRow]) -> OutputResult<()> {
        for row in rows {
            self.vehicles.write_record(&[
                row.id.to_string(),
                row.label.clone(),
                row.class.to_string(),
                row.start.to_string(),
                format!("{:.3}", row.wait_origin),
                format!("{:.3}", row.wait_destination),
                format!("{:.3}", row.ferry_origin),
                format!("{:.3}", row.ferry_destination),
                row.round_trip.map(|t| format!("{t:.3}")).unwrap_or_default(),
                (row.completed as u8).to_string(),
            ])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.trips.flush()?;
        self.vehicles.flush()?;
        Ok(())
    }
}
