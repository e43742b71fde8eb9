//! The `OutputWriter` trait implemented by all backend writers.

use ferry_core::FerryConfig;

use crate::{OutputResult, RunSummary, TripRow, VehicleRow};

/// Trait implemented by the CSV and JSON writers.
///
/// Errors are returned to the caller; [`OutputObserver`][crate::OutputObserver]
/// stores the first one for retrieval with `take_error`.
pub trait OutputWriter {
    /// Record the configuration the run started with.
    fn write_config(&mut self, _config: &FerryConfig) -> OutputResult<()> {
        Ok(())
    }

    /// Write one departure.  Called once per trip, in departure order.
    fn write_trip(&mut self, row: &TripRow) -> OutputResult<()>;

    /// Write the end-of-run vehicle reports.
    fn write_vehicles(&mut self, rows: &[VehicleRow]) -> OutputResult<()>;

    /// Record run-level totals.  Backends without a place for them ignore it.
    fn write_summary(&mut self, _summary: &RunSummary) -> OutputResult<()> {
        Ok(())
    }

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent: safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
