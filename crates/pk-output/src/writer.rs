//! The `OutputWriter` trait implemented by all backend writers.

use crate::{OccupancyRow, OutputResult, ReservationRow, RunRows, SummaryRow};

/// Trait implemented by the CSV and SQLite writers.
pub trait OutputWriter {
    /// Write a batch of reservations.
    fn write_reservations(&mut self, rows: &[ReservationRow]) -> OutputResult<()>;

    /// Write the per-hour occupancy rows.
    fn write_occupancy(&mut self, rows: &[OccupancyRow]) -> OutputResult<()>;

    /// Write the single summary row.
    fn write_summary(&mut self, row: &SummaryRow) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent; safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;

    /// Write a whole run and finish.
    fn write_run(&mut self, rows: &RunRows) -> OutputResult<()> {
        self.write_reservations(&rows.reservations)?;
        self.write_occupancy(&rows.occupancy)?;
        self.write_summary(&rows.summary)?;
        self.finish()
    }
}
