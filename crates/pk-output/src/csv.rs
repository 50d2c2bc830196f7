//! CSV output backend.
//!
//! Creates three files in the configured output directory:
//! - `reservations.csv`
//! - `hourly_occupancy.csv`
//! - `summary.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{OccupancyRow, OutputResult, ReservationRow, SummaryRow};

/// Writes run output to three CSV files.
pub struct CsvWriter {
    reservations: Writer<File>,
    occupancy:    Writer<File>,
    summary:      Writer<File>,
    finished:     bool,
}

impl CsvWriter {
    /// Open (or create) the CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut reservations = Writer::from_path(dir.join("reservations.csv"))?;
        reservations.write_record(["family", "people", "start_hour", "end_hour"])?;

        let mut occupancy = Writer::from_path(dir.join("hourly_occupancy.csv"))?;
        occupancy.write_record(["hour", "occupancy", "capacity"])?;

        let mut summary = Writer::from_path(dir.join("summary.csv"))?;
        summary.write_record(["denied", "accepted_original", "reprogrammed", "peak", "trough"])?;

        Ok(Self { reservations, occupancy, summary, finished: false })
    }
}

impl OutputWriter for CsvWriter {
    fn write_reservations(&mut self, rows: &[ReservationRow]) -> OutputResult<()> {
        for row in rows {
            self.reservations.write_record(&[
                row.family.clone(),
                row.people.to_string(),
                row.start_hour.to_string(),
                row.end_hour.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_occupancy(&mut self, rows: &[OccupancyRow]) -> OutputResult<()> {
        for row in rows {
            self.occupancy.write_record(&[
                row.hour.to_string(),
                row.occupancy.to_string(),
                row.capacity.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_summary(&mut self, row: &SummaryRow) -> OutputResult<()> {
        self.summary.write_record(&[
            row.denied.to_string(),
            row.accepted_original.to_string(),
            row.reprogrammed.to_string(),
            row.peak.to_string(),
            row.trough.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.reservations.flush()?;
        self.occupancy.flush()?;
        self.summary.flush()?;
        Ok(())
    }
}
