//! SQLite output backend (feature `sqlite`).
//!
//! Creates a single `output.db` file in the configured output directory with
//! three tables: `reservations`, `hourly_occupancy` and `summary`.

use std::path::Path;

use rusqlite::Connection;

use crate::writer::OutputWriter;
use crate::{OccupancyRow, OutputResult, ReservationRow, SummaryRow};

/// Writes run output to an SQLite database.
pub struct SqliteWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `output.db` in `dir` and initialise the schema.
    /// Rows from an earlier run into the same directory are removed.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let conn = Connection::open(dir.join("output.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS reservations (
                 family     TEXT    NOT NULL,
                 people     INTEGER NOT NULL,
                 start_hour INTEGER NOT NULL,
                 end_hour   INTEGER NOT NULL
             );
             CREATE TABLE IF NOT EXISTS hourly_occupancy (
                 hour      INTEGER PRIMARY KEY,
                 occupancy INTEGER NOT NULL,
                 capacity  INTEGER NOT NULL
             );
             CREATE TABLE IF NOT EXISTS summary (
                 denied            INTEGER NOT NULL,
                 accepted_original INTEGER NOT NULL,
                 reprogrammed      INTEGER NOT NULL,
                 peak              INTEGER NOT NULL,
                 trough            INTEGER NOT NULL
             );
             DELETE FROM reservations;
             DELETE FROM hourly_occupancy;
             DELETE FROM summary;",
        )?;

        Ok(Self { conn, finished: false })
    }
}

impl OutputWriter for SqliteWriter {
    fn write_reservations(&mut self, rows: &[ReservationRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO reservations (family, people, start_hour, end_hour) \
                 VALUES (?1, ?2, ?3, ?4)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![row.family, row.people, row.start_hour, row.end_hour])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_occupancy(&mut self, rows: &[OccupancyRow]) -> OutputResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT OR REPLACE INTO hourly_occupancy (hour, occupancy, capacity) \
                 VALUES (?1, ?2, ?3)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![row.hour, row.occupancy, row.capacity])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_summary(&mut self, row: &SummaryRow) -> OutputResult<()> {
        self.conn.execute(
            "INSERT INTO summary (denied, accepted_original, reprogrammed, peak, trough) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![
                row.denied as i64,
                row.accepted_original as i64,
                row.reprogrammed as i64,
                row.peak,
                row.trough,
            ],
        )?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
