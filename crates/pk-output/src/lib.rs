//! `pk-output` — run output writers for the park_sim framework.
//!
//! Two backends are provided:
//!
//! | Feature   | Backend | Files created                                               |
//! |-----------|---------|-------------------------------------------------------------|
//! | *(none)*  | CSV     | `reservations.csv`, `hourly_occupancy.csv`, `summary.csv`   |
//! | `sqlite`  | SQLite  | `output.db`                                                 |
//!
//! Both implement [`OutputWriter`].  Rows are extracted from the venue
//! state once the coordinator has joined both workers.
//!
//! # Usage
//!
//! ```rust,ignore
//! use pk_output::{CsvWriter, OutputWriter, RunRows};
//!
//! let summary = coordinator.run(inbound)?;
//! let mut writer = CsvWriter::new(Path::new("./output"))?;
//! writer.write_run(&RunRows::from_venue(&summary.venue))?;
//! ```

pub mod csv;
pub mod error;
pub mod row;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;


pub use self::csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use row::{OccupancyRow, ReservationRow, RunRows, SummaryRow};
pub use writer::OutputWriter;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWriter;
