//! Request-file loader.
//!
//! A request file is headerless CSV, one reservation per row:
//!
//! ```text
//! family,hour,people
//! Lopez,9,5
//! Diaz, 10 , 8
//! ```
//!
//! Whitespace around fields is ignored and blank lines are skipped.  The
//! first malformed row stops loading with an error naming its line.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use csv::{ReaderBuilder, StringRecord, Trim};
use pk_core::Hour;

use crate::{AgentError, AgentResult};

/// One row of a request file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParkRequest {
    pub family: String,
    pub hour:   Hour,
    pub people: u32,
}

/// Load every request in the file at `path`, in file order.
pub fn load_requests(path: &Path) -> AgentResult<Vec<ParkRequest>> {
    read_requests(File::open(path)?)
}

/// Parse requests from any reader.
pub fn read_requests<R: Read>(reader: R) -> AgentResult<Vec<ParkRequest>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut requests = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let line = record.position().map_or(0, |p| p.line());
        requests.push(parse_record(&record, line)?);
    }
    Ok(requests)
}

fn parse_record(record: &StringRecord, line: u64) -> AgentResult<ParkRequest> {
    let parse_err = |message: String| AgentError::Parse { line, message };

    if record.len() != 3 {
        return Err(parse_err(format!("expected 3 fields (family,hour,people), found {}", record.len())));
    }
    let family = &record[0];
    if family.is_empty() {
        return Err(parse_err("family name is empty".into()));
    }
    let hour: i32 = field(record, 1, "hour").map_err(parse_err)?;
    let people: u32 = field(record, 2, "people").map_err(parse_err)?;

    Ok(ParkRequest { family: family.to_owned(), hour: Hour(hour), people })
}

fn field<T: FromStr>(record: &StringRecord, index: usize, name: &str) -> Result<T, String> {
    let raw = &record[index];
    raw.parse()
        .map_err(|_| format!("invalid {name} {raw:?}"))
}
