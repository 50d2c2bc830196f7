//! Fixed-layout binary codec for [`Message`].
//!
//! # Record layout (little-endian, 276 bytes)
//!
//! | Offset | Size | Field           | Encoding                           |
//! |--------|------|-----------------|------------------------------------|
//! | 0      | 4    | kind            | `u32`                              |
//! | 4      | 64   | agent           | UTF-8, NUL padded                  |
//! | 68     | 64   | family          | UTF-8, NUL padded                  |
//! | 132    | 4    | hour            | `i32`                              |
//! | 136    | 4    | people          | `i32`                              |
//! | 140    | 128  | reply_channel   | UTF-8, NUL padded                  |
//! | 268    | 4    | outcome         | `i32`, 0 = none                    |
//! | 272    | 4    | assigned_hour   | `i32`, -1 = none                   |
//!
//! String fields keep at least one trailing NUL, so the longest storable
//! value is one byte short of the field width.  Longer values are cut at the
//! last char boundary that fits.
//!
//! A record is well under `PIPE_BUF`, so a single `write` of one record to a
//! FIFO is atomic even with several agents writing concurrently.

use std::io::{ErrorKind, Read, Write};

use pk_core::Hour;

use crate::{Message, MessageKind, OutcomeCode, WireError, WireResult};

const NAME_LEN:  usize = 64;
const CHAN_LEN:  usize = 128;

const KIND_AT:     usize = 0;
const AGENT_AT:    usize = KIND_AT + 4;
const FAMILY_AT:   usize = AGENT_AT + NAME_LEN;
const HOUR_AT:     usize = FAMILY_AT + NAME_LEN;
const PEOPLE_AT:   usize = HOUR_AT + 4;
const CHANNEL_AT:  usize = PEOPLE_AT + 4;
const OUTCOME_AT:  usize = CHANNEL_AT + CHAN_LEN;
const ASSIGNED_AT: usize = OUTCOME_AT + 4;

/// Size in bytes of one encoded record.
pub const RECORD_LEN: usize = ASSIGNED_AT + 4;

const NO_HOUR: i32 = -1;

// ── Encode ────────────────────────────────────────────────────────────────────

/// Encode `msg` into a fixed-size record.
pub fn encode(msg: &Message) -> [u8; RECORD_LEN] {
    let mut buf = [0u8; RECORD_LEN];
    put_u32(&mut buf, KIND_AT, msg.kind as u32);
    put_str(&mut buf[AGENT_AT..AGENT_AT + NAME_LEN], &msg.agent);
    put_str(&mut buf[FAMILY_AT..FAMILY_AT + NAME_LEN], &msg.family);
    put_i32(&mut buf, HOUR_AT, msg.hour.0);
    put_i32(&mut buf, PEOPLE_AT, i32::try_from(msg.people).unwrap_or(i32::MAX));
    put_str(&mut buf[CHANNEL_AT..CHANNEL_AT + CHAN_LEN], &msg.reply_channel);
    put_i32(&mut buf, OUTCOME_AT, msg.outcome.map_or(0, OutcomeCode::code));
    put_i32(&mut buf, ASSIGNED_AT, msg.assigned_hour.map_or(NO_HOUR, |h| h.0));
    buf
}

fn put_u32(buf: &mut [u8], at: usize, v: u32) {
    buf[at..at + 4].copy_from_slice(&v.to_le_bytes());
}

fn put_i32(buf: &mut [u8], at: usize, v: i32) {
    buf[at..at + 4].copy_from_slice(&v.to_le_bytes());
}

fn put_str(field: &mut [u8], s: &str) {
    let max = field.len() - 1;
    let mut end = s.len().min(max);
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    field[..end].copy_from_slice(&s.as_bytes()[..end]);
}

// ── Decode ────────────────────────────────────────────────────────────────────

/// Decode one fixed-size record.
pub fn decode(buf: &[u8; RECORD_LEN]) -> WireResult<Message> {
    let raw_kind = get_u32(buf, KIND_AT);
    let kind = MessageKind::try_from(raw_kind).map_err(WireError::UnknownKind)?;

    let raw_people = get_i32(buf, PEOPLE_AT);
    let people = u32::try_from(raw_people).map_err(|_| WireError::NegativePeople(raw_people))?;

    let outcome = match get_i32(buf, OUTCOME_AT) {
        0 => None,
        code => Some(OutcomeCode::try_from(code).map_err(WireError::UnknownOutcome)?),
    };

    let assigned_hour = match get_i32(buf, ASSIGNED_AT) {
        NO_HOUR => None,
        h => Some(Hour(h)),
    };

    Ok(Message {
        kind,
        agent:         get_str(&buf[AGENT_AT..AGENT_AT + NAME_LEN], "agent")?,
        family:        get_str(&buf[FAMILY_AT..FAMILY_AT + NAME_LEN], "family")?,
        hour:          Hour(get_i32(buf, HOUR_AT)),
        people,
        reply_channel: get_str(&buf[CHANNEL_AT..CHANNEL_AT + CHAN_LEN], "reply_channel")?,
        outcome,
        assigned_hour,
    })
}

fn get_u32(buf: &[u8], at: usize) -> u32 {
    let mut b = [0u8; 4];
    b.copy_from_slice(&buf[at..at + 4]);
    u32::from_le_bytes(b)
}

fn get_i32(buf: &[u8], at: usize) -> i32 {
    let mut b = [0u8; 4];
    b.copy_from_slice(&buf[at..at + 4]);
    i32::from_le_bytes(b)
}

fn get_str(field: &[u8], name: &'static str) -> WireResult<String> {
    let end = field.iter().position(|&b| b == 0).unwrap_or(field.len());
    std::str::from_utf8(&field[..end])
        .map(str::to_owned)
        .map_err(|_| WireError::Utf8 { field: name })
}

// ── Stream helpers ────────────────────────────────────────────────────────────

/// Write one record to `w` in a single `write_all`.
pub fn write_message<W: Write>(w: &mut W, msg: &Message) -> WireResult<()> {
    w.write_all(&encode(msg))?;
    w.flush()?;
    Ok(())
}

/// Read one record from `r`.
///
/// Returns `Ok(None)` on a clean end-of-stream (no bytes before EOF).  EOF in
/// the middle of a record is [`WireError::Truncated`].
pub fn read_message<R: Read>(r: &mut R) -> WireResult<Option<Message>> {
    let mut buf = [0u8; RECORD_LEN];
    let mut got = 0;
    while got < RECORD_LEN {
        match r.read(&mut buf[got..]) {
            Ok(0) if got == 0 => return Ok(None),
            Ok(0) => return Err(WireError::Truncated { got, expected: RECORD_LEN }),
            Ok(n) => got += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    decode(&buf).map(Some)
}
