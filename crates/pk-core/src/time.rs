//! Simulation hour model.
//!
//! # Design
//!
//! Simulated time is a whole-hour counter.  The venue operates over an
//! inclusive window `[open_hour, close_hour]`; the clock starts at
//! `open_hour` and advances by exactly one hour per real-time interval until
//! it reaches `close_hour`, at which point the run shuts down.
//!
//! Hours are signed because they arrive from the wire as plain integers; a
//! requested hour before the window (or negative) is still a valid request,
//! it is simply already in the past.

use std::fmt;
use std::ops::RangeInclusive;
use std::time::Duration;

use crate::{PkError, PkResult};

/// How many consecutive hour slots one reservation occupies.
pub const STAY_HOURS: i32 = 2;

/// Earliest hour a venue may open.
pub const EARLIEST_HOUR: Hour = Hour(7);

/// Latest hour a venue may close.
pub const LATEST_HOUR: Hour = Hour(19);

// ── Hour ──────────────────────────────────────────────────────────────────────

/// A simulated hour of the day.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Hour(pub i32);

impl Hour {
    /// The hour `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: i32) -> Hour {
        Hour(self.0 + n)
    }

    /// The hour immediately after `self`.
    #[inline]
    pub fn next(self) -> Hour {
        self.offset(1)
    }

    /// End (exclusive) of a stay that starts at `self`.
    #[inline]
    pub fn stay_end(self) -> Hour {
        self.offset(STAY_HOURS)
    }
}

impl std::ops::Add<i32> for Hour {
    type Output = Hour;
    #[inline]
    fn add(self, rhs: i32) -> Hour {
        Hour(self.0 + rhs)
    }
}

impl std::ops::Sub for Hour {
    type Output = i32;
    #[inline]
    fn sub(self, rhs: Hour) -> i32 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Hour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── ParkClock ─────────────────────────────────────────────────────────────────

/// The venue's simulated clock.
///
/// Invariant: `open_hour <= current_hour <= close_hour`.  `current_hour`
/// only ever moves forward, one hour at a time.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParkClock {
    open_hour:    Hour,
    close_hour:   Hour,
    current_hour: Hour,
}

impl ParkClock {
    /// Create a clock positioned at `open_hour`.
    ///
    /// `open_hour` must not be later than `close_hour`; [`ParkConfig::validate`]
    /// enforces this before a clock is ever built from user input.
    pub fn new(open_hour: Hour, close_hour: Hour) -> Self {
        debug_assert!(open_hour <= close_hour);
        Self { open_hour, close_hour, current_hour: open_hour }
    }

    #[inline]
    pub fn open_hour(&self) -> Hour {
        self.open_hour
    }

    #[inline]
    pub fn close_hour(&self) -> Hour {
        self.close_hour
    }

    #[inline]
    pub fn current_hour(&self) -> Hour {
        self.current_hour
    }

    /// `true` once the clock has reached the closing hour.
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.current_hour >= self.close_hour
    }

    /// Advance by one hour.
    ///
    /// Returns the new hour, or `None` (leaving the clock untouched) if it
    /// was already at `close_hour`.
    pub fn advance(&mut self) -> Option<Hour> {
        if self.is_closed() {
            return None;
        }
        self.current_hour = self.current_hour.next();
        Some(self.current_hour)
    }

    /// `true` if `hour` lies inside the operating window.
    #[inline]
    pub fn contains(&self, hour: Hour) -> bool {
        hour >= self.open_hour && hour <= self.close_hour
    }

    /// Every hour of the operating window in ascending order.
    pub fn window(&self) -> impl Iterator<Item = Hour> + use<> {
        let range: RangeInclusive<i32> = self.open_hour.0..=self.close_hour.0;
        range.map(Hour)
    }

    /// Number of hour slots in the operating window.
    #[inline]
    pub fn window_len(&self) -> usize {
        (self.close_hour - self.open_hour + 1) as usize
    }
}

impl fmt::Display for ParkClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hour {} (window {}..={})", self.current_hour, self.open_hour, self.close_hour)
    }
}

// ── ParkConfig ────────────────────────────────────────────────────────────────

/// Coordinator startup parameters.
///
/// Built by the controller binary from its command line and passed to the
/// coordinator, which treats it as already validated.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParkConfig {
    /// First hour of the operating window; the clock starts here.
    pub open_hour: Hour,

    /// Last hour of the operating window; reaching it ends the run.
    pub close_hour: Hour,

    /// Real time that represents one simulated hour.
    pub hour_duration: Duration,

    /// Maximum people allowed in any single hour slot.
    pub capacity: u32,
}

impl ParkConfig {
    /// Check the startup invariants:
    /// `EARLIEST_HOUR <= open_hour <= close_hour <= LATEST_HOUR`,
    /// a non-zero hour duration and a non-zero capacity.
    pub fn validate(&self) -> PkResult<()> {
        let bounds = EARLIEST_HOUR..=LATEST_HOUR;
        if !bounds.contains(&self.open_hour) || !bounds.contains(&self.close_hour) {
            return Err(PkError::Config(format!(
                "operating window {}..={} must lie within {}..={}",
                self.open_hour, self.close_hour, EARLIEST_HOUR, LATEST_HOUR
            )));
        }
        if self.open_hour > self.close_hour {
            return Err(PkError::Config(format!(
                "open hour {} is after close hour {}",
                self.open_hour, self.close_hour
            )));
        }
        if self.hour_duration.is_zero() {
            return Err(PkError::Config("hour duration must be greater than zero".into()));
        }
        if self.capacity == 0 {
            return Err(PkError::Config("capacity must be greater than zero".into()));
        }
        Ok(())
    }

    /// Construct a `ParkClock` positioned at the opening hour.
    pub fn make_clock(&self) -> ParkClock {
        ParkClock::new(self.open_hour, self.close_hour)
    }
}
