//! Per-hour transition reports and the end-of-run summary.

use std::fmt;

use pk_core::Hour;

use crate::OutcomeCounters;

// ── HourReport ────────────────────────────────────────────────────────────────

/// A family entering or leaving the venue.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FamilyMovement {
    pub family: String,
    pub people: u32,
}

/// What changed when the clock reached `hour`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HourReport {
    pub hour:       Hour,
    /// Reservations whose stay ends at `hour`.
    pub departures: Vec<FamilyMovement>,
    /// Reservations whose stay starts at `hour`.
    pub arrivals:   Vec<FamilyMovement>,
    /// Scheduled occupancy of `hour`; `None` outside the window.
    pub occupancy:  Option<u32>,
}

impl HourReport {
    pub fn departing_people(&self) -> u64 {
        self.departures.iter().map(|m| u64::from(m.people)).sum()
    }

    pub fn arriving_people(&self) -> u64 {
        self.arrivals.iter().map(|m| u64::from(m.people)).sum()
    }
}

fn write_movements(f: &mut fmt::Formatter<'_>, moves: &[FamilyMovement]) -> fmt::Result {
    if moves.is_empty() {
        return f.write_str("none");
    }
    for (i, m) in moves.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}({})", m.family, m.people)?;
    }
    Ok(())
}

impl fmt::Display for HourReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", "-".repeat(50))?;
        writeln!(f, "Simulated hour: {}", self.hour)?;
        f.write_str("Leaving: ")?;
        write_movements(f, &self.departures)?;
        writeln!(f, " -> total leaving: {}", self.departing_people())?;
        f.write_str("Entering: ")?;
        write_movements(f, &self.arrivals)?;
        writeln!(f, " -> total entering: {}", self.arriving_people())?;
        if let Some(n) = self.occupancy {
            writeln!(f, "Scheduled occupancy for hour {}: {} people", self.hour, n)?;
        }
        write!(f, "{}", "-".repeat(50))
    }
}

// ── FinalReport ───────────────────────────────────────────────────────────────

/// An occupancy value and every hour at which it occurs, ascending.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HourExtreme {
    pub occupancy: u32,
    pub hours:     Vec<Hour>,
}

impl HourExtreme {
    fn start(hour: Hour, occupancy: u32) -> Self {
        Self { occupancy, hours: vec![hour] }
    }

    fn offer(&mut self, hour: Hour, occupancy: u32, better: fn(u32, u32) -> bool) {
        if better(occupancy, self.occupancy) {
            *self = Self::start(hour, occupancy);
        } else if occupancy == self.occupancy {
            self.hours.push(hour);
        }
    }
}

/// End-of-run summary.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FinalReport {
    /// Highest occupancy and all hours that reach it.
    pub peak:     HourExtreme,
    /// Lowest occupancy and all hours that reach it.
    pub trough:   HourExtreme,
    pub counters: OutcomeCounters,
}

impl FinalReport {
    /// Build a report from `(hour, occupancy)` pairs in ascending hour order.
    ///
    /// Ties are all kept, so `peak.hours` and `trough.hours` list every hour
    /// with the extreme value.  An empty input yields empty extremes.
    pub fn from_slots<I>(slots: I, counters: OutcomeCounters) -> Self
    where
        I: IntoIterator<Item = (Hour, u32)>,
    {
        let mut slots = slots.into_iter();
        let Some((first_hour, first)) = slots.next() else {
            return Self { counters, ..Self::default() };
        };

        let mut peak = HourExtreme::start(first_hour, first);
        let mut trough = HourExtreme::start(first_hour, first);
        for (hour, n) in slots {
            peak.offer(hour, n, |a, b| a > b);
            trough.offer(hour, n, |a, b| a < b);
        }
        Self { peak, trough, counters }
    }
}

fn write_hours(f: &mut fmt::Formatter<'_>, hours: &[Hour]) -> fmt::Result {
    for (i, h) in hours.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{h}")?;
    }
    Ok(())
}

impl fmt::Display for FinalReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "============= CONTROLLER FINAL REPORT =============")?;
        write!(f, "Peak hours (highest occupancy = {} people): ", self.peak.occupancy)?;
        write_hours(f, &self.peak.hours)?;
        writeln!(f)?;
        write!(f, "Trough hours (lowest occupancy = {} people): ", self.trough.occupancy)?;
        write_hours(f, &self.trough.hours)?;
        writeln!(f)?;
        writeln!(f, "Requests denied: {}", self.counters.denied)?;
        writeln!(f, "Requests accepted at their original hour: {}", self.counters.accepted_original)?;
        writeln!(f, "Requests reprogrammed: {}", self.counters.reprogrammed)?;
        write!(f, "{}", "=".repeat(51))
    }
}
