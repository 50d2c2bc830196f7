//! `VenueState` — the single shared occupancy model for one run.

use pk_core::{Hour, ParkClock, ParkConfig, ReservationId};

use crate::report::{FamilyMovement, FinalReport, HourReport};
use crate::{OccupancyGrid, Outcome, Reservation, VenueError, VenueResult};

/// Running totals of admission outcomes.  Only ever incremented.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OutcomeCounters {
    pub denied:            u64,
    pub accepted_original: u64,
    pub reprogrammed:      u64,
}

impl OutcomeCounters {
    /// Count one decision.
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::AcceptedOriginal => self.accepted_original += 1,
            Outcome::Reprogrammed     => self.reprogrammed += 1,
            Outcome::Denied(_)        => self.denied += 1,
        }
    }

    /// Total decisions counted.
    pub fn total(&self) -> u64 {
        self.denied + self.accepted_original + self.reprogrammed
    }
}

/// Occupancy grid, reservation list, clock and counters for one run.
///
/// Owned by the coordinator behind its state lock; see the crate docs.
#[derive(Clone, Debug)]
pub struct VenueState {
    pub(crate) clock:        ParkClock,
    pub(crate) capacity:     u32,
    pub(crate) occupancy:    OccupancyGrid,
    pub(crate) reservations: Vec<Reservation>,
    pub(crate) counters:     OutcomeCounters,
}

impl VenueState {
    /// Fresh state: clock at the opening hour, nothing booked.
    pub fn new(config: &ParkConfig) -> Self {
        let clock = config.make_clock();
        Self {
            occupancy:    OccupancyGrid::for_window(&clock),
            clock,
            capacity:     config.capacity,
            reservations: Vec::new(),
            counters:     OutcomeCounters::default(),
        }
    }

    // ── Read access ───────────────────────────────────────────────────────

    #[inline]
    pub fn clock(&self) -> &ParkClock {
        &self.clock
    }

    #[inline]
    pub fn current_hour(&self) -> Hour {
        self.clock.current_hour()
    }

    #[inline]
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    #[inline]
    pub fn occupancy(&self) -> &OccupancyGrid {
        &self.occupancy
    }

    #[inline]
    pub fn reservations(&self) -> &[Reservation] {
        &self.reservations
    }

    pub fn reservation(&self, id: ReservationId) -> Option<&Reservation> {
        self.reservations.get(id.index())
    }

    #[inline]
    pub fn counters(&self) -> OutcomeCounters {
        self.counters
    }

    // ── Mutation ──────────────────────────────────────────────────────────

    /// Append a reservation and add its people to every hour it covers.
    ///
    /// Feasibility must already have been checked.
    pub(crate) fn commit(&mut self, family: &str, people: u32, start: Hour) -> ReservationId {
        let id = ReservationId(self.reservations.len() as u32);
        let end = start.stay_end();
        let mut hour = start;
        while hour < end {
            self.occupancy.add(hour, people);
            hour = hour.next();
        }
        self.reservations.push(Reservation { family: family.to_owned(), people, start, end });
        id
    }

    /// Advance the clock one hour.
    ///
    /// Returns the transition report for the new hour, or `None` if the
    /// clock was already at the closing hour (nothing changes).
    pub fn advance_hour(&mut self) -> Option<HourReport> {
        let hour = self.clock.advance()?;
        Some(self.hour_report(hour))
    }

    /// Families arriving at and leaving at `hour`, plus its occupancy.
    pub fn hour_report(&self, hour: Hour) -> HourReport {
        let moving = |pick: fn(&Reservation) -> Hour| -> Vec<FamilyMovement> {
            self.reservations
                .iter()
                .filter(|r| pick(r) == hour)
                .map(|r| FamilyMovement { family: r.family.clone(), people: r.people })
                .collect()
        };
        HourReport {
            hour,
            departures: moving(|r| r.end),
            arrivals:   moving(|r| r.start),
            occupancy:  self.occupancy.get(hour),
        }
    }

    /// Summarise the run.  Pure; may be called at any time but is meant for
    /// after both workers have stopped.
    pub fn final_report(&self) -> FinalReport {
        FinalReport::from_slots(self.occupancy.iter(), self.counters)
    }

    // ── Invariants ────────────────────────────────────────────────────────

    /// Recompute occupancy from the reservation list and compare.
    ///
    /// Checks that every reservation lies inside the window, that each
    /// hour's recorded occupancy equals the people of the reservations
    /// covering it, and that no hour exceeds capacity.
    pub fn check_invariants(&self) -> VenueResult<()> {
        for r in &self.reservations {
            if !self.clock.contains(r.start) || !self.clock.contains(r.end.offset(-1)) {
                return Err(VenueError::OutsideWindow {
                    family: r.family.clone(),
                    start:  r.start,
                    end:    r.end,
                });
            }
        }
        for (hour, recorded) in self.occupancy.iter() {
            let expected: u64 = self
                .reservations
                .iter()
                .filter(|r| r.covers(hour))
                .map(|r| u64::from(r.people))
                .sum();
            if u64::from(recorded) != expected {
                return Err(VenueError::OccupancyMismatch { hour, recorded, expected });
            }
            if recorded > self.capacity {
                return Err(VenueError::OverCapacity {
                    hour,
                    occupancy: recorded,
                    capacity:  self.capacity,
                });
            }
        }
        Ok(())
    }
}
