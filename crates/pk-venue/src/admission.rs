//! The admission engine.
//!
//! # Policy
//!
//! Evaluated in order for a request of `people` at `requested`:
//!
//! ```text
//! 1. people > capacity                → Denied(OverCapacity)
//! 2. requested > close_hour           → Denied(AfterClose)
//! 3. requested >= current_hour and
//!    block at requested feasible      → AcceptedOriginal @ requested
//! 4. first feasible h in
//!    max(current, open) .. close-1    → Reprogrammed @ h
//! 5. otherwise                        → Denied(NoFeasibleSlot)
//! ```
//!
//! A block starting at `h` is feasible when `h` and `h + 1` are both inside
//! the window and each has room for `people` more.  The scan is ascending,
//! so the earliest feasible hour always wins and identical inputs always
//! produce identical assignments.
//!
//! Every call records exactly one outcome in the counters and creates at
//! most one reservation.

use pk_core::{Hour, ReservationId, STAY_HOURS};

use crate::VenueState;

/// Why a request was denied.  All three map to the same wire code.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DenyReason {
    /// The group is larger than one hour slot can ever hold.
    OverCapacity,
    /// The requested hour is after closing.
    AfterClose,
    /// No two-hour block from now until closing has room.
    NoFeasibleSlot,
}

/// Result class of one admission decision.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Outcome {
    AcceptedOriginal,
    Reprogrammed,
    Denied(DenyReason),
}

/// Full result of [`VenueState::admit`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Decision {
    pub outcome:       Outcome,
    /// Start hour of the committed stay; `None` when denied.
    pub assigned_hour: Option<Hour>,
    /// The committed reservation; `None` when denied.
    pub reservation:   Option<ReservationId>,
}

impl Decision {
    fn denied(reason: DenyReason) -> Self {
        Self { outcome: Outcome::Denied(reason), assigned_hour: None, reservation: None }
    }
}

impl VenueState {
    /// Decide and, if possible, commit a reservation for `family`.
    ///
    /// Must run with the coordinator's state lock held for its whole
    /// duration; the check and the commit are not separable.
    pub fn admit(&mut self, family: &str, people: u32, requested: Hour) -> Decision {
        let decision = self.decide_and_commit(family, people, requested);
        self.counters.record(decision.outcome);
        debug_assert!(self.check_invariants().is_ok(), "{:?}", self.check_invariants());
        decision
    }

    fn decide_and_commit(&mut self, family: &str, people: u32, requested: Hour) -> Decision {
        if people > self.capacity {
            return Decision::denied(DenyReason::OverCapacity);
        }
        if requested > self.clock.close_hour() {
            return Decision::denied(DenyReason::AfterClose);
        }

        let extemporaneous = requested < self.clock.current_hour();
        if !extemporaneous && self.is_feasible(requested, people) {
            let id = self.commit(family, people, requested);
            return Decision {
                outcome:       Outcome::AcceptedOriginal,
                assigned_hour: Some(requested),
                reservation:   Some(id),
            };
        }

        match self.first_feasible_from(self.search_start(), people) {
            Some(hour) => {
                let id = self.commit(family, people, hour);
                Decision {
                    outcome:       Outcome::Reprogrammed,
                    assigned_hour: Some(hour),
                    reservation:   Some(id),
                }
            }
            None => Decision::denied(DenyReason::NoFeasibleSlot),
        }
    }

    /// Where the forward search begins: the current hour, but never before
    /// opening.
    #[inline]
    fn search_start(&self) -> Hour {
        self.clock.current_hour().max(self.clock.open_hour())
    }

    /// Earliest feasible start in `from ..= close_hour - 1`.
    fn first_feasible_from(&self, from: Hour, people: u32) -> Option<Hour> {
        let last_start = self.clock.close_hour().offset(-(STAY_HOURS - 1));
        (from.0..=last_start.0)
            .map(Hour)
            .find(|&h| self.is_feasible(h, people))
    }

    /// `true` if every hour of a stay starting at `start` is inside the
    /// window and has room for `people` more.
    pub fn is_feasible(&self, start: Hour, people: u32) -> bool {
        (0..STAY_HOURS).all(|i| {
            let hour = start.offset(i);
            self.clock.contains(hour)
                && self
                    .occupancy
                    .get(hour)
                    .is_some_and(|n| u64::from(n) + u64::from(people) <= u64::from(self.capacity))
        })
    }
}
