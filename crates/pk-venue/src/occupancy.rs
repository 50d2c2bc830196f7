//! `OccupancyGrid` — committed people per hour of the operating window.

use pk_core::{Hour, ParkClock};

/// Dense per-hour occupancy, indexed by `hour - open_hour`.
///
/// Hours outside the window have no slot: reads return `None` and the
/// admission engine never commits there.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OccupancyGrid {
    open_hour: Hour,
    slots:     Vec<u32>,
}

impl OccupancyGrid {
    /// An all-zero grid covering the clock's operating window.
    pub fn for_window(clock: &ParkClock) -> Self {
        Self {
            open_hour: clock.open_hour(),
            slots:     vec![0; clock.window_len()],
        }
    }

    fn slot(&self, hour: Hour) -> Option<usize> {
        let offset = hour - self.open_hour;
        usize::try_from(offset).ok().filter(|&i| i < self.slots.len())
    }

    /// People committed to `hour`, or `None` if it is outside the window.
    #[inline]
    pub fn get(&self, hour: Hour) -> Option<u32> {
        self.slot(hour).map(|i| self.slots[i])
    }

    /// Add `people` to `hour`.
    ///
    /// # Panics
    /// Panics if `hour` is outside the window.  Callers commit only after a
    /// feasibility check that includes the window test.
    pub(crate) fn add(&mut self, hour: Hour, people: u32) {
        let i = self
            .slot(hour)
            .unwrap_or_else(|| panic!("hour {hour} outside occupancy window"));
        self.slots[i] += people;
    }

    /// `(hour, occupancy)` for every slot in ascending hour order.
    pub fn iter(&self) -> impl Iterator<Item = (Hour, u32)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .map(|(i, &n)| (self.open_hour + i as i32, n))
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
