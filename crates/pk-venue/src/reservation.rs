use pk_core::Hour;

/// A committed booking.  Never mutated or removed once created.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Reservation {
    pub family: String,
    pub people: u32,
    /// First hour of the stay.
    pub start:  Hour,
    /// Exclusive end of the stay (`start + STAY_HOURS`).
    pub end:    Hour,
}

impl Reservation {
    /// `true` if the stay's `[start, end)` interval includes `hour`.
    #[inline]
    pub fn covers(&self, hour: Hour) -> bool {
        hour >= self.start && hour < self.end
    }
}
