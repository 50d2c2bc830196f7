use pk_core::Hour;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VenueError {
    #[error("occupancy at hour {hour} is {recorded} but reservations cover {expected}")]
    OccupancyMismatch {
        hour:     Hour,
        recorded: u32,
        expected: u64,
    },

    #[error("occupancy at hour {hour} is {occupancy}, over capacity {capacity}")]
    OverCapacity {
        hour:      Hour,
        occupancy: u32,
        capacity:  u32,
    },

    #[error("reservation for {family:?} at {start}..{end} lies outside the operating window")]
    OutsideWindow {
        family: String,
        start:  Hour,
        end:    Hour,
    },
}

pub type VenueResult<T> = Result<T, VenueError>;
