//! `pk-core` — foundational types for the `park_sim` admission-control
//! framework.
//!
//! This crate is a dependency of every other `pk-*` crate.  It has no `pk-*`
//! dependencies and only `thiserror` as a required external one (plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module     | Contents                                                |
//! |------------|---------------------------------------------------------|
//! | [`ids`]    | `ReservationId`, `AgentSlot`                            |
//! | [`time`]   | `Hour`, `ParkClock`, `ParkConfig`, `STAY_HOURS`         |
//! | [`error`]  | `PkError`, `PkResult`                                   |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod ids;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{PkError, PkResult};
pub use ids::{AgentSlot, ReservationId};
pub use time::{EARLIEST_HOUR, Hour, LATEST_HOUR, ParkClock, ParkConfig, STAY_HOURS};
