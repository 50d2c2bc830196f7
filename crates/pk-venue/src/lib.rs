//! `pk-venue` — the shared venue model and the admission engine.
//!
//! # Crate layout
//!
//! | Module           | Contents                                                |
//! |------------------|---------------------------------------------------------|
//! | [`occupancy`]    | `OccupancyGrid` — people per hour slot                  |
//! | [`reservation`]  | `Reservation` — one committed two-hour booking          |
//! | [`venue`]        | `VenueState`, `OutcomeCounters`                         |
//! | [`admission`]    | `Outcome`, `Decision`, `VenueState::admit`              |
//! | [`registry`]     | `AgentRegistry<S>` — agent name → reply handle          |
//! | [`report`]       | `HourReport`, `FinalReport`, `HourExtreme`              |
//! | [`error`]        | `VenueError`, `VenueResult<T>`                          |
//!
//! # Locking
//!
//! Nothing in this crate locks.  Every type here is plain owned data; the
//! coordinator keeps one `VenueState` and one `AgentRegistry` together behind
//! a single mutex and calls into this crate only while holding it.
//!
//! # Cargo features
//!
//! | Feature   | Effect                                                   |
//! |-----------|----------------------------------------------------------|
//! | `fx-hash` | FxHash instead of SipHash for the registry name index.   |
//! | `serde`   | Serde derives on reservations and reports.               |

pub mod admission;
pub mod error;
pub mod occupancy;
pub mod registry;
pub mod report;
pub mod reservation;
pub mod venue;


pub use admission::{Decision, DenyReason, Outcome};
pub use error::{VenueError, VenueResult};
pub use occupancy::OccupancyGrid;
pub use registry::{AgentEntry, AgentRegistry, Registration};
pub use report::{FamilyMovement, FinalReport, HourExtreme, HourReport};
pub use reservation::Reservation;
pub use venue::{OutcomeCounters, VenueState};
