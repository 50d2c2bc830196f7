//! `pk-coord` — the coordinator runtime for the park_sim framework.
//!
//! # Two workers, one lock
//!
//! ```text
//! spawn:
//!   A  request processor — select { inbound message, shutdown }
//!        REGISTER → registry (connect outside the lock) → REGISTER_ACK
//!        REQUEST  → admit under the lock → RESPONSE outside the lock
//!   B  clock driver      — loop { sleep hour; advance under the lock }
//!        at close: clear active flag, SHUTDOWN to every agent,
//!                  drop the shutdown sender
//! join A, join B → final report
//! ```
//!
//! Venue state and the agent registry live together in one
//! [`ParkState`] behind a single `parking_lot::Mutex`.  Neither worker
//! blocks while holding it.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use pk_coord::CoordinatorBuilder;
//! use pk_wire::MailboxHub;
//!
//! let hub = MailboxHub::new();
//! let (agent_tx, inbound) = MailboxHub::inbound("coordinator");
//! let summary = CoordinatorBuilder::new(config, hub.clone())
//!     .build()?
//!     .run(inbound)?;
//! println!("{}", summary.report);
//! ```

pub mod builder;
pub mod coordinator;
pub mod error;
pub mod observer;
mod clock;
mod processor;
mod state;

#[cfg(test)]
mod tests;

pub use builder::CoordinatorBuilder;
pub use coordinator::{Coordinator, RunSummary};
pub use error::{CoordError, CoordResult};
pub use observer::{NoopObserver, ParkObserver};
pub use processor::{ProcessorStats, outcome_code};
pub use state::ParkState;
