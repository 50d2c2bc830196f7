//! `pk-agent` — the reservation agent side of the park_sim framework.
//!
//! An agent loads a request file, registers with the coordinator, and then
//! submits its requests one at a time, waiting for each response.
//!
//! | Module      | Contents                                            |
//! |-------------|-----------------------------------------------------|
//! | [`loader`]  | `ParkRequest`, `load_requests`, `read_requests`     |
//! | [`session`] | `AgentSession`, `SessionSummary`                    |
//! | [`error`]   | `AgentError`, `AgentResult<T>`                      |

pub mod error;
pub mod loader;
pub mod session;

#[cfg(test)]
mod tests;

pub use error::{AgentError, AgentResult};
pub use loader::{ParkRequest, load_requests, read_requests};
pub use session::{AgentSession, DEFAULT_PAUSE, SessionSummary, reply_channel_name};
