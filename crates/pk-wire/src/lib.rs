//! `pk-wire` — the message record exchanged between agents and the
//! coordinator, its fixed-layout codec, and the transports that carry it.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                   |
//! |---------------|------------------------------------------------------------|
//! | [`message`]   | `Message`, `MessageKind`, `OutcomeCode`                    |
//! | [`codec`]     | `encode`, `decode`, `read_message`, `write_message`        |
//! | [`transport`] | `ReplySink`, `Connector`, `MessageSource` traits           |
//! | [`mailbox`]   | In-process transport over crossbeam channels               |
//! | [`fifo`]      | Named-FIFO transport (Unix only)                           |
//! | [`error`]     | `WireError`, `WireResult<T>`                               |
//!
//! # Channel model
//!
//! The coordinator reads every inbound record from one shared channel,
//! surfaced as a crossbeam `Receiver<Message>` whatever the transport.  Each
//! agent owns a dedicated reply channel, which the coordinator opens through
//! a [`Connector`] the first time that agent registers.

pub mod codec;
pub mod error;
pub mod mailbox;
pub mod message;
pub mod transport;

#[cfg(unix)]
pub mod fifo;


pub use codec::{RECORD_LEN, decode, encode, read_message, write_message};
pub use error::{WireError, WireResult};
pub use mailbox::{MailboxHub, MailboxSink, MailboxSource};
pub use message::{Message, MessageKind, OutcomeCode};
pub use transport::{Connector, MessageSource, ReplySink};

#[cfg(unix)]
pub use fifo::{FifoConnector, FifoSink, FifoSource};
