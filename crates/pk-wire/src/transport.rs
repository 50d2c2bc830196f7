//! Transport traits.
//!
//! The coordinator never touches a concrete transport.  It sends through
//! [`ReplySink`]s that a [`Connector`] opens from the reply-channel name an
//! agent supplies at registration.  Agents read their replies through a
//! [`MessageSource`].

use crate::{Message, WireResult};

/// The sending half of a channel.
///
/// Shared between the request processor and the clock driver (both may reply
/// to the same agent), hence `Send + Sync` and `&self`.
pub trait ReplySink: Send + Sync {
    /// Deliver one record.  Any error is a transport failure; there are no
    /// retries.
    fn send(&self, msg: &Message) -> WireResult<()>;
}

/// Opens reply channels by name.
pub trait Connector: Send + Sync + 'static {
    type Sink: ReplySink + 'static;

    /// Open the channel named `reply_channel` for writing.
    fn connect(&self, reply_channel: &str) -> WireResult<Self::Sink>;

    /// Like [`connect`](Self::connect), but a transport that has to wait for
    /// the other end gives up once `keep_trying` returns `false`.
    fn connect_while<F>(&self, reply_channel: &str, keep_trying: F) -> WireResult<Self::Sink>
    where
        F: Fn() -> bool,
    {
        let _ = keep_trying;
        self.connect(reply_channel)
    }
}

/// The receiving half of an agent's reply channel.
pub trait MessageSource {
    /// Block until the next record arrives.
    ///
    /// Returns `Ok(None)` when the channel reaches end-of-stream.
    fn recv(&mut self) -> WireResult<Option<Message>>;
}

impl<S: ReplySink + ?Sized> ReplySink for std::sync::Arc<S> {
    fn send(&self, msg: &Message) -> WireResult<()> {
        (**self).send(msg)
    }
}

impl<S: ReplySink + ?Sized> ReplySink for Box<S> {
    fn send(&self, msg: &Message) -> WireResult<()> {
        (**self).send(msg)
    }
}
