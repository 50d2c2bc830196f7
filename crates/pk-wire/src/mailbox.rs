//! In-process transport over crossbeam channels.
//!
//! A [`MailboxHub`] plays the role of the filesystem for named FIFOs: agents
//! [`open`](MailboxHub::open) a named reply mailbox, and the coordinator
//! connects to it by name when the agent registers.  The shared inbound
//! channel is a plain unbounded crossbeam channel created with
//! [`MailboxHub::inbound`].

use std::collections::HashMap;
use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender, unbounded};
use parking_lot::Mutex;

use crate::{Connector, Message, MessageSource, ReplySink, WireError, WireResult};

/// Sending half of a named mailbox.
#[derive(Clone, Debug)]
pub struct MailboxSink {
    name: String,
    tx:   Sender<Message>,
}

impl MailboxSink {
    pub fn new(name: impl Into<String>, tx: Sender<Message>) -> Self {
        Self { name: name.into(), tx }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl ReplySink for MailboxSink {
    fn send(&self, msg: &Message) -> WireResult<()> {
        self.tx
            .send(msg.clone())
            .map_err(|_| WireError::Disconnected(self.name.clone()))
    }
}

/// Receiving half of a named mailbox.
#[derive(Debug)]
pub struct MailboxSource {
    rx: Receiver<Message>,
}

impl MailboxSource {
    pub fn new(rx: Receiver<Message>) -> Self {
        Self { rx }
    }
}

impl MessageSource for MailboxSource {
    fn recv(&mut self) -> WireResult<Option<Message>> {
        Ok(self.rx.recv().ok())
    }
}

/// Registry of named in-process mailboxes.
///
/// Cheap to clone; all clones share the same name table.
#[derive(Clone, Default)]
pub struct MailboxHub {
    channels: Arc<Mutex<HashMap<String, Sender<Message>>>>,
}

impl MailboxHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the coordinator's shared inbound channel.
    ///
    /// The returned sink is what agents send through; clone it once per
    /// agent.  The receiver reports end-of-stream once every sink clone has
    /// been dropped.
    pub fn inbound(name: impl Into<String>) -> (MailboxSink, Receiver<Message>) {
        let (tx, rx) = unbounded();
        (MailboxSink::new(name, tx), rx)
    }

    /// Create (or replace) the mailbox `name` and return its receiving half.
    pub fn open(&self, name: &str) -> MailboxSource {
        let (tx, rx) = unbounded();
        self.channels.lock().insert(name.to_owned(), tx);
        MailboxSource::new(rx)
    }

    /// Forget the mailbox `name`.  Sinks already connected keep working.
    pub fn remove(&self, name: &str) -> bool {
        self.channels.lock().remove(name).is_some()
    }
}

impl Connector for MailboxHub {
    type Sink = MailboxSink;

    fn connect(&self, reply_channel: &str) -> WireResult<MailboxSink> {
        let channels = self.channels.lock();
        let tx = channels
            .get(reply_channel)
            .ok_or_else(|| WireError::UnknownChannel(reply_channel.to_owned()))?;
        Ok(MailboxSink::new(reply_channel, tx.clone()))
    }
}
