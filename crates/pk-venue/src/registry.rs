//! `AgentRegistry<S>` — agent name → reply handle.
//!
//! Entries live in an insertion-ordered arena addressed by [`AgentSlot`];
//! a name index maps agent names to slots.  Entries are never updated or
//! removed during a run, so a slot stays valid for the registry's lifetime.
//!
//! The reply handle type `S` is opaque here.  Handles are stored behind
//! `Arc` so a caller can clone one out under the coordinator's lock and send
//! on it after releasing the lock.

use std::ops::Index;
use std::sync::Arc;

use pk_core::AgentSlot;

#[cfg(not(feature = "fx-hash"))]
type NameIndex = std::collections::HashMap<String, AgentSlot>;

#[cfg(feature = "fx-hash")]
type NameIndex = rustc_hash::FxHashMap<String, AgentSlot>;

/// One registered agent.
#[derive(Debug)]
pub struct AgentEntry<S> {
    pub name:          String,
    /// Channel identifier the agent supplied at registration.
    pub reply_channel: String,
    pub reply:         Arc<S>,
}

/// Result of [`AgentRegistry::register`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Registration {
    pub slot:  AgentSlot,
    /// `false` when the name was already registered and the existing entry
    /// was returned untouched.
    pub added: bool,
}

/// Registry of agents that have sent REGISTER.
#[derive(Debug)]
pub struct AgentRegistry<S> {
    index:   NameIndex,
    entries: Vec<AgentEntry<S>>,
}

impl<S> Default for AgentRegistry<S> {
    fn default() -> Self {
        Self { index: NameIndex::default(), entries: Vec::new() }
    }
}

impl<S> AgentRegistry<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `name` with its reply handle.
    ///
    /// Idempotent: if `name` is already present the existing entry is kept
    /// unchanged and `reply` is dropped.
    pub fn register(&mut self, name: &str, reply_channel: &str, reply: S) -> Registration {
        if let Some(&slot) = self.index.get(name) {
            return Registration { slot, added: false };
        }
        let slot = AgentSlot(self.entries.len() as u32);
        self.entries.push(AgentEntry {
            name:          name.to_owned(),
            reply_channel: reply_channel.to_owned(),
            reply:         Arc::new(reply),
        });
        self.index.insert(name.to_owned(), slot);
        Registration { slot, added: true }
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Look up a registered agent by name.
    pub fn lookup(&self, name: &str) -> Option<&AgentEntry<S>> {
        self.index.get(name).map(|slot| &self.entries[slot.index()])
    }

    pub fn get(&self, slot: AgentSlot) -> Option<&AgentEntry<S>> {
        self.entries.get(slot.index())
    }

    /// All entries in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &AgentEntry<S>> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S> Index<AgentSlot> for AgentRegistry<S> {
    type Output = AgentEntry<S>;

    fn index(&self, slot: AgentSlot) -> &AgentEntry<S> {
        &self.entries[slot.index()]
    }
}
