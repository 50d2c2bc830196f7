//! Shared state of one run: the venue model and the agent registry behind a
//! single lock, plus the active flag.

use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::{Mutex, MutexGuard};
use pk_core::ParkConfig;
use pk_venue::{AgentRegistry, VenueState};

/// Everything the workers mutate.  Always accessed through
/// [`Shared::lock`]; a read is only valid while the guard is held.
#[derive(Debug)]
pub struct ParkState<S> {
    pub venue:    VenueState,
    pub registry: AgentRegistry<S>,
}

impl<S> ParkState<S> {
    pub fn new(config: &ParkConfig) -> Self {
        Self { venue: VenueState::new(config), registry: AgentRegistry::new() }
    }
}

/// State shared by the request processor and the clock driver via `Arc`.
pub(crate) struct Shared<C, O, S> {
    state:         Mutex<ParkState<S>>,
    active:        AtomicBool,
    pub connector: C,
    pub observer:  O,
}

impl<C, O, S> Shared<C, O, S> {
    pub fn new(config: &ParkConfig, connector: C, observer: O) -> Self {
        Self {
            state: Mutex::new(ParkState::new(config)),
            active: AtomicBool::new(true),
            connector,
            observer,
        }
    }

    #[inline]
    pub fn lock(&self) -> MutexGuard<'_, ParkState<S>> {
        self.state.lock()
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    pub fn deactivate(&self) {
        self.active.store(false, Ordering::Release);
    }
}
