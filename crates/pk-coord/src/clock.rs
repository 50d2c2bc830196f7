//! The clock driver (worker thread B).
//!
//! Sleeps one hour-interval at a time and advances the venue clock under the
//! lock.  Once the clock is at the closing hour it stops: the active flag is
//! cleared, every registered agent gets a SHUTDOWN, and the shutdown sender
//! is dropped so the request processor wakes up.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::Sender;
use pk_core::Hour;
use pk_wire::{Connector, Message, ReplySink};
use tracing::{debug, info, warn};

use crate::state::Shared;
use crate::{CoordError, CoordResult, ParkObserver};

pub(crate) struct ClockDriver<C: Connector, O> {
    shared:        Arc<Shared<C, O, C::Sink>>,
    hour_duration: Duration,
    shutdown:      Sender<()>,
}

impl<C: Connector, O: ParkObserver> ClockDriver<C, O> {
    pub fn new(
        shared:        Arc<Shared<C, O, C::Sink>>,
        hour_duration: Duration,
        shutdown:      Sender<()>,
    ) -> Self {
        Self { shared, hour_duration, shutdown }
    }

    /// Run until the closing hour.  Returns the hour the clock stopped at.
    pub fn run(self) -> CoordResult<Hour> {
        loop {
            thread::sleep(self.hour_duration);
            let report = self.shared.lock().venue.advance_hour();
            match report {
                Some(report) => {
                    debug!(hour = %report.hour, occupancy = ?report.occupancy, "hour advanced");
                    self.shared.observer.on_hour(&report);
                }
                None => break,
            }
        }
        self.stop()
    }

    fn stop(self) -> CoordResult<Hour> {
        let (final_hour, sinks) = {
            let state = self.shared.lock();
            self.shared.deactivate();
            let sinks: Vec<_> = state
                .registry
                .iter()
                .map(|entry| (entry.name.clone(), Arc::clone(&entry.reply)))
                .collect();
            (state.venue.current_hour(), sinks)
        };
        info!(hour = %final_hour, agents = sinks.len(), "park closed; sending SHUTDOWN");

        let shutdown = Message::shutdown();
        for (agent, sink) in &sinks {
            match sink.send(&shutdown) {
                Ok(()) => {}
                Err(e) if e.is_peer_gone() => {
                    debug!(%agent, "agent already gone at shutdown");
                }
                Err(e) => {
                    warn!(%agent, error = %e, "SHUTDOWN delivery failed");
                    return Err(CoordError::transport("broadcasting SHUTDOWN")(e));
                }
            }
        }
        self.shared.observer.on_shutdown(final_hour, sinks.len());

        // Dropping the last sender disconnects the channel, which is the
        // signal the request processor selects on.
        drop(self.shutdown);
        Ok(final_hour)
    }
}
