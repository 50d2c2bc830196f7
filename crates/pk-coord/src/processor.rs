//! The request processor (worker thread A).
//!
//! Blocks on the inbound channel and the shutdown signal at the same time.
//! Every message is handled with the venue lock taken only around state
//! access; connecting and sending happen with the lock released.
//!
//! # Termination
//!
//! - Inbound end-of-stream: exit.
//! - Shutdown signalled: handle whatever is already queued, then exit.
//!   Nothing after that point blocks.

use std::sync::Arc;

use crossbeam_channel::{Receiver, select};
use pk_venue::{Decision, Outcome};
use pk_wire::{Connector, Message, MessageKind, OutcomeCode, ReplySink};
use tracing::{debug, info, warn};

use crate::state::Shared;
use crate::{CoordError, CoordResult, ParkObserver};

/// Wire code for a venue outcome.  Every denial maps to "no option";
/// extemporaneous requests are reprogrammed rather than denied.
pub fn outcome_code(outcome: Outcome) -> OutcomeCode {
    match outcome {
        Outcome::AcceptedOriginal => OutcomeCode::AcceptedOriginal,
        Outcome::Reprogrammed     => OutcomeCode::Reprogrammed,
        Outcome::Denied(_)        => OutcomeCode::DeniedNoOption,
    }
}

/// Tally of what the request processor saw during a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ProcessorStats {
    /// REGISTER messages handled, repeats included.
    pub registrations: u64,
    /// REQUEST messages decided.
    pub requests:      u64,
    /// Decisions whose RESPONSE could not be delivered.
    pub undelivered:   u64,
    /// Messages of a kind the coordinator never accepts.
    pub anomalies:     u64,
}

pub(crate) struct RequestProcessor<C: Connector, O> {
    shared: Arc<Shared<C, O, C::Sink>>,
    stats:  ProcessorStats,
}

impl<C: Connector, O: ParkObserver> RequestProcessor<C, O> {
    pub fn new(shared: Arc<Shared<C, O, C::Sink>>) -> Self {
        Self { shared, stats: ProcessorStats::default() }
    }

    pub fn run(
        mut self,
        inbound:  Receiver<Message>,
        shutdown: Receiver<()>,
    ) -> CoordResult<ProcessorStats> {
        loop {
            select! {
                recv(inbound) -> msg => match msg {
                    Ok(msg) => self.handle(msg)?,
                    Err(_) => {
                        info!("inbound channel closed");
                        break;
                    }
                },
                // The clock driver drops its sender when it stops.
                recv(shutdown) -> _ => {
                    self.drain(&inbound)?;
                    break;
                }
            }
        }
        Ok(self.stats)
    }

    fn drain(&mut self, inbound: &Receiver<Message>) -> CoordResult<()> {
        let mut drained = 0usize;
        while let Ok(msg) = inbound.try_recv() {
            self.handle(msg)?;
            drained += 1;
        }
        debug!(drained, "request processor stopping after shutdown");
        Ok(())
    }

    fn handle(&mut self, msg: Message) -> CoordResult<()> {
        match msg.kind {
            MessageKind::Register => self.on_register(&msg),
            MessageKind::Request => self.on_request(&msg),
            other => {
                self.stats.anomalies += 1;
                warn!(kind = %other, agent = %msg.agent, "unexpected message on inbound channel");
                Ok(())
            }
        }
    }

    // ── REGISTER ──────────────────────────────────────────────────────────

    fn on_register(&mut self, msg: &Message) -> CoordResult<()> {
        self.stats.registrations += 1;

        let known = {
            let state = self.shared.lock();
            state.registry.lookup(&msg.agent).map(|entry| {
                let open = self.shared.is_active().then(|| state.venue.current_hour());
                (Arc::clone(&entry.reply), open)
            })
        };

        let (reply, hour, added) = match known {
            Some((reply, Some(hour))) => (reply, hour, false),
            Some((reply, None)) => return self.refuse_after_close(msg, &*reply),
            None => {
                // Waiting for the agent to listen happens outside the lock,
                // and stops once the park closes.
                let shared = Arc::clone(&self.shared);
                let sink = match self
                    .shared
                    .connector
                    .connect_while(&msg.reply_channel, move || shared.is_active())
                {
                    Ok(sink) => sink,
                    Err(e) if e.is_peer_gone() => {
                        self.stats.anomalies += 1;
                        warn!(agent = %msg.agent, channel = %msg.reply_channel, error = %e, "agent never opened its reply channel");
                        return Ok(());
                    }
                    Err(e) => return Err(CoordError::transport("opening reply channel")(e)),
                };

                // The clock clears the active flag under this lock before it
                // snapshots the agents for SHUTDOWN.
                let mut state = self.shared.lock();
                if !self.shared.is_active() {
                    drop(state);
                    return self.refuse_after_close(msg, &sink);
                }
                let reg = state.registry.register(&msg.agent, &msg.reply_channel, sink);
                (Arc::clone(&state.registry[reg.slot].reply), state.venue.current_hour(), reg.added)
            }
        };

        if added {
            info!(agent = %msg.agent, channel = %msg.reply_channel, %hour, "agent registered");
        } else {
            debug!(agent = %msg.agent, "repeated registration");
        }
        self.shared.observer.on_register(&msg.agent, hour, added);

        reply
            .send(&Message::register_ack(&msg.agent, hour))
            .map_err(CoordError::transport("sending REGISTER_ACK"))
    }

    /// A REGISTER that arrives after close is answered with SHUTDOWN and the
    /// agent is not added.
    fn refuse_after_close(&mut self, msg: &Message, reply: &impl ReplySink) -> CoordResult<()> {
        self.stats.anomalies += 1;
        warn!(agent = %msg.agent, "registration after close; answering SHUTDOWN");
        match reply.send(&Message::shutdown()) {
            Ok(()) => Ok(()),
            Err(e) if e.is_peer_gone() => Ok(()),
            Err(e) => Err(CoordError::transport("sending SHUTDOWN")(e)),
        }
    }

    // ── REQUEST ───────────────────────────────────────────────────────────

    fn on_request(&mut self, msg: &Message) -> CoordResult<()> {
        self.stats.requests += 1;

        let (decision, reply) = {
            let mut state = self.shared.lock();
            let decision = state.venue.admit(&msg.family, msg.people, msg.hour);
            let reply = state.registry.lookup(&msg.agent).map(|entry| Arc::clone(&entry.reply));
            (decision, reply)
        };

        log_decision(msg, &decision);
        self.shared.observer.on_decision(msg, &decision);

        let Some(reply) = reply else {
            self.stats.undelivered += 1;
            warn!(agent = %msg.agent, family = %msg.family, "no registered agent to answer");
            return Ok(());
        };

        let response = Message::response(msg, outcome_code(decision.outcome), decision.assigned_hour);
        match reply.send(&response) {
            Ok(()) => Ok(()),
            Err(e) if e.is_peer_gone() => {
                self.stats.undelivered += 1;
                warn!(agent = %msg.agent, error = %e, "agent left before its response");
                Ok(())
            }
            Err(e) => Err(CoordError::transport("sending RESPONSE")(e)),
        }
    }
}

fn log_decision(msg: &Message, decision: &Decision) {
    match decision.assigned_hour {
        Some(assigned) => debug!(
            agent = %msg.agent,
            family = %msg.family,
            hour = %msg.hour,
            people = msg.people,
            outcome = ?decision.outcome,
            %assigned,
            "request decided"
        ),
        None => debug!(
            agent = %msg.agent,
            family = %msg.family,
            hour = %msg.hour,
            people = msg.people,
            outcome = ?decision.outcome,
            "request denied"
        ),
    }
}
