//! `AgentSession` — one agent's conversation with the coordinator.
//!
//! ```text
//! register: REGISTER → open replies → wait REGISTER_ACK (remember hour)
//!           SHUTDOWN instead of the ack: the park already closed
//! run:      for each request
//!             hour < registered hour → skip
//!             REQUEST → wait RESPONSE → pause
//!           SHUTDOWN while waiting ends the run early
//! ```
//!
//! The protocol is synchronous: at most one request is outstanding, so
//! responses arrive in submission order.

use std::thread;
use std::time::Duration;

use pk_core::Hour;
use pk_wire::{Message, MessageKind, MessageSource, ReplySink};
use tracing::{info, warn};

use crate::{AgentError, AgentResult, ParkRequest};

/// Pause between a response and the next request unless overridden.
pub const DEFAULT_PAUSE: Duration = Duration::from_secs(2);

/// Name of the reply channel an agent called `agent` listens on.
pub fn reply_channel_name(agent: &str) -> String {
    format!("pipe_resp_{agent}")
}

/// What a finished session did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionSummary {
    /// Requests skipped because their hour had already passed at
    /// registration.
    pub skipped:   usize,
    /// RESPONSE records, in submission order.
    pub responses: Vec<Message>,
    /// `true` if a SHUTDOWN ended the session before every request was sent.
    pub shut_down: bool,
}

impl SessionSummary {
    pub fn sent(&self) -> usize {
        self.responses.len()
    }
}

/// A registered agent.
///
/// `T` carries records to the coordinator's inbound channel and `R`
/// delivers the agent's replies.
pub struct AgentSession<T: ReplySink, R: MessageSource> {
    name:            String,
    outbound:        T,
    replies:         R,
    registered_hour: Hour,
    closed:          bool,
    pause:           Duration,
}

impl<T: ReplySink, R: MessageSource> AgentSession<T, R> {
    /// Register `name` and wait for the acknowledgment.
    ///
    /// `open_replies` is called after REGISTER is sent: opening a FIFO for
    /// reading blocks until the coordinator connects to it, which it only
    /// does on receiving REGISTER.
    pub fn register<F>(
        name:          &str,
        reply_channel: &str,
        outbound:      T,
        open_replies:  F,
    ) -> AgentResult<Self>
    where
        F: FnOnce() -> AgentResult<R>,
    {
        outbound.send(&Message::register(name, reply_channel))?;
        let mut replies = open_replies()?;

        let ack = replies
            .recv()?
            .ok_or(AgentError::EndOfStream("waiting for REGISTER_ACK"))?;
        let closed = match ack.kind {
            MessageKind::RegisterAck => {
                info!(agent = name, hour = %ack.hour, "registered");
                false
            }
            MessageKind::Shutdown => {
                info!(agent = name, "coordinator already closed");
                true
            }
            other => {
                warn!(agent = name, kind = %other, "unexpected reply to REGISTER");
                false
            }
        };

        Ok(Self {
            name: name.to_owned(),
            outbound,
            replies,
            registered_hour: ack.hour,
            closed,
            pause: DEFAULT_PAUSE,
        })
    }

    /// Set the pause between requests.
    pub fn with_pause(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Simulated hour reported in the REGISTER_ACK.
    pub fn registered_hour(&self) -> Hour {
        self.registered_hour
    }

    /// `true` if the coordinator answered REGISTER with SHUTDOWN.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Send every request in order and collect the responses.
    pub fn run(&mut self, requests: &[ParkRequest]) -> AgentResult<SessionSummary> {
        let mut summary = SessionSummary::default();
        if self.closed {
            summary.shut_down = true;
            return Ok(summary);
        }

        for req in requests {
            if req.hour < self.registered_hour {
                summary.skipped += 1;
                info!(
                    agent = %self.name,
                    family = %req.family,
                    hour = %req.hour,
                    registered = %self.registered_hour,
                    "request skipped: hour already passed"
                );
                continue;
            }

            info!(agent = %self.name, family = %req.family, hour = %req.hour, people = req.people, "sending request");
            self.outbound
                .send(&Message::request(&self.name, &req.family, req.hour, req.people))?;

            match self.await_response()? {
                Some(response) => {
                    log_response(&self.name, &response);
                    summary.responses.push(response);
                }
                None => {
                    info!(agent = %self.name, "coordinator shut down; stopping");
                    summary.shut_down = true;
                    break;
                }
            }

            if !self.pause.is_zero() {
                thread::sleep(self.pause);
            }
        }

        info!(agent = %self.name, sent = summary.sent(), skipped = summary.skipped, "session finished");
        Ok(summary)
    }

    /// Block until a RESPONSE arrives.  `None` means SHUTDOWN.
    fn await_response(&mut self) -> AgentResult<Option<Message>> {
        loop {
            let msg = self
                .replies
                .recv()?
                .ok_or(AgentError::EndOfStream("waiting for a response"))?;
            match msg.kind {
                MessageKind::Response => return Ok(Some(msg)),
                MessageKind::Shutdown => return Ok(None),
                other => warn!(agent = %self.name, kind = %other, "unexpected reply while waiting for a response"),
            }
        }
    }
}

fn log_response(agent: &str, response: &Message) {
    let outcome = response.outcome.map(|o| o.to_string()).unwrap_or_else(|| "none".into());
    let assigned = response
        .assigned_hour
        .map(|h| h.to_string())
        .unwrap_or_else(|| "none".into());
    info!(
        agent,
        family = %response.family,
        hour = %response.hour,
        people = response.people,
        %outcome,
        %assigned,
        "response"
    );
}
