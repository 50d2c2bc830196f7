//! The message record and its enumerated fields.

use std::fmt;

use pk_core::Hour;

/// What a [`Message`] means.  The discriminant is the on-wire value.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[repr(u32)]
pub enum MessageKind {
    /// Agent → coordinator: first contact, carries the reply channel name.
    Register    = 0,
    /// Coordinator → agent: registration accepted, carries the current hour.
    RegisterAck = 1,
    /// Agent → coordinator: reserve `people` for `family` at `hour`.
    Request     = 2,
    /// Coordinator → agent: admission outcome for one request.
    Response    = 3,
    /// Coordinator → agent: the venue has closed; no further responses.
    Shutdown    = 4,
}

impl MessageKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MessageKind::Register    => "REGISTER",
            MessageKind::RegisterAck => "REGISTER_ACK",
            MessageKind::Request     => "REQUEST",
            MessageKind::Response    => "RESPONSE",
            MessageKind::Shutdown    => "SHUTDOWN",
        }
    }
}

impl TryFrom<u32> for MessageKind {
    type Error = u32;
    fn try_from(v: u32) -> Result<Self, u32> {
        Ok(match v {
            0 => MessageKind::Register,
            1 => MessageKind::RegisterAck,
            2 => MessageKind::Request,
            3 => MessageKind::Response,
            4 => MessageKind::Shutdown,
            other => return Err(other),
        })
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Admission outcome carried by a RESPONSE.  The discriminant is the on-wire
/// value.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[repr(i32)]
pub enum OutcomeCode {
    /// Booked at the requested hour.
    AcceptedOriginal     = 1,
    /// Booked at a later hour found by forward search.
    Reprogrammed         = 2,
    /// Part of the record schema; the admission policy never produces it.
    DeniedExtemporaneous = 3,
    /// No hour can take the request.
    DeniedNoOption       = 4,
}

impl OutcomeCode {
    #[inline]
    pub fn code(self) -> i32 {
        self as i32
    }

    #[inline]
    pub fn is_denied(self) -> bool {
        matches!(self, OutcomeCode::DeniedExtemporaneous | OutcomeCode::DeniedNoOption)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OutcomeCode::AcceptedOriginal     => "accepted",
            OutcomeCode::Reprogrammed         => "reprogrammed",
            OutcomeCode::DeniedExtemporaneous => "denied (extemporaneous)",
            OutcomeCode::DeniedNoOption       => "denied (no option)",
        }
    }
}

impl TryFrom<i32> for OutcomeCode {
    type Error = i32;
    fn try_from(v: i32) -> Result<Self, i32> {
        Ok(match v {
            1 => OutcomeCode::AcceptedOriginal,
            2 => OutcomeCode::Reprogrammed,
            3 => OutcomeCode::DeniedExtemporaneous,
            4 => OutcomeCode::DeniedNoOption,
            other => return Err(other),
        })
    }
}

impl fmt::Display for OutcomeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.code(), self.as_str())
    }
}

/// One record on any channel.
///
/// Every kind uses the same layout; fields a kind does not use are left at
/// their defaults (empty strings, hour 0, people 0, no outcome, no assigned
/// hour).
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Message {
    pub kind:          MessageKind,
    pub agent:         String,
    pub family:        String,
    pub hour:          Hour,
    pub people:        u32,
    /// Only meaningful on REGISTER.
    pub reply_channel: String,
    pub outcome:       Option<OutcomeCode>,
    pub assigned_hour: Option<Hour>,
}

impl Message {
    fn blank(kind: MessageKind) -> Self {
        Self {
            kind,
            agent:         String::new(),
            family:        String::new(),
            hour:          Hour(0),
            people:        0,
            reply_channel: String::new(),
            outcome:       None,
            assigned_hour: None,
        }
    }

    pub fn register(agent: impl Into<String>, reply_channel: impl Into<String>) -> Self {
        Self {
            agent: agent.into(),
            reply_channel: reply_channel.into(),
            ..Self::blank(MessageKind::Register)
        }
    }

    pub fn register_ack(agent: impl Into<String>, current_hour: Hour) -> Self {
        Self {
            agent: agent.into(),
            hour: current_hour,
            ..Self::blank(MessageKind::RegisterAck)
        }
    }

    pub fn request(
        agent:  impl Into<String>,
        family: impl Into<String>,
        hour:   Hour,
        people: u32,
    ) -> Self {
        Self {
            agent: agent.into(),
            family: family.into(),
            hour,
            people,
            ..Self::blank(MessageKind::Request)
        }
    }

    /// Build the RESPONSE to `request`, echoing its agent, family, hour and
    /// people.
    pub fn response(request: &Message, outcome: OutcomeCode, assigned_hour: Option<Hour>) -> Self {
        Self {
            agent: request.agent.clone(),
            family: request.family.clone(),
            hour: request.hour,
            people: request.people,
            outcome: Some(outcome),
            assigned_hour,
            ..Self::blank(MessageKind::Response)
        }
    }

    pub fn shutdown() -> Self {
        Self::blank(MessageKind::Shutdown)
    }
}
