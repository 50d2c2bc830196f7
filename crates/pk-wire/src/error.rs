#[cfg(unix)]
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WireError {
    #[error("unknown message kind {0}")]
    UnknownKind(u32),

    #[error("unknown outcome code {0}")]
    UnknownOutcome(i32),

    #[error("negative people count {0}")]
    NegativePeople(i32),

    #[error("field `{field}` is not valid UTF-8")]
    Utf8 { field: &'static str },

    #[error("truncated record: got {got} of {expected} bytes")]
    Truncated { got: usize, expected: usize },

    #[error("channel {0:?} is disconnected")]
    Disconnected(String),

    #[error("nobody is reading channel {0:?}")]
    NoReader(String),

    #[error("no channel named {0:?}")]
    UnknownChannel(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(unix)]
    #[error("cannot create FIFO {path:?}: {source}")]
    Fifo {
        path:   PathBuf,
        source: nix::errno::Errno,
    },
}

impl WireError {
    /// `true` for errors caused by the content of a single, fully received
    /// record.  The stream itself is still aligned on a record boundary, so
    /// the reader may skip the record and keep going.
    pub fn is_decode(&self) -> bool {
        matches!(
            self,
            WireError::UnknownKind(_)
                | WireError::UnknownOutcome(_)
                | WireError::NegativePeople(_)
                | WireError::Utf8 { .. }
        )
    }

    /// `true` when the other end of the channel has gone away: the agent
    /// closed its reply channel, dropped its mailbox, or never opened it.
    pub fn is_peer_gone(&self) -> bool {
        match self {
            WireError::Disconnected(_) | WireError::NoReader(_) => true,
            WireError::Io(e) => e.kind() == std::io::ErrorKind::BrokenPipe,
            _ => false,
        }
    }
}

pub type WireResult<T> = Result<T, WireError>;
