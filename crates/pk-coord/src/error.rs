use pk_core::PkError;
use pk_wire::WireError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoordError {
    #[error("coordinator configuration error: {0}")]
    Config(#[from] PkError),

    #[error("transport failure while {during}: {source}")]
    Transport {
        during: &'static str,
        #[source]
        source: WireError,
    },

    #[error("{0} thread panicked")]
    WorkerPanicked(&'static str),

    #[error("failed to spawn {what} thread: {source}")]
    Spawn {
        what:   &'static str,
        #[source]
        source: std::io::Error,
    },
}

impl CoordError {
    pub(crate) fn transport(during: &'static str) -> impl FnOnce(WireError) -> CoordError {
        move |source| CoordError::Transport { during, source }
    }
}

pub type CoordResult<T> = Result<T, CoordError>;
