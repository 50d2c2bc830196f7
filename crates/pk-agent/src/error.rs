use pk_wire::WireError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("request file line {line}: {message}")]
    Parse { line: u64, message: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("transport error: {0}")]
    Transport(#[from] WireError),

    #[error("coordinator channel closed while {0}")]
    EndOfStream(&'static str),
}

pub type AgentResult<T> = Result<T, AgentError>;
