//! Framework error type.
//!
//! Sub-crates define their own error enums and wrap `PkError` as one variant
//! where a core failure can surface through them.

use thiserror::Error;

/// The top-level error type for `pk-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum PkError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for all `pk-*` crates.
pub type PkResult<T> = Result<T, PkError>;
