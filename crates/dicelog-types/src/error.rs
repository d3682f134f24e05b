use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("unknown event level: {0}")]
    UnknownLevel(String),

    #[error("unknown level threshold: {0}")]
    UnknownThreshold(String),
}
