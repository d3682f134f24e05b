use std::io;

/// Errors a listener may report while handling a record.
///
/// These never reach the producer: the channel catches them at the dispatch
/// boundary and reports them through `tracing`.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    /// Writing to the sink's output failed.
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    /// The sink could not format the record.
    #[error("format error: {0}")]
    Format(String),

    /// The sink is not able to accept records right now.
    #[error("sink unavailable: {0}")]
    Unavailable(String),
}

/// Convenience alias used by listener implementations.
pub type Result<T> = std::result::Result<T, SinkError>;
