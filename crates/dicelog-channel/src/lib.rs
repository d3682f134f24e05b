//! Event channel for dicelog.
//!
//! Producers publish structured [`EventRecord`]s to an [`EventChannel`],
//! which fans them out synchronously, on the publishing thread, to every
//! registered [`Listener`] whose source filter and level threshold match.
//! Listener failures are isolated at the dispatch boundary and never reach
//! the producer.
//!
//! The [`DebugSink`] enables itself when a source with its expected name is
//! created and writes one formatted line per record to a diagnostic output.

pub mod channel;
pub mod config;
pub mod error;
pub mod listener;
pub mod sinks;
pub mod source;

pub use channel::{EventChannel, RegistrationHandle};
pub use config::{AttachedSinks, ChannelConfig, DEFAULT_SOURCE_NAME};
pub use error::{Result, SinkError};
pub use listener::{from_fn, FnListener, Listener, SourceObserver};
pub use sinks::{format_record, DebugSink, MemorySink, SinkState, TracingSink};
pub use source::EventSource;

pub use dicelog_types::{EventLevel, EventRecord, Keywords, LevelThreshold, ThreadTag};
