//! Foundation types for dicelog.
//!
//! This crate provides the value types that flow through the event channel.
//! Every other dicelog crate depends on `dicelog-types`.
//!
//! # Key Types
//!
//! - [`EventLevel`]: Ordered severity of a published event
//! - [`LevelThreshold`]: Minimum severity a listener accepts (`LogAlways` admits everything)
//! - [`Keywords`]: Flag set for coarse-grained filtering
//! - [`ThreadTag`]: Numeric identifier of the emitting thread
//! - [`EventRecord`]: One immutable published event

pub mod error;
pub mod keywords;
pub mod level;
pub mod record;
pub mod thread;

pub use error::TypeError;
pub use keywords::Keywords;
pub use level::{EventLevel, LevelThreshold};
pub use record::{EventRecord, MISSING_PAYLOAD};
pub use thread::ThreadTag;
