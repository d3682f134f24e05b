//! Built-in listeners.

pub mod debug;
pub mod memory;
pub mod trace;

pub use debug::{format_record, DebugSink, SinkState};
pub use memory::MemorySink;
pub use trace::TracingSink;
