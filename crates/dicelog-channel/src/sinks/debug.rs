use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;

use dicelog_types::{EventLevel, EventRecord, LevelThreshold};

use crate::channel::{EventChannel, RegistrationHandle};
use crate::error::Result;
use crate::listener::{Listener, SourceObserver};

/// Indent applied to the exception line under a record.
const DETAIL_INDENT: &str = "    ";

/// Render a record as diagnostic text, without the trailing line terminator.
///
/// Shape: `HH:mm | thread | level | message` with the time in UTC, followed by a newline and the
/// four-space-indented exception detail when the record is exception-flagged.
/// Missing payloads render as [`dicelog_types::MISSING_PAYLOAD`].
pub fn format_record(record: &EventRecord) -> String {
    let mut text = format!(
        "{} | {} | {} | {}",
        record.timestamp().format("%H:%M"),
        record.thread_id(),
        record.level(),
        record.message_or_placeholder()
    );
    if let Some(detail) = record.exception_line() {
        text.push('\n');
        text.push_str(DETAIL_INDENT);
        text.push_str(detail);
    }
    text
}

/// Whether a [`DebugSink`] is currently receiving records.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SinkState {
    /// Waiting for the expected source to be created.
    Disabled,
    /// Registered for the expected source at `LogAlways`.
    Enabled { handle: RegistrationHandle },
}

/// Writes every record from one named source to a diagnostic output.
///
/// The sink starts [`Disabled`](SinkState::Disabled). Once attached with
/// [`attach`](Self::attach) it watches the channel, and when a source whose
/// name equals the expected name exactly (case-sensitive) is created it
/// registers itself at [`LevelThreshold::LogAlways`] and becomes
/// [`Enabled`](SinkState::Enabled) for the rest of its life.
pub struct DebugSink {
    expected_source: String,
    state: Mutex<SinkState>,
    output: Mutex<Box<dyn Write + Send>>,
}

impl DebugSink {
    /// A sink writing to standard error.
    pub fn stderr(expected_source: impl Into<String>) -> Self {
        Self::with_writer(expected_source, io::stderr())
    }

    /// A sink writing to an arbitrary output.
    pub fn with_writer(expected_source: impl Into<String>, writer: impl Write + Send + 'static) -> Self {
        Self {
            expected_source: expected_source.into(),
            state: Mutex::new(SinkState::Disabled),
            output: Mutex::new(Box::new(writer)),
        }
    }

    /// Start watching `channel` for the expected source.
    ///
    /// If the source already exists the sink is enabled before this returns.
    pub fn attach(self: &Arc<Self>, channel: &EventChannel) {
        channel.watch_sources(Arc::clone(self) as Arc<dyn SourceObserver>);
    }

    pub fn expected_source(&self) -> &str {
        &self.expected_source
    }

    pub fn state(&self) -> SinkState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self.state(), SinkState::Enabled { .. })
    }
}

impl SourceObserver for DebugSink {
    fn on_source_created(self: Arc<Self>, channel: &EventChannel, source_name: &str) {
        if source_name != self.expected_source || self.is_enabled() {
            return;
        }

        let handle = channel.register_listener(
            source_name,
            Arc::clone(&self) as Arc<dyn Listener>,
            LevelThreshold::LogAlways,
        );
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = SinkState::Enabled { handle };
        debug!(source = source_name, handle = %handle, "debug sink enabled");
    }
}

impl Listener for DebugSink {
    fn name(&self) -> &str {
        "debug-sink"
    }

    fn matches(&self, source_name: &str, _level: EventLevel) -> bool {
        source_name == self.expected_source && self.is_enabled()
    }

    fn on_event(&self, record: &EventRecord) -> Result<()> {
        let text = format_record(record);
        let mut out = self.output.lock().unwrap_or_else(PoisonError::into_inner);
        writeln!(out, "{text}")?;
        out.flush()?;
        Ok(())
    }
}
