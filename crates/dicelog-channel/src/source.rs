use std::fmt;
use std::sync::Arc;

use dicelog_types::{EventLevel, Keywords};

use crate::channel::EventChannel;

/// Producer handle for one named source on a channel.
///
/// Obtained from [`EventChannel::create_source`]. Cloning is cheap.
#[derive(Clone)]
pub struct EventSource {
    name: Arc<str>,
    channel: EventChannel,
}

impl EventSource {
    pub(crate) fn new(name: &str, channel: EventChannel) -> Self {
        Self {
            name: Arc::from(name),
            channel,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn channel(&self) -> &EventChannel {
        &self.channel
    }

    /// Returns `true` if any listener would receive a record at `level`.
    ///
    /// Producers can check this before building expensive messages.
    pub fn is_enabled(&self, level: EventLevel) -> bool {
        self.channel.is_enabled(&self.name, level)
    }

    pub fn write(
        &self,
        level: EventLevel,
        message: impl Into<String>,
        keywords: Keywords,
        exception_detail: Option<String>,
    ) {
        self.channel
            .publish(&self.name, level, message, keywords, exception_detail);
    }

    pub fn verbose(&self, message: impl Into<String>) {
        self.write(EventLevel::Verbose, message, Keywords::NONE, None);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.write(EventLevel::Informational, message, Keywords::NONE, None);
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.write(EventLevel::Warning, message, Keywords::NONE, None);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.write(EventLevel::Error, message, Keywords::NONE, None);
    }

    pub fn critical(&self, message: impl Into<String>) {
        self.write(EventLevel::Critical, message, Keywords::NONE, None);
    }

    /// Publish an Error-level record flagged [`Keywords::EXCEPTION`].
    pub fn exception(&self, message: impl Into<String>, detail: impl Into<String>) {
        self.write(
            EventLevel::Error,
            message,
            Keywords::EXCEPTION,
            Some(detail.into()),
        );
    }
}

impl fmt::Debug for EventSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventSource").field("name", &self.name).finish()
    }
}
