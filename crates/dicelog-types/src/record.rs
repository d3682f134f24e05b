use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::keywords::Keywords;
use crate::level::EventLevel;
use crate::thread::ThreadTag;

/// Placeholder rendered wherever an expected payload field is missing.
pub const MISSING_PAYLOAD: &str = "Missing Exception Payload";

/// A single published event.
///
/// Records are immutable once built. The exception detail is only retained
/// when `keywords` carries [`Keywords::EXCEPTION`]; a detail supplied without
/// the flag is dropped at construction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RecordFields")]
pub struct EventRecord {
    source_name: String,
    level: EventLevel,
    timestamp: DateTime<Utc>,
    thread_id: ThreadTag,
    message: String,
    keywords: Keywords,
    #[serde(skip_serializing_if = "Option::is_none")]
    exception_detail: Option<String>,
}

impl EventRecord {
    /// Build a record stamped with the current time and the calling thread.
    pub fn capture(
        source_name: impl Into<String>,
        level: EventLevel,
        message: impl Into<String>,
        keywords: Keywords,
        exception_detail: Option<String>,
    ) -> Self {
        Self::at(
            Utc::now(),
            ThreadTag::current(),
            source_name,
            level,
            message,
            keywords,
            exception_detail,
        )
    }

    /// Build a record with an explicit timestamp and thread tag.
    pub fn at(
        timestamp: DateTime<Utc>,
        thread_id: ThreadTag,
        source_name: impl Into<String>,
        level: EventLevel,
        message: impl Into<String>,
        keywords: Keywords,
        exception_detail: Option<String>,
    ) -> Self {
        let exception_detail = exception_detail.filter(|_| keywords.is_exception());
        Self {
            source_name: source_name.into(),
            level,
            timestamp,
            thread_id,
            message: message.into(),
            keywords,
            exception_detail,
        }
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    pub fn level(&self) -> EventLevel {
        self.level
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn thread_id(&self) -> ThreadTag {
        self.thread_id
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn keywords(&self) -> Keywords {
        self.keywords
    }

    /// Exception detail, present only on exception-flagged records.
    pub fn exception_detail(&self) -> Option<&str> {
        self.exception_detail.as_deref()
    }

    pub fn is_exception(&self) -> bool {
        self.keywords.is_exception()
    }

    /// The message, or [`MISSING_PAYLOAD`] when it is empty.
    pub fn message_or_placeholder(&self) -> &str {
        if self.message.is_empty() {
            MISSING_PAYLOAD
        } else {
            &self.message
        }
    }

    /// The exception line to render, if any.
    ///
    /// `None` when the record is not exception-flagged; otherwise the detail
    /// or [`MISSING_PAYLOAD`].
    pub fn exception_line(&self) -> Option<&str> {
        if !self.is_exception() {
            return None;
        }
        Some(self.exception_detail.as_deref().unwrap_or(MISSING_PAYLOAD))
    }
}

/// Wire shape for deserialization; funnels through [`EventRecord::at`] so
/// decoded records obey the same detail/flag rule as freshly built ones.
#[derive(Deserialize)]
struct RecordFields {
    source_name: String,
    level: EventLevel,
    timestamp: DateTime<Utc>,
    thread_id: ThreadTag,
    message: String,
    keywords: Keywords,
    #[serde(default)]
    exception_detail: Option<String>,
}

impl From<RecordFields> for EventRecord {
    fn from(f: RecordFields) -> Self {
        Self::at(
            f.timestamp,
            f.thread_id,
            f.source_name,
            f.level,
            f.message,
            f.keywords,
            f.exception_detail,
        )
    }
}
