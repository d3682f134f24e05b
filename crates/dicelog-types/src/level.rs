use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Severity of a published event.
///
/// Ordering: `Verbose` < `Informational` < `Warning` < `Error` < `Critical`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventLevel {
    /// Low-level diagnostics.
    Verbose,
    /// Normal operational messages.
    Informational,
    /// Something unexpected that did not stop the operation.
    Warning,
    /// An operation failed.
    Error,
    /// A failure the process cannot recover from.
    Critical,
}

impl EventLevel {
    /// All levels in ascending severity.
    pub const ALL: [EventLevel; 5] = [
        Self::Verbose,
        Self::Informational,
        Self::Warning,
        Self::Error,
        Self::Critical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Verbose => "Verbose",
            Self::Informational => "Informational",
            Self::Warning => "Warning",
            Self::Error => "Error",
            Self::Critical => "Critical",
        }
    }
}

impl fmt::Display for EventLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventLevel {
    type Err = TypeError;

    /// Case-insensitive; accepts the short aliases `info` and `warn`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "verbose" => Ok(Self::Verbose),
            "informational" | "info" => Ok(Self::Informational),
            "warning" | "warn" => Ok(Self::Warning),
            "error" => Ok(Self::Error),
            "critical" => Ok(Self::Critical),
            _ => Err(TypeError::UnknownLevel(s.to_string())),
        }
    }
}

/// Minimum severity a listener requires before it receives a record.
///
/// Serialized as a plain string: `"LogAlways"` or a level name.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum LevelThreshold {
    /// No filtering: every level is admitted.
    #[default]
    LogAlways,
    /// Only levels at or above the given severity are admitted.
    AtLeast(EventLevel),
}

impl LevelThreshold {
    /// Returns `true` if a record at `level` passes this threshold.
    pub fn admits(&self, level: EventLevel) -> bool {
        match self {
            Self::LogAlways => true,
            Self::AtLeast(min) => level >= *min,
        }
    }
}

impl fmt::Display for LevelThreshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LogAlways => f.write_str("LogAlways"),
            Self::AtLeast(level) => write!(f, "{level}"),
        }
    }
}

impl FromStr for LevelThreshold {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("logalways") || s.eq_ignore_ascii_case("all") {
            return Ok(Self::LogAlways);
        }
        s.parse::<EventLevel>()
            .map(Self::AtLeast)
            .map_err(|_| TypeError::UnknownThreshold(s.to_string()))
    }
}

impl From<EventLevel> for LevelThreshold {
    fn from(level: EventLevel) -> Self {
        Self::AtLeast(level)
    }
}

impl From<LevelThreshold> for String {
    fn from(threshold: LevelThreshold) -> Self {
        threshold.to_string()
    }
}

impl TryFrom<String> for LevelThreshold {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}
