//! Core types for stream-extract

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier for an extraction job
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct JobId(pub i64);

impl JobId {
    /// Create a new JobId
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the inner i64 value
    pub fn get(&self) -> i64 {
        self.0
    }
}

impl From<i64> for JobId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle state of a single part file, as tracked by the part monitor.
///
/// Transitions are one-way: a part starts `Pending` and moves to exactly one
/// of the terminal states. A part that never leaves `Pending` was abandoned
/// by the orchestrator's grace timeout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PartStatus {
    /// Still being watched; size may change again
    Pending,
    /// Size held steady for one full polling interval and the file was removed
    QuiescentDeleted,
    /// File disappeared between polls (consumed or removed by the extractor)
    Vanished,
}

/// Severity of a log event
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational progress line
    Info,
    /// Positive outcome (part deleted, extraction complete)
    Success,
    /// Failure or non-fatal warning
    Error,
}

/// A timestamped log line emitted by the driver or the part monitor.
///
/// Consumers subscribe via [`crate::sink::LogSink::subscribe`]. Lines from
/// the two producers may interleave, but each event is always one complete
/// line — the channel never splits or merges messages.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LogEvent {
    /// When the line was produced
    pub timestamp: DateTime<Utc>,
    /// Severity tag
    pub severity: Severity,
    /// The line of text (no trailing newline)
    pub message: String,
}

impl LogEvent {
    /// Create an event with the given severity, timestamped now
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            severity,
            message: message.into(),
        }
    }

    /// Informational event
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Severity::Info, message)
    }

    /// Success event
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(Severity::Success, message)
    }

    /// Error event
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_id_display_and_conversion() {
        let id = JobId::from(42);
        assert_eq!(id.to_string(), "42");
        assert_eq!(id.get(), 42);
    }

    #[test]
    fn test_log_event_constructors() {
        let event = LogEvent::success("Deleted part: data.7z.001");
        assert_eq!(event.severity, Severity::Success);
        assert_eq!(event.message, "Deleted part: data.7z.001");
    }

    #[test]
    fn test_severity_serde_lowercase() {
        let json = serde_json::to_string(&Severity::Success).unwrap();
        assert_eq!(json, "\"success\"");
        let back: Severity = serde_json::from_str("\"error\"").unwrap();
        assert_eq!(back, Severity::Error);
    }

    #[test]
    fn test_part_status_serde_kebab_case() {
        let json = serde_json::to_string(&PartStatus::QuiescentDeleted).unwrap();
        assert_eq!(json, "\"quiescent-deleted\"");
    }

    #[test]
    fn test_log_event_round_trip() {
        let event = LogEvent::info("7-Zip extraction started");
        let json = serde_json::to_string(&event).unwrap();
        let back: LogEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back.message, event.message);
        assert_eq!(back.severity, Severity::Info);
    }
}
