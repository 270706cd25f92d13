//! Configuration types for stream-extract

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for one extraction job
///
/// The consumer (typically a UI layer) fills in the archive path and output
/// directory; everything else has sensible defaults matching the behavior of
/// a plain `7z x` invocation with background part reclamation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct JobConfig {
    /// Path to one part of the archive (any part of a multi-part set)
    pub archive_path: PathBuf,

    /// Directory the archive is extracted into (created if missing)
    pub output_dir: PathBuf,

    /// Delete part files once they go quiescent (default: true)
    ///
    /// When disabled the monitor still runs and drains its pending set, but
    /// never removes anything — useful for dry runs.
    #[serde(default = "default_true")]
    pub delete_parts: bool,

    /// How often the monitor polls part sizes (default: 3s)
    ///
    /// A part is only deleted after its size held steady for one full
    /// interval, so this is also the minimum reclamation latency per part.
    #[serde(default = "default_poll_interval", with = "duration_serde")]
    pub poll_interval: Duration,

    /// How long the job waits for the monitor after extraction finishes
    /// (default: 15s)
    ///
    /// If the monitor is still busy when this elapses, it is left running
    /// detached and the job completes on the extractor's exit status alone.
    #[serde(default = "default_monitor_grace", with = "duration_serde")]
    pub monitor_grace: Duration,

    /// Path to the 7z executable (auto-detected from PATH if None)
    #[serde(default)]
    pub tool_path: Option<PathBuf>,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            archive_path: PathBuf::new(),
            output_dir: PathBuf::new(),
            delete_parts: true,
            poll_interval: default_poll_interval(),
            monitor_grace: default_monitor_grace(),
            tool_path: None,
        }
    }
}

impl JobConfig {
    /// Validate the configuration before a job starts
    ///
    /// # Errors
    /// Returns `Error::Config` if the archive path or output directory is
    /// missing, or the archive file does not exist.
    pub fn validate(&self) -> Result<()> {
        if self.archive_path.as_os_str().is_empty() {
            return Err(Error::config("archive path is empty", "archive_path"));
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(Error::config("output directory is empty", "output_dir"));
        }
        if !self.archive_path.is_file() {
            return Err(Error::config(
                format!("archive not found: {}", self.archive_path.display()),
                "archive_path",
            ));
        }
        if self.poll_interval.is_zero() {
            return Err(Error::config(
                "poll interval must be greater than zero",
                "poll_interval",
            ));
        }
        Ok(())
    }
}

fn default_true() -> bool {
    true
}

fn default_poll_interval() -> Duration {
    Duration::from_secs(3)
}

fn default_monitor_grace() -> Duration {
    Duration::from_secs(15)
}

// Duration serialization helper
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = JobConfig::default();
        assert!(config.delete_parts);
        assert_eq!(config.poll_interval, Duration::from_secs(3));
        assert_eq!(config.monitor_grace, Duration::from_secs(15));
        assert!(config.tool_path.is_none());
    }

    #[test]
    fn test_validate_rejects_empty_paths() {
        let config = JobConfig::default();
        let err = config.validate().unwrap_err();
        match err {
            Error::Config { key, .. } => assert_eq!(key.as_deref(), Some("archive_path")),
            other => panic!("expected Config error, got {other:?}"),
        }

        let config = JobConfig {
            archive_path: PathBuf::from("/tmp/a.7z.001"),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        match err {
            Error::Config { key, .. } => assert_eq!(key.as_deref(), Some("output_dir")),
            other => panic!("expected Config error, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_rejects_missing_archive() {
        let config = JobConfig {
            archive_path: PathBuf::from("/nonexistent/archive.7z.001"),
            output_dir: PathBuf::from("/tmp"),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("archive not found"));
    }

    #[test]
    fn test_validate_accepts_real_archive() {
        let temp = tempfile::TempDir::new().unwrap();
        let archive = temp.path().join("data.zip");
        std::fs::write(&archive, b"PK").unwrap();

        let config = JobConfig {
            archive_path: archive,
            output_dir: temp.path().join("out"),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_serde_defaults_applied() {
        let json = r#"{"archive_path": "/a/x.7z.001", "output_dir": "/b"}"#;
        let config: JobConfig = serde_json::from_str(json).unwrap();
        assert!(config.delete_parts);
        assert_eq!(config.poll_interval, Duration::from_secs(3));
    }

    #[test]
    fn test_duration_serialized_as_seconds() {
        let config = JobConfig {
            archive_path: PathBuf::from("/a/x.zip"),
            output_dir: PathBuf::from("/b"),
            poll_interval: Duration::from_secs(5),
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"poll_interval\":5"));
    }
}
