//! Error types for stream-extract
//!
//! This module provides error handling for the library:
//! - Configuration errors surfaced before a job starts
//! - External tool discovery and execution failures
//! - I/O errors from filesystem operations

use thiserror::Error;

/// Result type alias for stream-extract operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for stream-extract
///
/// Each variant includes contextual information to help diagnose issues.
/// Errors produced before a job starts (configuration, tool discovery) are
/// distinct from errors produced while the extractor is running.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "archive_path")
        key: Option<String>,
    },

    /// External extraction tool could not be found in PATH
    #[error("extraction tool not found: {0}")]
    ToolNotFound(String),

    /// External tool execution failed (spawn failure, killed by signal, etc.)
    #[error("external tool error: {0}")]
    ExternalTool(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Convenience constructor for configuration errors
    pub fn config(message: impl Into<String>, key: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            key: Some(key.into()),
        }
    }
}
