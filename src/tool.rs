//! External tool discovery
//!
//! The orchestrator checks that the extraction binary is resolvable before a
//! job starts. Discovery sits behind the [`ToolLocator`] trait so tests can
//! substitute a fake locator instead of requiring a real `7z` install.

use std::path::PathBuf;

/// Name of the 7-Zip binary searched for in PATH
pub const SEVENZIP_BINARY: &str = "7z";

/// Locates external binaries by name
pub trait ToolLocator: Send + Sync {
    /// Resolve a binary name to an executable path, or `None` if unavailable
    fn locate(&self, binary: &str) -> Option<PathBuf>;
}

/// Locator backed by the process environment's executable search path
///
/// Uses the `which` crate to search PATH, the same way a shell would.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemToolLocator;

impl ToolLocator for SystemToolLocator {
    fn locate(&self, binary: &str) -> Option<PathBuf> {
        which::which(binary).ok()
    }
}
