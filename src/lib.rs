//! # stream-extract
//!
//! Library for extracting multi-part archives while reclaiming the disk
//! space they occupy. Extraction is delegated to the external 7-Zip binary;
//! a concurrent monitor watches each part file and deletes it once its size
//! has held steady for a full polling interval, freeing storage during large
//! extractions without corrupting an in-progress read.
//!
//! ## Design Philosophy
//!
//! - **Library-first** - No CLI or UI; a consumer supplies a [`JobConfig`]
//!   and subscribes to log events
//! - **Event-driven** - Progress arrives as a stream of timestamped lines,
//!   no polling required by the consumer
//! - **Fail fast** - Configuration and tool availability are checked before
//!   any subprocess or background task starts
//! - **Independent outcomes** - The job verdict follows the extractor's exit
//!   code; part deletion is best-effort and never rolled back
//!
//! ## Quick Start
//!
//! ```no_run
//! use stream_extract::{ExtractionJob, JobConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = JobConfig {
//!         archive_path: "/downloads/season.7z.001".into(),
//!         output_dir: "/media/shows".into(),
//!         ..Default::default()
//!     };
//!
//!     let job = ExtractionJob::new(config);
//!
//!     // Subscribe to log events
//!     let mut events = job.subscribe();
//!     tokio::spawn(async move {
//!         while let Ok(event) = events.recv().await {
//!             println!("{}", event.message);
//!         }
//!     });
//!
//!     let outcome = job.run().await?;
//!     println!("success: {}", outcome.success);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Configuration types
pub mod config;
/// Extraction process driver
pub mod driver;
/// Error types
pub mod error;
/// Extraction job orchestration
pub mod job;
/// Part stability monitoring
pub mod monitor;
/// Multi-part archive set resolution
pub mod resolver;
/// Log event sink
pub mod sink;
/// External tool discovery
pub mod tool;
/// Core types and events
pub mod types;

// Re-export commonly used types
pub use config::JobConfig;
pub use error::{Error, Result};
pub use job::{ExtractionJob, JobOutcome};
pub use monitor::{MonitorReport, PartMonitor};
pub use resolver::{ArchivePart, ArchiveSet};
pub use sink::LogSink;
pub use tool::{SystemToolLocator, ToolLocator};
pub use types::{JobId, LogEvent, PartStatus, Severity};
