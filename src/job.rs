//! Extraction job orchestration
//!
//! Wires the resolver, driver, and part monitor together for one job:
//! validate configuration and tool availability up front, resolve the
//! archive set, start the monitor as an independent task, run the extractor
//! to completion on the calling task, then give the monitor a bounded grace
//! period to finish. The job's final verdict comes from the extractor's exit
//! code alone — the monitor can neither fail nor rescue a job.

use crate::config::JobConfig;
use crate::driver::SevenZipDriver;
use crate::error::{Error, Result};
use crate::monitor::{MonitorReport, PartMonitor};
use crate::resolver::ArchiveSet;
use crate::sink::LogSink;
use crate::tool::{SEVENZIP_BINARY, SystemToolLocator, ToolLocator};
use crate::types::{JobId, LogEvent};
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

static NEXT_JOB_ID: AtomicI64 = AtomicI64::new(1);

/// Final result of a completed extraction job
#[derive(Clone, Debug)]
pub struct JobOutcome {
    /// Whether the extractor exited with code 0
    pub success: bool,
    /// The extractor's exit code
    pub exit_code: i32,
    /// Monitor summary, or `None` if the grace timeout abandoned the monitor
    /// (or its task panicked); remaining parts are simply left undeleted
    pub monitor: Option<MonitorReport>,
}

/// One extraction job: configuration plus the log channel consumers watch.
///
/// # Examples
///
/// ```no_run
/// use stream_extract::{ExtractionJob, JobConfig};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = JobConfig {
///     archive_path: "/data/movie.7z.001".into(),
///     output_dir: "/data/extracted".into(),
///     ..Default::default()
/// };
///
/// let job = ExtractionJob::new(config);
/// let mut events = job.subscribe();
/// tokio::spawn(async move {
///     while let Ok(event) = events.recv().await {
///         println!("[{:?}] {}", event.severity, event.message);
///     }
/// });
///
/// let outcome = job.run().await?;
/// assert!(outcome.success);
/// # Ok(())
/// # }
/// ```
pub struct ExtractionJob {
    id: JobId,
    config: JobConfig,
    sink: LogSink,
    locator: Arc<dyn ToolLocator>,
}

impl ExtractionJob {
    /// Create a job that discovers `7z` from the system PATH
    pub fn new(config: JobConfig) -> Self {
        Self::with_locator(config, Arc::new(SystemToolLocator))
    }

    /// Create a job with a custom tool locator (injectable for testing)
    pub fn with_locator(config: JobConfig, locator: Arc<dyn ToolLocator>) -> Self {
        Self {
            id: JobId(NEXT_JOB_ID.fetch_add(1, Ordering::Relaxed)),
            config,
            sink: LogSink::new(),
            locator,
        }
    }

    /// This job's identifier
    pub fn id(&self) -> JobId {
        self.id
    }

    /// Subscribe to the job's log events
    pub fn subscribe(&self) -> broadcast::Receiver<LogEvent> {
        self.sink.subscribe()
    }

    /// Run the job to completion.
    ///
    /// Fails fast with `Error::Config` or `Error::ToolNotFound` before any
    /// subprocess or background task starts. After that, the returned
    /// outcome reflects the extractor's exit code; part deletion and
    /// extraction success are independent by design, so already-deleted
    /// parts are never restored on failure.
    pub async fn run(self) -> Result<JobOutcome> {
        self.config.validate()?;

        let driver = match &self.config.tool_path {
            Some(path) => {
                // An explicit path gets the same precondition treatment as
                // PATH discovery: a dangling path must fail here, before the
                // monitor starts deleting parts behind an extraction that
                // never ran.
                if !path.is_file() {
                    return Err(Error::ToolNotFound(path.display().to_string()));
                }
                SevenZipDriver::new(path.clone())
            }
            None => SevenZipDriver::from_locator(&*self.locator)
                .ok_or_else(|| Error::ToolNotFound(SEVENZIP_BINARY.to_string()))?,
        };

        tokio::fs::create_dir_all(&self.config.output_dir)
            .await
            .map_err(|e| {
                Error::config(
                    format!(
                        "cannot create output directory {}: {e}",
                        self.config.output_dir.display()
                    ),
                    "output_dir",
                )
            })?;

        let set = ArchiveSet::resolve(&self.config.archive_path).await?;
        info!(
            job_id = self.id.0,
            base_name = %set.base_name,
            parts = set.parts.len(),
            "archive set resolved"
        );
        self.sink.info(format!(
            "Extracting {}",
            self.config
                .archive_path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| self.config.archive_path.display().to_string())
        ));

        // The monitor runs as an independent task; the only thing it shares
        // with the driver is the log sink.
        let monitor_handle = if set.parts.is_empty() {
            debug!(job_id = self.id.0, "no sibling parts found, skipping monitor");
            None
        } else {
            let monitor = PartMonitor::new(
                self.id,
                set.parts,
                self.config.delete_parts,
                self.config.poll_interval,
                self.sink.clone(),
            );
            Some(tokio::spawn(monitor.run()))
        };

        let exit_code = match driver
            .extract(&self.config.archive_path, &self.config.output_dir, &self.sink)
            .await
        {
            Ok(code) => code,
            Err(e) => {
                // The extractor never produced an exit status (spawn failure
                // or killed by signal). Stop the monitor rather than letting
                // it reclaim parts behind an extraction that did not run.
                if let Some(handle) = monitor_handle {
                    handle.abort();
                }
                return Err(e);
            }
        };

        let monitor = match monitor_handle {
            None => Some(MonitorReport::default()),
            Some(handle) => {
                match tokio::time::timeout(self.config.monitor_grace, handle).await {
                    Ok(Ok(report)) => Some(report),
                    Ok(Err(e)) => {
                        warn!(job_id = self.id.0, error = %e, "part monitor task panicked");
                        None
                    }
                    Err(_) => {
                        // Dropping the join handle detaches the task: the
                        // monitor keeps polling on its own while the job is
                        // reported complete.
                        info!(
                            job_id = self.id.0,
                            grace_secs = self.config.monitor_grace.as_secs_f64(),
                            "part monitor still busy after grace period, leaving it detached"
                        );
                        None
                    }
                }
            }
        };

        let success = exit_code == 0;
        if success {
            info!(job_id = self.id.0, "extraction complete");
            self.sink.success("Extraction complete");
        } else {
            warn!(job_id = self.id.0, exit_code, "extraction failed");
            self.sink
                .error(format!("Extraction failed with exit code {exit_code}"));
        }

        Ok(JobOutcome {
            success,
            exit_code,
            monitor,
        })
    }
}
