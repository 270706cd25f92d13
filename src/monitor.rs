//! Part stability monitor
//!
//! Runs alongside the extraction process and reclaims disk space behind it:
//! each part file is polled at a fixed interval, and once its size has held
//! steady for one full interval the part is considered quiescent and deleted
//! (when deletion is enabled). Polling is deliberate — the external tool
//! gives no portable "done reading this part" signal, so a quiet interval is
//! the closest safe proxy. A part still being produced (copied or downloaded
//! concurrently) keeps changing size and simply stays pending.
//!
//! The monitor owns its pending set exclusively and has no external
//! cancellation; the loop ends when the pending set drains. The orchestrator
//! bounds how long it *waits* for that via a join timeout, which may leave
//! the monitor running detached.

use crate::resolver::ArchivePart;
use crate::sink::LogSink;
use crate::types::{JobId, PartStatus};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;
use tokio::fs;
use tracing::{debug, info, warn};

/// Summary of a completed monitor run
#[derive(Clone, Debug, Default)]
pub struct MonitorReport {
    /// Parts deleted after going quiescent
    pub deleted: Vec<PathBuf>,
    /// Parts that disappeared between polls (consumed by the extractor)
    pub vanished: Vec<PathBuf>,
    /// Quiescent parts left in place because deletion was disabled
    pub kept: Vec<PathBuf>,
}

/// Watches a set of part files and deletes each one once it goes quiescent
pub struct PartMonitor {
    job_id: JobId,
    parts: Vec<ArchivePart>,
    delete_parts: bool,
    poll_interval: Duration,
    sink: LogSink,
}

impl PartMonitor {
    /// Create a monitor over the given parts.
    ///
    /// `delete_parts` is captured here as immutable configuration for the
    /// whole run; there is no way to toggle it mid-job.
    pub fn new(
        job_id: JobId,
        parts: Vec<ArchivePart>,
        delete_parts: bool,
        poll_interval: Duration,
        sink: LogSink,
    ) -> Self {
        Self {
            job_id,
            parts,
            delete_parts,
            poll_interval,
            sink,
        }
    }

    /// Run the poll loop until every part has left the pending set.
    ///
    /// Each part transitions exactly once, from pending to deleted, vanished,
    /// or kept (monitoring-only mode). The last-seen size map is seeded from
    /// the sizes recorded at resolution, so a part that never changes after
    /// job start is reclaimed on the very first poll: the minimum
    /// reclamation latency is one full interval, not two. A part whose size
    /// did change since resolution needs one further quiet interval.
    pub async fn run(mut self) -> MonitorReport {
        let mut last_seen: HashMap<PathBuf, u64> = self
            .parts
            .iter()
            .map(|p| (p.path.clone(), p.initial_size))
            .collect();
        let mut report = MonitorReport::default();

        info!(
            job_id = self.job_id.0,
            parts = self.parts.len(),
            interval_secs = self.poll_interval.as_secs_f64(),
            delete_parts = self.delete_parts,
            "part monitor started"
        );

        let mut interval = tokio::time::interval(self.poll_interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        // The first tick completes immediately; consume it so every scan
        // happens a full interval after the previous one.
        interval.tick().await;

        while !self.parts.is_empty() {
            interval.tick().await;

            let pending = std::mem::take(&mut self.parts);
            let mut still_pending = Vec::new();
            for mut part in pending {
                match fs::metadata(&part.path).await {
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                        // The extractor (or someone else) already removed it.
                        // Not an error, and not reported as a deletion.
                        debug!(
                            job_id = self.job_id.0,
                            path = ?part.path,
                            "part vanished between polls"
                        );
                        part.status = PartStatus::Vanished;
                        self.sink
                            .info(format!("Part already removed: {}", part.file_name()));
                        report.vanished.push(part.path);
                    }
                    Err(e) => {
                        // Transient stat failure; keep the part pending and
                        // try again next interval.
                        warn!(
                            job_id = self.job_id.0,
                            path = ?part.path,
                            error = %e,
                            "failed to stat part, will retry"
                        );
                        still_pending.push(part);
                    }
                    Ok(meta) => {
                        let size = meta.len();
                        if last_seen.get(&part.path) == Some(&size) {
                            self.reclaim_quiescent(part, &mut report, &mut still_pending)
                                .await;
                        } else {
                            last_seen.insert(part.path.clone(), size);
                            still_pending.push(part);
                        }
                    }
                }
            }
            self.parts = still_pending;
        }

        info!(
            job_id = self.job_id.0,
            deleted = report.deleted.len(),
            vanished = report.vanished.len(),
            kept = report.kept.len(),
            "part monitor finished"
        );
        report
    }

    /// Handle a part whose size held steady for one full interval.
    async fn reclaim_quiescent(
        &self,
        mut part: ArchivePart,
        report: &mut MonitorReport,
        still_pending: &mut Vec<ArchivePart>,
    ) {
        if !self.delete_parts {
            debug!(
                job_id = self.job_id.0,
                path = ?part.path,
                "part quiescent, deletion disabled"
            );
            report.kept.push(part.path);
            return;
        }

        match fs::remove_file(&part.path).await {
            Ok(()) => {
                info!(job_id = self.job_id.0, path = ?part.path, "deleted quiescent part");
                part.status = PartStatus::QuiescentDeleted;
                self.sink
                    .success(format!("Deleted part: {}", part.file_name()));
                report.deleted.push(part.path);
            }
            Err(e) => {
                // Non-fatal: leave the file in place and keep the part
                // pending so the delete is retried on a later tick. The
                // orchestrator's grace timeout caps how long the job waits.
                warn!(
                    job_id = self.job_id.0,
                    path = ?part.path,
                    error = %e,
                    "failed to delete quiescent part, will retry"
                );
                self.sink
                    .error(format!("Failed to delete {}: {e}", part.file_name()));
                still_pending.push(part);
            }
        }
    }
}
