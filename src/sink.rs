//! Broadcast-channel log sink shared by the driver and the part monitor.
//!
//! Both producers run concurrently during a job and must never corrupt each
//! other's output. Routing every line through a broadcast channel gives that
//! guarantee for free: each [`LogEvent`] is sent as one message, so consumers
//! see whole lines in each producer's emission order, with no mid-line
//! interleaving. A sink with no subscribers silently drops events; listening
//! is optional.

use crate::types::LogEvent;
use tokio::sync::broadcast;

/// Default channel capacity; slow consumers past this lag and lose old lines
const DEFAULT_CAPACITY: usize = 1024;

/// Thread-safe log sink fed by a broadcast channel.
///
/// Cloning is cheap and clones share the same channel, so the orchestrator
/// hands one clone to the driver and one to the monitor.
#[derive(Clone)]
pub struct LogSink {
    tx: broadcast::Sender<LogEvent>,
}

impl LogSink {
    /// Create a sink with the default channel capacity
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create a sink with an explicit channel capacity
    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Subscribe to log events
    ///
    /// Only events sent after the subscription are received.
    pub fn subscribe(&self) -> broadcast::Receiver<LogEvent> {
        self.tx.subscribe()
    }

    /// Emit an informational line
    pub fn info(&self, message: impl Into<String>) {
        self.send(LogEvent::info(message));
    }

    /// Emit a success line
    pub fn success(&self, message: impl Into<String>) {
        self.send(LogEvent::success(message));
    }

    /// Emit an error line
    pub fn error(&self, message: impl Into<String>) {
        self.send(LogEvent::error(message));
    }

    fn send(&self, event: LogEvent) {
        // No receivers is fine; events are only for whoever is listening
        self.tx.send(event).ok();
    }
}

impl Default for LogSink {
    fn default() -> Self {
        Self::new()
    }
}
