//! Extraction process driver
//!
//! Thin I/O-forwarding wrapper around the external 7-Zip binary. The driver
//! spawns `7z x <archive> -o<output_dir>`, streams every line the process
//! produces to the log sink as it arrives, and reports the final exit code.
//! It never inspects or deletes part files; reclamation is the part
//! monitor's job.

use crate::error::{Error, Result};
use crate::sink::LogSink;
use crate::tool::{SEVENZIP_BINARY, ToolLocator};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tracing::{debug, warn};

/// Driver for the external 7-Zip extraction tool
///
/// # Examples
///
/// ```no_run
/// use stream_extract::driver::SevenZipDriver;
/// use stream_extract::sink::LogSink;
/// use stream_extract::tool::SystemToolLocator;
/// use std::path::Path;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let driver = SevenZipDriver::from_locator(&SystemToolLocator)
///     .expect("7z not found in PATH");
///
/// let sink = LogSink::new();
/// let code = driver
///     .extract(Path::new("data.7z.001"), Path::new("/tmp/out"), &sink)
///     .await?;
/// assert_eq!(code, 0);
/// # Ok(())
/// # }
/// ```
pub struct SevenZipDriver {
    binary_path: PathBuf,
}

impl SevenZipDriver {
    /// Create a driver with an explicit binary path
    pub fn new(binary_path: PathBuf) -> Self {
        Self { binary_path }
    }

    /// Create a driver by resolving `7z` through the given locator
    ///
    /// Returns `None` if the binary cannot be found — callers treat this as
    /// a precondition failure before any job starts.
    pub fn from_locator(locator: &dyn ToolLocator) -> Option<Self> {
        locator.locate(SEVENZIP_BINARY).map(Self::new)
    }

    /// Run `7z x <archive> -o<output_dir>` to completion, streaming output.
    ///
    /// Standard output and standard error are both forwarded line-by-line to
    /// the sink while the process runs, so progress is visible during long
    /// extractions rather than buffered until exit. Blocks until the process
    /// terminates and returns its exit code: 0 means success, anything else
    /// means failure.
    ///
    /// # Errors
    /// Returns `Error::ExternalTool` if the process cannot be spawned or was
    /// killed by a signal before producing an exit code.
    pub async fn extract(
        &self,
        archive_path: &Path,
        output_dir: &Path,
        sink: &LogSink,
    ) -> Result<i32> {
        // 7z's extract-to-directory flag has no space: -o/path/to/dir
        let mut output_flag = OsString::from("-o");
        output_flag.push(output_dir);

        debug!(
            binary = ?self.binary_path,
            archive = ?archive_path,
            output = ?output_dir,
            "spawning extraction process"
        );

        let mut child = Command::new(&self.binary_path)
            .arg("x")
            .arg(archive_path)
            .arg(output_flag)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| Error::ExternalTool(format!("failed to execute 7z: {e}")))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| Error::ExternalTool("7z stdout was not captured".to_string()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| Error::ExternalTool("7z stderr was not captured".to_string()))?;

        // Forward both streams concurrently; the sink merges them into one
        // ordered-per-stream sequence of whole lines.
        tokio::join!(
            forward_lines(stdout, sink.clone()),
            forward_lines(stderr, sink.clone()),
        );

        let status = child
            .wait()
            .await
            .map_err(|e| Error::ExternalTool(format!("failed to wait for 7z: {e}")))?;

        status
            .code()
            .ok_or_else(|| Error::ExternalTool("7z terminated by signal".to_string()))
    }
}

/// Forward lines from a child process stream to the sink as they arrive.
///
/// Non-UTF-8 bytes are forwarded lossily; the stream is progress output for
/// humans, not data.
async fn forward_lines<R>(stream: R, sink: LogSink)
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(stream);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf);
                sink.info(line.trim_end_matches(['\r', '\n']));
            }
            Err(e) => {
                warn!(error = %e, "failed to read extraction process output");
                break;
            }
        }
    }
}
