//! Multi-part archive set resolution
//!
//! Given one selected part file, derives the logical base name and enumerates
//! every sibling file belonging to the same multi-part set. The resolved set
//! is immutable; the part monitor takes ownership of it for the duration of a
//! job.

use crate::error::Result;
use crate::types::PartStatus;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Suffixes stripped to obtain the base name, tried longest/most specific
/// first so `x.7z.001` yields `x` rather than `x.7z`.
const BASE_NAME_SUFFIXES: [&str; 7] = [
    ".7z.001", ".7z.002", ".001", ".zip", ".z01", ".rar", ".r00",
];

/// Filename endings that mark a directory entry as belonging to a
/// multi-part set
const PART_EXTENSIONS: [&str; 11] = [
    ".zip", ".z01", ".z02", ".7z.001", ".7z.002", ".7z.003", ".rar", ".r00", ".r01", ".001",
    ".002",
];

/// One file segment of a multi-part archive
#[derive(Clone, Debug)]
pub struct ArchivePart {
    /// Absolute path to the part file
    pub path: PathBuf,
    /// Size recorded when the set was resolved, before extraction started
    pub initial_size: u64,
    /// Current lifecycle state
    pub status: PartStatus,
}

impl ArchivePart {
    /// Filename of the part, for log lines
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// A resolved multi-part archive set, immutable once built
#[derive(Clone, Debug)]
pub struct ArchiveSet {
    /// Common filename prefix shared by all parts
    pub base_name: String,
    /// Parts in lexicographic filename order
    pub parts: Vec<ArchivePart>,
}

impl ArchiveSet {
    /// Resolve the set of sibling parts for the given archive path.
    ///
    /// Lists the containing directory and keeps entries whose name starts
    /// with the base name and ends with a recognized part extension, sorted
    /// lexicographically. Zero-padded numeric suffixes (`.001`, `.002`) sort
    /// correctly; non-zero-padded or mixed-width numbering does not — a known
    /// limitation of this scheme.
    ///
    /// An empty set is a valid result (single-file archive, or a naming
    /// scheme we do not recognize): the job simply has nothing to monitor.
    ///
    /// # Errors
    /// Returns an I/O error if the containing directory cannot be listed.
    pub async fn resolve(archive_path: &Path) -> Result<Self> {
        let file_name = archive_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let base = base_name(&file_name);

        let Some(dir) = archive_path.parent().filter(|p| !p.as_os_str().is_empty()) else {
            return Ok(Self {
                base_name: base,
                parts: Vec::new(),
            });
        };

        let mut names: Vec<String> = Vec::new();
        let mut entries = fs::read_dir(dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with(&base) && PART_EXTENSIONS.iter().any(|ext| name.ends_with(ext)) {
                names.push(name);
            }
        }
        names.sort();

        let mut parts = Vec::with_capacity(names.len());
        for name in names {
            let path = dir.join(&name);
            match fs::metadata(&path).await {
                Ok(meta) => parts.push(ArchivePart {
                    path,
                    initial_size: meta.len(),
                    status: PartStatus::Pending,
                }),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    debug!(?path, "part disappeared between listing and stat, skipping");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Ok(Self {
            base_name: base,
            parts,
        })
    }
}

/// Strip a known multi-part suffix to obtain the base name, falling back to
/// generic extension stripping when none matches.
pub fn base_name(file_name: &str) -> String {
    for suffix in BASE_NAME_SUFFIXES {
        if let Some(stripped) = file_name.strip_suffix(suffix) {
            return stripped.to_string();
        }
    }
    Path::new(file_name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_name.to_string())
}
