use crate::platform;
use std::fs::{self, Metadata};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::UNIX_EPOCH;
use tracing::debug;

/// One visible child of a scanned directory. Immutable once emitted;
/// enumeration order, consumers sort as they see fit.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectoryEntry {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
    /// File size in bytes; 0 for directories until a size is resolved.
    pub size_bytes: u64,
    /// Modification time, epoch seconds. 0 when unknown.
    pub modified: i64,
}

/// Terminal result of one scan. `Cancelled` and `Failed` both mean "no new
/// data" to the coordinator, but only `Failed` reaches the error surface.
#[derive(Debug)]
pub enum ScanOutcome {
    Completed(Vec<DirectoryEntry>),
    Cancelled,
    Failed { path: PathBuf, message: String },
}

/// One-shot, non-recursive enumeration of a single directory. Runs to
/// exactly one terminal outcome and is never reused for another path.
pub struct DirectoryScanner {
    path: PathBuf,
    show_hidden: bool,
    cancel: Arc<AtomicBool>,
}

impl DirectoryScanner {
    pub fn new(path: PathBuf, show_hidden: bool, cancel: Arc<AtomicBool>) -> Self {
        Self {
            path,
            show_hidden,
            cancel,
        }
    }

    pub fn run(&self) -> ScanOutcome {
        let reader = match fs::read_dir(&self.path) {
            Ok(reader) => reader,
            Err(err) => {
                return ScanOutcome::Failed {
                    path: self.path.clone(),
                    message: err.to_string(),
                }
            }
        };

        let mut entries = Vec::new();
        for child in reader {
            if self.cancel.load(Ordering::SeqCst) {
                return ScanOutcome::Cancelled;
            }

            let child = match child {
                Ok(child) => child,
                Err(err) => {
                    return ScanOutcome::Failed {
                        path: self.path.clone(),
                        message: err.to_string(),
                    }
                }
            };

            // Entry vanished or became unreadable mid-scan: drop just it.
            let metadata = match child.metadata() {
                Ok(metadata) => metadata,
                Err(err) => {
                    debug!(
                        "Skipping unreadable entry {}: {}",
                        child.path().display(),
                        err
                    );
                    continue;
                }
            };

            let name = child.file_name().to_string_lossy().into_owned();
            if !self.show_hidden && platform::is_hidden(&name, &metadata) {
                continue;
            }

            let is_dir = metadata.is_dir();
            entries.push(DirectoryEntry {
                name,
                path: child.path(),
                is_dir,
                size_bytes: if is_dir { 0 } else { metadata.len() },
                modified: modified_epoch_secs(&metadata),
            });
        }

        if self.cancel.load(Ordering::SeqCst) {
            ScanOutcome::Cancelled
        } else {
            ScanOutcome::Completed(entries)
        }
    }
}

pub(crate) fn modified_epoch_secs(metadata: &Metadata) -> i64 {
    metadata
        .modified()
        .ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
