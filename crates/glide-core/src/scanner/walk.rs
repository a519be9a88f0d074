use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;
use walkdir::WalkDir;

/// Terminal result of one size walk. A cancelled walk carries no total;
/// a partial sum is not a size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkStatus {
    Completed { total_bytes: u64 },
    Cancelled,
}

/// One-shot recursive byte-count of a folder. Symbolic links are never
/// followed, so link cycles and cross-link double counting cannot occur.
/// Unreadable files contribute nothing; the walk still completes.
pub struct FolderSizeWalker {
    path: PathBuf,
    cancel: Arc<AtomicBool>,
}

impl FolderSizeWalker {
    pub fn new(path: PathBuf, cancel: Arc<AtomicBool>) -> Self {
        Self { path, cancel }
    }

    pub fn run(&self) -> WalkStatus {
        let mut total: u64 = 0;

        for entry in WalkDir::new(&self.path).follow_links(false) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    debug!(
                        "Skipping unreadable entry under {}: {}",
                        self.path.display(),
                        err
                    );
                    continue;
                }
            };

            if entry.file_type().is_dir() {
                // Directory boundary: the agreed cancellation point.
                if self.cancel.load(Ordering::SeqCst) {
                    return WalkStatus::Cancelled;
                }
                continue;
            }

            if entry.file_type().is_file() {
                match entry.metadata() {
                    Ok(metadata) => total = total.saturating_add(metadata.len()),
                    Err(err) => {
                        debug!(
                            "Could not stat {} during size walk: {}",
                            entry.path().display(),
                            err
                        );
                    }
                }
            }
        }

        if self.cancel.load(Ordering::SeqCst) {
            WalkStatus::Cancelled
        } else {
            WalkStatus::Completed { total_bytes: total }
        }
    }
}
