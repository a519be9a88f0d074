use crate::scanner::DirectoryEntry;
use std::path::Path;

/// Opaque correlation token: lets an async size result find its way back
/// to the UI row that asked for it, across scan generations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RowToken(pub u64);

/// Presentation-layer sink for directory listings.
///
/// Invoked only from `ScanCoordinator::pump`, i.e. on whichever context
/// the presentation layer pumps from. All methods default to no-ops.
pub trait ScanListener: Send + Sync {
    fn on_entries_ready(&self, _entries: Vec<DirectoryEntry>) {}
    fn on_scan_error(&self, _path: &Path, _message: &str) {}
}

/// Presentation-layer sink for folder-size results. Cache hits and walker
/// completions arrive through the same methods, so consumers have one
/// uniform handling path.
pub trait SizeListener: Send + Sync {
    fn on_size_ready(&self, _token: RowToken, _formatted: &str, _bytes: u64) {}
    fn on_size_error(&self, _token: RowToken, _message: &str) {}
}
