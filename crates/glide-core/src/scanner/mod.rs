pub mod list;
pub mod walk;

pub use list::{DirectoryEntry, DirectoryScanner, ScanOutcome};
pub use walk::{FolderSizeWalker, WalkStatus};
