pub mod config;
pub mod coordinator;
pub mod error;
pub mod fmt;
pub mod platform;
pub mod scanner;
pub mod storage;

pub use config::AppConfig;
pub use coordinator::{
    ResolveOutcome, RowToken, ScanCoordinator, ScanListener, SizeComputeCoordinator, SizeListener,
};
pub use error::Error;
pub use fmt::format_size;
pub use scanner::{DirectoryEntry, DirectoryScanner, FolderSizeWalker, ScanOutcome, WalkStatus};
pub use storage::SizeCache;
