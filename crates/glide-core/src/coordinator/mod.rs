mod events;
mod scan;
mod size;

pub use events::{RowToken, ScanListener, SizeListener};
pub use scan::ScanCoordinator;
pub use size::{ResolveOutcome, SizeComputeCoordinator};
