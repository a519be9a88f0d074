use crate::coordinator::events::{RowToken, SizeListener};
use crate::error::Error;
use crate::fmt::format_size;
use crate::scanner::list::modified_epoch_secs;
use crate::scanner::{FolderSizeWalker, WalkStatus};
use crate::storage::SizeCache;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, warn};

/// What `resolve_size` did with a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveOutcome {
    /// A valid cache record was served synchronously.
    CachedHit,
    /// A walker was started for the path.
    Spawned,
    /// The path is already being computed; the request was dropped.
    AlreadyInFlight,
    /// The path is not a readable and writable folder; an error was
    /// reported instead of starting a walker.
    Rejected,
}

struct WalkerHandle {
    token: RowToken,
    cancel: Arc<AtomicBool>,
    join: Option<JoinHandle<()>>,
}

impl WalkerHandle {
    fn reap(&mut self) {
        if let Some(join) = self.join.take() {
            let _ = join.join();
        }
    }
}

struct WalkMessage {
    path: PathBuf,
    status: WalkStatus,
}

/// Owns the set of concurrent folder-size walkers, at most one per path.
/// Consults the persistent cache before spawning work; walkers write
/// their totals back to the cache from their own threads (the cache
/// serializes internally, and upserts make late writes harmless), while
/// listener delivery happens only from `pump` on the owning context.
pub struct SizeComputeCoordinator {
    cache: Arc<SizeCache>,
    listener: Arc<dyn SizeListener>,
    tx: Sender<WalkMessage>,
    rx: Receiver<WalkMessage>,
    in_flight: HashMap<PathBuf, WalkerHandle>,
    /// Cancelled walkers awaiting their natural exit; joined from `pump`.
    retired: Vec<WalkerHandle>,
}

impl SizeComputeCoordinator {
    pub fn new(cache: Arc<SizeCache>, listener: Arc<dyn SizeListener>) -> Self {
        let (tx, rx) = channel();
        Self {
            cache,
            listener,
            tx,
            rx,
            in_flight: HashMap::new(),
            retired: Vec::new(),
        }
    }

    /// Resolve a folder's size. Serves a valid cache record synchronously
    /// through the listener; otherwise spawns a walker. A request for a
    /// path already in flight is dropped; only the first requester's
    /// token ever receives the result.
    pub fn resolve_size(&mut self, path: &Path, token: RowToken) -> Result<ResolveOutcome, Error> {
        if self.in_flight.contains_key(path) {
            debug!("Size walk already in flight for {}, dropping request", path.display());
            return Ok(ResolveOutcome::AlreadyInFlight);
        }

        let current_mtime = fs::metadata(path).ok().map(|m| modified_epoch_secs(&m));

        // Cache consult. A record is valid only while the stored mtime
        // still equals the folder's current mtime; read failures count as
        // misses and never surface.
        match self.cache.get(path) {
            Ok(Some((size_bytes, stored_mtime))) => {
                if current_mtime == Some(stored_mtime) {
                    self.listener
                        .on_size_ready(token, &format_size(size_bytes), size_bytes);
                    return Ok(ResolveOutcome::CachedHit);
                }
                debug!(
                    "Stale cache record for {} (stored mtime {}, current {:?})",
                    path.display(),
                    stored_mtime,
                    current_mtime
                );
            }
            Ok(None) => {}
            Err(err) => warn!("Size cache read failed for {}: {}", path.display(), err),
        }

        if let Err(message) = check_walkable(path) {
            self.listener.on_size_error(token, &message);
            return Ok(ResolveOutcome::Rejected);
        }

        let cancel = Arc::new(AtomicBool::new(false));
        let walker = FolderSizeWalker::new(path.to_path_buf(), cancel.clone());
        let cache = self.cache.clone();
        let tx = self.tx.clone();
        let walk_path = path.to_path_buf();
        let join = thread::Builder::new()
            .name("glide-size".to_string())
            .spawn(move || {
                let status = walker.run();
                if let WalkStatus::Completed { total_bytes } = status {
                    // Persist against the mtime the total was computed at.
                    match fs::metadata(&walk_path).map(|m| modified_epoch_secs(&m)) {
                        Ok(mtime) => {
                            if let Err(err) = cache.put(&walk_path, total_bytes, mtime) {
                                warn!(
                                    "Size cache write failed for {}: {}",
                                    walk_path.display(),
                                    err
                                );
                            }
                        }
                        Err(err) => warn!(
                            "Skipping cache write for {}: cannot stat: {}",
                            walk_path.display(),
                            err
                        ),
                    }
                }
                let _ = tx.send(WalkMessage {
                    path: walk_path,
                    status,
                });
            })?;

        self.in_flight.insert(
            path.to_path_buf(),
            WalkerHandle {
                token,
                cancel,
                join: Some(join),
            },
        );
        Ok(ResolveOutcome::Spawned)
    }

    /// Drain walker completions and deliver still-wanted results to the
    /// listener. Call from the owning (UI) context. Results for paths no
    /// longer tracked (re-navigated away, cancelled) are dropped.
    pub fn pump(&mut self) {
        self.reap_retired();

        while let Ok(message) = self.rx.try_recv() {
            let mut handle = match self.in_flight.remove(&message.path) {
                Some(handle) => handle,
                None => {
                    debug!(
                        "Dropping size result for no-longer-wanted path {}",
                        message.path.display()
                    );
                    continue;
                }
            };
            handle.reap();

            match message.status {
                WalkStatus::Completed { total_bytes } => {
                    self.listener
                        .on_size_ready(handle.token, &format_size(total_bytes), total_bytes);
                }
                WalkStatus::Cancelled => {}
            }
        }
    }

    /// Signal every in-flight walker to stop and forget them, without
    /// waiting. A walker that already finished naturally may still write
    /// the cache, but its result will never reach the listener.
    pub fn cancel_all(&mut self) {
        for (path, handle) in self.in_flight.drain() {
            debug!("Cancelling size walk for {}", path.display());
            handle.cancel.store(true, Ordering::SeqCst);
            if handle.join.is_some() {
                self.retired.push(handle);
            }
        }
    }

    /// Cancel everything and join every walker thread. Walkers stop at
    /// the next directory boundary, so this returns promptly. Idempotent.
    pub fn shutdown(&mut self) {
        self.cancel_all();
        for handle in &mut self.retired {
            handle.reap();
        }
        self.retired.clear();
        while self.rx.try_recv().is_ok() {}
    }

    pub fn in_flight_count(&self) -> usize {
        self.in_flight.len()
    }

    fn reap_retired(&mut self) {
        for handle in &mut self.retired {
            let finished = handle.join.as_ref().map(|j| j.is_finished()).unwrap_or(true);
            if finished {
                handle.reap();
            }
        }
        self.retired.retain(|handle| handle.join.is_some());
    }
}

impl Drop for SizeComputeCoordinator {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// The walker preflight: the root must be a folder we can both read and
/// write. Failing any leg reports a permission-style error instead of
/// starting a walker.
fn check_walkable(path: &Path) -> Result<(), String> {
    let metadata = match fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(err) => return Err(format!("cannot stat {}: {}", path.display(), err)),
    };
    if !metadata.is_dir() {
        return Err(format!("not a folder: {}", path.display()));
    }
    if fs::read_dir(path).is_err() {
        return Err(format!("no read permission: {}", path.display()));
    }
    if metadata.permissions().readonly() {
        return Err(format!("no write permission: {}", path.display()));
    }
    Ok(())
}
