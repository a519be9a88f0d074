use super::sqlite::Database;
use crate::error::Error;
use std::fs;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

/// Persistent folder-size cache, shared between the UI context and any
/// number of size walkers. The single mutex serializes every access to
/// the storage handle; this is a low-throughput store and does not need
/// anything finer.
pub struct SizeCache {
    inner: Mutex<Option<Database>>,
}

impl SizeCache {
    /// Open (creating if needed) the on-disk cache. Parent directories
    /// are created so a fresh install works out of the box.
    pub fn open(path: &str) -> Result<Self, Error> {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let db = Database::open(path)?;
        debug!("Size cache opened at '{}'", path);
        Ok(Self {
            inner: Mutex::new(Some(db)),
        })
    }

    /// In-memory cache, for tests.
    pub fn in_memory() -> Result<Self, Error> {
        let db = Database::open_in_memory()?;
        Ok(Self {
            inner: Mutex::new(Some(db)),
        })
    }

    /// Last known `(size_bytes, last_modified)` for a folder, if any.
    pub fn get(&self, path: &Path) -> Result<Option<(u64, i64)>, Error> {
        let guard = self.lock()?;
        let db = Self::require_open(&guard)?;
        let record = db.get_folder_size(&path.to_string_lossy())?;
        Ok(record.map(|(size, mtime)| (size as u64, mtime)))
    }

    /// Idempotent upsert. Safe to call from walker completion paths while
    /// other reads and writes are in flight.
    pub fn put(&self, path: &Path, size_bytes: u64, last_modified: i64) -> Result<(), Error> {
        let guard = self.lock()?;
        let db = Self::require_open(&guard)?;
        db.upsert_folder_size(&path.to_string_lossy(), size_bytes as i64, last_modified)?;
        Ok(())
    }

    /// Release the storage handle. The first call closes; later calls are
    /// no-ops. Reads and writes after close report a cache error.
    pub fn close(&self) {
        if let Ok(mut guard) = self.inner.lock() {
            if guard.take().is_some() {
                debug!("Size cache closed");
            }
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Option<Database>>, Error> {
        self.inner
            .lock()
            .map_err(|_| Error::Cache("size cache lock poisoned".to_string()))
    }

    fn require_open<'a>(
        guard: &'a MutexGuard<'_, Option<Database>>,
    ) -> Result<&'a Database, Error> {
        guard
            .as_ref()
            .ok_or_else(|| Error::Cache("size cache is closed".to_string()))
    }
}
