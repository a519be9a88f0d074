use super::models::*;
use super::sqlite::Database;
use rusqlite::{params, Result};
use tracing::debug;

impl Database {
    /// Point lookup: `(size_bytes, last_modified)` for a folder, if any
    /// record exists. Staleness is the caller's judgment; this returns
    /// whatever was stored.
    pub fn get_folder_size(&self, path: &str) -> Result<Option<(i64, i64)>> {
        match self.connection().query_row(
            "SELECT size_bytes, last_modified FROM folder_sizes WHERE path = ?1",
            params![path],
            |row| Ok((row.get(0)?, row.get(1)?)),
        ) {
            Ok(pair) => Ok(Some(pair)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Upsert keyed by path. `updated_at` is stamped with the current
    /// wall-clock time on every write.
    pub fn upsert_folder_size(
        &self,
        path: &str,
        size_bytes: i64,
        last_modified: i64,
    ) -> Result<()> {
        let now = chrono::Utc::now().to_rfc3339();
        self.connection().execute(
            "INSERT INTO folder_sizes (path, size_bytes, last_modified, updated_at) \
             VALUES (?1, ?2, ?3, ?4) \
             ON CONFLICT(path) DO UPDATE SET \
                 size_bytes = excluded.size_bytes, \
                 last_modified = excluded.last_modified, \
                 updated_at = excluded.updated_at",
            params![path, size_bytes, last_modified, now],
        )?;
        Ok(())
    }

    /// Delete one record by exact path. Returns whether a record existed.
    pub fn delete_folder_size(&self, path: &str) -> Result<bool> {
        let deleted = self.connection().execute(
            "DELETE FROM folder_sizes WHERE path = ?1",
            params![path],
        )?;
        Ok(deleted > 0)
    }

    /// Delete records whose `updated_at` is older than the RFC3339 cutoff.
    /// RFC3339 UTC strings compare lexicographically in time order.
    pub fn delete_older_than(&self, cutoff_rfc3339: &str) -> Result<usize> {
        let deleted = self.connection().execute(
            "DELETE FROM folder_sizes WHERE updated_at < ?1",
            params![cutoff_rfc3339],
        )?;
        debug!("Deleted {} cache records older than {}", deleted, cutoff_rfc3339);
        Ok(deleted)
    }

    /// Delete every record. Maintenance only.
    pub fn delete_all(&self) -> Result<usize> {
        let deleted = self.connection().execute("DELETE FROM folder_sizes", [])?;
        debug!("Deleted all {} cache records", deleted);
        Ok(deleted)
    }

    pub fn list_cache_records(&self) -> Result<Vec<CacheRecord>> {
        let mut stmt = self.connection().prepare(
            "SELECT path, size_bytes, last_modified, updated_at \
             FROM folder_sizes ORDER BY path",
        )?;
        let records = stmt
            .query_map([], |row| {
                Ok(CacheRecord {
                    path: row.get(0)?,
                    size_bytes: row.get(1)?,
                    last_modified: row.get(2)?,
                    updated_at: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>>>()?;
        Ok(records)
    }

    pub fn cache_stats(&self) -> Result<CacheStats> {
        self.connection().query_row(
            "SELECT COUNT(*), COALESCE(SUM(size_bytes), 0) FROM folder_sizes",
            [],
            |row| {
                Ok(CacheStats {
                    records: row.get(0)?,
                    total_bytes: row.get(1)?,
                })
            },
        )
    }
}
