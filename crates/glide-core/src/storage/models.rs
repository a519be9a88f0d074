/// One persisted folder-size record.
///
/// `last_modified` is the folder's on-disk mtime (epoch seconds) at the
/// moment the size was computed; a record is reusable only while the
/// folder's current mtime still equals it. `updated_at` is the RFC3339
/// wall-clock time of the write.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheRecord {
    pub path: String,
    pub size_bytes: i64,
    pub last_modified: i64,
    pub updated_at: String,
}

/// Aggregate view over the cache table, for the maintenance CLI.
#[derive(Debug, Clone, Copy)]
pub struct CacheStats {
    pub records: i64,
    pub total_bytes: i64,
}
