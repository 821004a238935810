//! Public cache façade: engine + metrics + snapshot lifecycle.
//!
//! [`KvCache`] is the type most callers hold. It delegates to the
//! [`CacheEngine`], keeps the operation counters current without touching
//! the engine lock, and owns the optional snapshot path: warm load at
//! construction, best-effort save at teardown.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::engine::CacheEngine;
use crate::error::{ConfigError, SnapshotError};
use crate::metrics::{MetricsSnapshot, StoreMetrics};

/// Bounded LRU byte cache with metrics and optional warm restart.
///
/// # Example
///
/// ```
/// use warmcache::store::KvCache;
///
/// let cache = KvCache::new(100).unwrap();
/// cache.put(b"k1", b"v1");
/// assert_eq!(cache.get(b"k1").as_deref(), Some(&b"v1"[..]));
/// assert!(cache.get(b"missing").is_none());
///
/// let metrics = cache.metrics();
/// assert_eq!(metrics.total_operations, 3);
/// assert_eq!(metrics.cache_hits, 1);
/// assert_eq!(metrics.cache_misses, 1);
/// ```
#[derive(Debug)]
pub struct KvCache {
    engine: CacheEngine,
    metrics: StoreMetrics,
    snapshot_path: Option<PathBuf>,
}

impl KvCache {
    /// Creates a cache with the given capacity and no snapshot file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self, ConfigError> {
        Ok(Self {
            engine: CacheEngine::try_new(capacity)?,
            metrics: StoreMetrics::new(),
            snapshot_path: None,
        })
    }

    /// Creates a cache bound to a snapshot file.
    ///
    /// If the file exists, its contents are loaded; a load failure is
    /// non-fatal and leaves the cache empty. On drop the cache saves back
    /// to the same path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `capacity` is zero. Snapshot problems
    /// never fail construction.
    pub fn with_snapshot(capacity: usize, path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let store = Self {
            engine: CacheEngine::try_new(capacity)?,
            metrics: StoreMetrics::new(),
            snapshot_path: Some(path.clone()),
        };
        if path.exists() && store.load_snapshot() {
            debug!(
                path = %path.display(),
                entries = store.len(),
                "warm-started cache from snapshot"
            );
        }
        Ok(store)
    }

    /// Looks up a key, promoting it on a hit. Returns a value snapshot.
    pub fn get(&self, key: &[u8]) -> Option<Arc<[u8]>> {
        self.metrics.record_operation();
        match self.engine.get(key) {
            Some(value) => {
                self.metrics.record_hit();
                Some(value)
            },
            None => {
                self.metrics.record_miss();
                None
            },
        }
    }

    /// Inserts or overwrites a key, copying the value bytes.
    pub fn put(&self, key: &[u8], value: &[u8]) {
        self.metrics.record_operation();
        if self.engine.put(key, value).is_eviction() {
            self.metrics.record_eviction();
        }
    }

    /// Inserts or overwrites a key with an already-shared value.
    pub fn put_arc(&self, key: &[u8], value: Arc<[u8]>) {
        self.metrics.record_operation();
        if self.engine.put_arc(key, value).is_eviction() {
            self.metrics.record_eviction();
        }
    }

    /// Removes a key, returning whether it was present.
    pub fn remove(&self, key: &[u8]) -> bool {
        self.metrics.record_operation();
        self.engine.remove(key)
    }

    /// Empties the cache and resets the metrics. Capacity is preserved.
    pub fn clear(&self) {
        self.engine.clear();
        self.metrics.reset();
    }

    /// Returns `true` if the key is present, without touching recency or
    /// metrics.
    pub fn contains(&self, key: &[u8]) -> bool {
        self.engine.contains(key)
    }

    /// Returns the current number of entries.
    pub fn len(&self) -> usize {
        self.engine.len()
    }

    /// Returns `true` if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.engine.is_empty()
    }

    /// Returns the maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.engine.capacity()
    }

    /// Returns the configured snapshot path, if any.
    pub fn snapshot_path(&self) -> Option<&Path> {
        self.snapshot_path.as_deref()
    }

    /// Writes the current contents to the configured snapshot path.
    ///
    /// A no-op success when no path is configured.
    ///
    /// # Errors
    ///
    /// [`SnapshotError`] if the file cannot be written.
    pub fn save_snapshot(&self) -> Result<(), SnapshotError> {
        match &self.snapshot_path {
            Some(path) => self.engine.save_snapshot(path),
            None => Ok(()),
        }
    }

    /// Replaces the contents from the configured snapshot path.
    ///
    /// Returns `true` on a clean load. Returns `false`, with the failure
    /// logged, when no path is configured, the file is missing or
    /// unreadable (cache unchanged), the version is unsupported (cache left
    /// empty), or the stream is truncated (cache keeps the decoded prefix).
    pub fn load_snapshot(&self) -> bool {
        let Some(path) = &self.snapshot_path else {
            return false;
        };
        match self.engine.load_snapshot(path) {
            Ok(()) => true,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "snapshot load failed");
                false
            },
        }
    }

    /// Captures the operation counters.
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Zeroes the operation counters and restarts the throughput clock.
    pub fn reset_metrics(&self) {
        self.metrics.reset();
    }
}

impl Drop for KvCache {
    /// Best-effort save to the configured snapshot path. Failure is logged
    /// and never panics.
    fn drop(&mut self) {
        if self.snapshot_path.is_some() {
            if let Err(err) = self.save_snapshot() {
                warn!(error = %err, "failed to save snapshot during teardown");
            }
        }
    }
}
