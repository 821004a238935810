//! Per-entry value storage and access bookkeeping.
//!
//! A [`CacheEntry`] owns the cached bytes together with the metadata the
//! engine maintains on every touch: a monotonic last-access instant and an
//! access counter. Values are shared as immutable `Arc<[u8]>` snapshots; an
//! overwrite replaces the `Arc` and never mutates bytes already handed out
//! to readers.

use std::sync::Arc;
use std::time::Instant;

/// The cached value plus its access metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    value: Arc<[u8]>,
    last_accessed: Instant,
    access_count: u64,
}

impl CacheEntry {
    /// Creates a fresh entry. The access count starts at 1, counting the
    /// insert itself.
    pub fn new(value: Arc<[u8]>) -> Self {
        Self {
            value,
            last_accessed: Instant::now(),
            access_count: 1,
        }
    }

    /// Returns the value snapshot.
    pub fn value(&self) -> &Arc<[u8]> {
        &self.value
    }

    /// Returns the value as a plain byte slice.
    pub fn bytes(&self) -> &[u8] {
        &self.value
    }

    /// Records an access: refreshes the last-access instant and bumps the
    /// counter.
    pub fn touch(&mut self) {
        self.last_accessed = Instant::now();
        self.access_count += 1;
    }

    /// Replaces the value and records the access.
    pub fn replace(&mut self, value: Arc<[u8]>) {
        self.value = value;
        self.touch();
    }

    /// Returns the instant of the most recent touch.
    pub fn last_accessed(&self) -> Instant {
        self.last_accessed
    }

    /// Returns how many times this entry has been written or read.
    pub fn access_count(&self) -> u64 {
        self.access_count
    }
}
