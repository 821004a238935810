//! Operation counters for the cache façade.
//!
//! Counters are independent `AtomicU64`s updated with relaxed ordering and
//! read without any lock. They are eventually consistent with engine state
//! and with each other; no cross-counter ordering is implied. Updating them
//! never takes the engine lock, so metrics cost nothing on the cache's
//! critical section.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use parking_lot::Mutex;

/// Monotonic operation counters, reset only on request.
#[derive(Debug)]
pub struct StoreMetrics {
    total_operations: AtomicU64,
    cache_hits: AtomicU64,
    cache_misses: AtomicU64,
    evictions: AtomicU64,
    started: Mutex<Instant>,
}

impl StoreMetrics {
    pub fn new() -> Self {
        Self {
            total_operations: AtomicU64::new(0),
            cache_hits: AtomicU64::new(0),
            cache_misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
            started: Mutex::new(Instant::now()),
        }
    }

    pub fn record_operation(&self) {
        self.total_operations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_eviction(&self) {
        self.evictions.fetch_add(1, Ordering::Relaxed);
    }

    /// Zeroes every counter and restarts the throughput clock.
    pub fn reset(&self) {
        self.total_operations.store(0, Ordering::Relaxed);
        self.cache_hits.store(0, Ordering::Relaxed);
        self.cache_misses.store(0, Ordering::Relaxed);
        self.evictions.store(0, Ordering::Relaxed);
        *self.started.lock() = Instant::now();
    }

    /// Hits over total gets, or 0 when nothing has been looked up yet.
    pub fn hit_rate(&self) -> f64 {
        let hits = self.cache_hits.load(Ordering::Relaxed);
        let total = hits + self.cache_misses.load(Ordering::Relaxed);
        if total == 0 {
            0.0
        } else {
            hits as f64 / total as f64
        }
    }

    /// Operations per whole elapsed second since start (or the last reset);
    /// 0 while less than one second has elapsed.
    pub fn operations_per_second(&self) -> f64 {
        let elapsed = self.started.lock().elapsed().as_secs();
        if elapsed == 0 {
            0.0
        } else {
            self.total_operations.load(Ordering::Relaxed) as f64 / elapsed as f64
        }
    }

    /// Captures the counters into a plain value.
    ///
    /// Each counter is read independently; the snapshot is not an atomic
    /// cut across them.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            total_operations: self.total_operations.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.cache_misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            hit_rate: self.hit_rate(),
            operations_per_second: self.operations_per_second(),
        }
    }
}

impl Default for StoreMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time view of the façade counters.
#[derive(Debug, Clone, Copy)]
pub struct MetricsSnapshot {
    pub total_operations: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub evictions: u64,
    pub hit_rate: f64,
    pub operations_per_second: f64,
}
