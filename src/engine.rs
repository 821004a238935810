//! Concurrent LRU cache engine over byte keys and values.
//!
//! ## Architecture
//!
//! ```text
//!   ┌─────────────────────────────────────────────────────────────┐
//!   │                      CacheEngine                            │
//!   │              Arc<RwLock<EngineCore>> (engine lock)          │
//!   │                           │                                 │
//!   │                           ▼                                 │
//!   │   ┌─────────────────────────────────────────────────────┐   │
//!   │   │                   EngineCore                        │   │
//!   │   │                                                     │   │
//!   │   │   FxHashMap<Arc<[u8]>, NodeId>   (key index)        │   │
//!   │   │               │                                     │   │
//!   │   │               ▼                                     │   │
//!   │   │   RecencyList (nodes + recency order)               │   │
//!   │   │   front ─► [MRU] ◄──► … ◄──► [LRU] ◄── back         │   │
//!   │   └─────────────────────────────────────────────────────┘   │
//!   └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each key is one shared `Arc<[u8]>`, held by the node and cheaply cloned
//! into the index, so an insert performs a single key allocation.
//!
//! | Component    | Role                                                |
//! |--------------|-----------------------------------------------------|
//! | `EngineCore` | Single-threaded core: index + recency list          |
//! | `PutOutcome` | Explicit insert/update/evict signal from `put`      |
//! | `CacheEngine`| Thread-safe handle over `parking_lot::RwLock`       |
//!
//! ## Concurrency Model
//!
//! All mutators take the write lock. `get` also takes the write lock: a hit
//! must splice the node to the front and refresh its metadata, and doing
//! that under one exclusive acquisition keeps every operation linearizable
//! at a single lock boundary. Pure observers (`len`, `is_empty`,
//! `contains`, `capacity`) and the snapshot walk take the read lock.
//!
//! All operations are O(1) amortized: one index probe plus a constant
//! number of list splices.

use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::ds::{NodeId, RecencyList};
use crate::entry::CacheEntry;
use crate::error::{ConfigError, SnapshotError};
use crate::snapshot;

/// What a `put` did, so callers can account for evictions exactly instead
/// of inferring them from size deltas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PutOutcome {
    /// The key was absent and the cache had room.
    Inserted,
    /// The key existed; its value was overwritten in place. Never evicts.
    Updated,
    /// The key was absent and the cache was full: the least recently used
    /// entry was dropped to make room.
    Evicted {
        /// Key of the entry that was evicted.
        victim: Arc<[u8]>,
    },
}

impl PutOutcome {
    /// Returns `true` if this put displaced another entry.
    pub fn is_eviction(&self) -> bool {
        matches!(self, PutOutcome::Evicted { .. })
    }
}

/// Single-threaded LRU core: hash index plus recency list.
///
/// Not thread-safe on its own; [`CacheEngine`] provides the locking. All
/// nodes live in the list's slot storage and are referenced from the index
/// by stable [`NodeId`] handles, so the hot path performs no per-node
/// allocation once the slab has grown to capacity.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use warmcache::engine::EngineCore;
///
/// let mut core = EngineCore::try_new(2).unwrap();
/// core.put(b"a", Arc::from(&b"1"[..]));
/// core.put(b"b", Arc::from(&b"2"[..]));
///
/// // "a" is least recently used; a third insert evicts it
/// let outcome = core.put(b"c", Arc::from(&b"3"[..]));
/// assert!(outcome.is_eviction());
/// assert!(core.get(b"a").is_none());
/// assert_eq!(core.len(), 2);
/// ```
pub struct EngineCore {
    index: FxHashMap<Arc<[u8]>, NodeId>,
    order: RecencyList,
    capacity: usize,
}

impl EngineCore {
    /// Creates a core with the given capacity.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `capacity` is zero.
    pub fn try_new(capacity: usize) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::new("cache capacity must be greater than 0"));
        }
        Ok(Self {
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            order: RecencyList::with_capacity(capacity),
            capacity,
        })
    }

    /// Looks up a key, promoting it to most recently used on a hit.
    ///
    /// Returns a snapshot of the value at the moment of lookup and records
    /// the access on the entry. Total function: a miss is `None`, never an
    /// error.
    pub fn get(&mut self, key: &[u8]) -> Option<Arc<[u8]>> {
        let id = *self.index.get(key)?;
        let value = {
            let entry = self.order.entry_mut(id)?;
            entry.touch();
            Arc::clone(entry.value())
        };
        self.order.promote(id);

        self.validate_invariants();
        Some(value)
    }

    /// Inserts or overwrites a key.
    ///
    /// An existing key is overwritten in place and promoted; no eviction
    /// can occur. A new key at full capacity first drops the entry at the
    /// back of the recency order, then inserts at the front, leaving the
    /// size unchanged. Both steps happen under one exclusive acquisition,
    /// so readers never observe the intermediate state.
    pub fn put(&mut self, key: &[u8], value: Arc<[u8]>) -> PutOutcome {
        if let Some(&id) = self.index.get(key) {
            if let Some(entry) = self.order.entry_mut(id) {
                entry.replace(value);
            }
            self.order.promote(id);

            self.validate_invariants();
            return PutOutcome::Updated;
        }

        let mut outcome = PutOutcome::Inserted;
        if self.index.len() >= self.capacity {
            if let Some((victim, _)) = self.order.pop_back() {
                self.index.remove(&victim[..]);
                outcome = PutOutcome::Evicted { victim };
            }
        }

        // one owned key, shared between the node and the index
        let key: Arc<[u8]> = Arc::from(key);
        let id = self.order.push_front(Arc::clone(&key), CacheEntry::new(value));
        self.index.insert(key, id);

        self.validate_invariants();
        outcome
    }

    /// Removes a key, returning whether it was present.
    pub fn remove(&mut self, key: &[u8]) -> bool {
        match self.index.remove(key) {
            Some(id) => {
                self.order.remove(id);
                self.validate_invariants();
                true
            },
            None => false,
        }
    }

    /// Removes every entry. Capacity is preserved.
    pub fn clear(&mut self) {
        self.index.clear();
        self.order.clear();
    }

    /// Returns `true` if the key is present, without touching recency.
    pub fn contains(&self, key: &[u8]) -> bool {
        self.index.contains_key(key)
    }

    /// Returns the current number of entries.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns `true` if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Returns the maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterates `(key, value)` pairs least-recently-used first.
    ///
    /// This is the order the snapshot codec writes, chosen so that a reload
    /// (which inserts at the front) reproduces the saved recency order.
    pub fn iter_lru_first(&self) -> impl Iterator<Item = (&[u8], &Arc<[u8]>)> {
        self.order
            .iter_lru_first()
            .map(|(key, entry)| (key, entry.value()))
    }

    /// Validate internal invariants (debug builds only).
    fn validate_invariants(&self) {
        #[cfg(debug_assertions)]
        {
            assert_eq!(self.index.len(), self.order.len());
            assert!(self.index.len() <= self.capacity);
            self.order.debug_validate_invariants();

            for (key, &id) in &self.index {
                let node_key = self.order.key(id).expect("indexed node missing from list");
                assert_eq!(node_key, key);
            }
        }
    }
}

impl fmt::Debug for EngineCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineCore")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .finish_non_exhaustive()
    }
}

/// Thread-safe LRU engine handle.
///
/// Cloning is cheap and produces another handle to the same cache. All
/// state sits behind a single `parking_lot::RwLock`; see the module docs
/// for which operations take which lock mode.
///
/// # Example
///
/// ```
/// use warmcache::engine::CacheEngine;
///
/// let engine = CacheEngine::try_new(100).unwrap();
/// engine.put(b"k1", b"v1");
/// assert_eq!(engine.get(b"k1").as_deref(), Some(&b"v1"[..]));
/// assert!(engine.get(b"missing").is_none());
/// ```
#[derive(Clone)]
pub struct CacheEngine {
    inner: Arc<RwLock<EngineCore>>,
}

impl CacheEngine {
    /// Creates an engine with the given capacity.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `capacity` is zero.
    pub fn try_new(capacity: usize) -> Result<Self, ConfigError> {
        Ok(Self {
            inner: Arc::new(RwLock::new(EngineCore::try_new(capacity)?)),
        })
    }

    /// Looks up a key, promoting it on a hit. Returns a value snapshot.
    pub fn get(&self, key: &[u8]) -> Option<Arc<[u8]>> {
        self.inner.write().get(key)
    }

    /// Inserts or overwrites a key, copying the value bytes.
    pub fn put(&self, key: &[u8], value: &[u8]) -> PutOutcome {
        self.inner.write().put(key, Arc::from(value))
    }

    /// Inserts or overwrites a key with an already-shared value, without
    /// copying the bytes.
    pub fn put_arc(&self, key: &[u8], value: Arc<[u8]>) -> PutOutcome {
        self.inner.write().put(key, value)
    }

    /// Removes a key, returning whether it was present.
    pub fn remove(&self, key: &[u8]) -> bool {
        self.inner.write().remove(key)
    }

    /// Removes every entry. Capacity is preserved.
    pub fn clear(&self) {
        self.inner.write().clear();
    }

    /// Returns `true` if the key is present, without touching recency.
    pub fn contains(&self, key: &[u8]) -> bool {
        self.inner.read().contains(key)
    }

    /// Returns the current number of entries.
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// Returns `true` if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Returns the maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.inner.read().capacity()
    }

    /// Writes a snapshot of the current contents to `path`.
    ///
    /// Holds the read lock for the duration of the walk, so the snapshot
    /// reflects one consistent state. Concurrent readers proceed;
    /// mutators wait.
    ///
    /// # Errors
    ///
    /// [`SnapshotError::Io`] if the sink cannot be opened or written.
    pub fn save_snapshot(&self, path: &Path) -> Result<(), SnapshotError> {
        let file = File::create(path)?;
        let core = self.inner.read();
        let mut writer = BufWriter::new(file);
        snapshot::write_entries(&core, &mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Replaces the current contents with a snapshot read from `path`.
    ///
    /// The source is opened before the engine is touched: a missing or
    /// unreadable file fails without mutating the cache. Once decoding
    /// starts the engine is emptied and repopulated under the write lock;
    /// see [`snapshot::read_entries`] for the failure states.
    pub fn load_snapshot(&self, path: &Path) -> Result<(), SnapshotError> {
        let file = File::open(path)?;
        let mut core = self.inner.write();
        snapshot::read_entries(&mut core, BufReader::new(file))
    }
}

impl fmt::Debug for CacheEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let core = self.inner.read();
        f.debug_struct("CacheEngine")
            .field("len", &core.len())
            .field("capacity", &core.capacity())
            .finish_non_exhaustive()
    }
}
