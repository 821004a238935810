//! Error types for the warmcache library.
//!
//! ## Key Components
//!
//! - [`ConfigError`]: Returned when cache configuration parameters are
//!   invalid (e.g. zero capacity).
//! - [`SnapshotError`]: Returned when a snapshot cannot be written or read
//!   back. Variants distinguish I/O failures from format problems so callers
//!   can decide whether a failed load left the engine empty or partially
//!   populated.
//!
//! ## Example Usage
//!
//! ```
//! use warmcache::error::ConfigError;
//! use warmcache::engine::CacheEngine;
//!
//! // Fallible constructor for user-configurable parameters
//! let engine: Result<CacheEngine, ConfigError> = CacheEngine::try_new(100);
//! assert!(engine.is_ok());
//!
//! // Zero capacity is caught without panicking
//! let bad = CacheEngine::try_new(0);
//! assert!(bad.is_err());
//! ```

use std::io;

use thiserror::Error;

/// Error returned when cache configuration parameters are invalid.
///
/// Produced by fallible constructors such as
/// [`CacheEngine::try_new`](crate::engine::CacheEngine::try_new) and
/// [`KvCache::new`](crate::store::KvCache::new). Carries a human-readable
/// description of which parameter failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ConfigError(String);

impl ConfigError {
    /// Creates a new `ConfigError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

/// Error returned when a snapshot cannot be persisted or restored.
///
/// `save` surfaces [`Io`](SnapshotError::Io) and
/// [`LengthOverflow`](SnapshotError::LengthOverflow); `load` additionally
/// surfaces [`UnsupportedVersion`](SnapshotError::UnsupportedVersion)
/// (engine left empty) and [`Truncated`](SnapshotError::Truncated) (engine
/// keeps the records decoded before the stream ended).
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The sink/source could not be opened, or a read/write failed.
    #[error("snapshot I/O failed: {0}")]
    Io(#[from] io::Error),

    /// The stream header carries a version this build does not understand.
    #[error("unsupported snapshot version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    /// The stream ended in the middle of a record.
    #[error("snapshot stream ended mid-record")]
    Truncated,

    /// A length does not fit the u32-prefixed wire format.
    #[error("length {len} exceeds the snapshot format limit")]
    LengthOverflow { len: usize },
}
