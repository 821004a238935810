pub use crate::ds::{NodeId, RecencyList};
pub use crate::engine::{CacheEngine, EngineCore, PutOutcome};
pub use crate::error::{ConfigError, SnapshotError};
pub use crate::metrics::{MetricsSnapshot, StoreMetrics};
pub use crate::snapshot::SNAPSHOT_VERSION;
pub use crate::store::KvCache;
