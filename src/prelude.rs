pub use crate::builder::{CacheBuilder, CacheConfig};
pub use crate::cache::Cache;
#[cfg(feature = "concurrency")]
pub use crate::concurrent::ConcurrentCache;
pub use crate::error::{ConfigError, InvariantError};
pub use crate::listener::{EvictionCause, EvictionListener, FnListener};
#[cfg(feature = "metrics")]
pub use crate::metrics::snapshot::CacheMetricsSnapshot;
pub use crate::policy::{
    AnyPolicy, BucketOrder, DEFAULT_RANK, LfuPolicy, LruPolicy, PolicyKind, Rank, RankPolicy,
    RankSource,
};
pub use crate::traits::{CoreCache, EvictionPolicy, MutableCache};
