//! Eviction policies.
//!
//! | Kind           | Module   | Ordering                         | Evict    |
//! |----------------|----------|----------------------------------|----------|
//! | `Lru`          | [`lru`]  | recency list                     | O(1)     |
//! | `Lfu`          | [`lfu`]  | frequency buckets + `min_freq`   | O(1)     |
//! | `RankBased`    | [`rank`] | rank buckets                     | O(log R) |
//! | `RankBasedLru` | [`rank`] | rank buckets, recency inside     | O(log R) |
//!
//! [`AnyPolicy`] picks one of these at runtime from a [`PolicyKind`]; it is
//! the default policy parameter of [`Cache`](crate::cache::Cache).

pub mod lfu;
pub mod lru;
pub mod rank;

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub use crate::ds::Rank;
pub use lfu::LfuPolicy;
pub use lru::LruPolicy;
pub use rank::{BucketOrder, DEFAULT_RANK, RankPolicy, RankSource};

use crate::ds::SlotId;
use crate::error::{ConfigError, InvariantError};
use crate::traits::EvictionPolicy;

/// The supported eviction policies.
///
/// Parses from the names used in configuration:
///
/// ```
/// use flexcache::policy::PolicyKind;
///
/// assert_eq!("LRU".parse(), Ok(PolicyKind::Lru));
/// assert_eq!("rank_based_lru".parse(), Ok(PolicyKind::RankBasedLru));
/// assert_eq!(PolicyKind::RankBased.to_string(), "rank-based");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum PolicyKind {
    #[default]
    Lru,
    Lfu,
    RankBased,
    RankBasedLru,
}

impl PolicyKind {
    pub const ALL: [PolicyKind; 4] = [
        PolicyKind::Lru,
        PolicyKind::Lfu,
        PolicyKind::RankBased,
        PolicyKind::RankBasedLru,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            PolicyKind::Lru => "lru",
            PolicyKind::Lfu => "lfu",
            PolicyKind::RankBased => "rank-based",
            PolicyKind::RankBasedLru => "rank-based-lru",
        }
    }

    /// Whether entries of this policy carry a rank.
    pub const fn is_ranked(self) -> bool {
        matches!(self, PolicyKind::RankBased | PolicyKind::RankBasedLru)
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PolicyKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "lru" => Ok(PolicyKind::Lru),
            "lfu" => Ok(PolicyKind::Lfu),
            "rank" | "rank-based" => Ok(PolicyKind::RankBased),
            "rank-lru" | "rank-based-lru" => Ok(PolicyKind::RankBasedLru),
            _ => Err(ConfigError::new(format!(
                "unsupported eviction policy: {s:?}"
            ))),
        }
    }
}

/// Upper bound on slots reserved up front; larger caches grow on demand.
pub(crate) const PREALLOC_LIMIT: usize = 4096;

/// Runtime-selected policy.
#[derive(Debug)]
pub enum AnyPolicy<K> {
    Lru(LruPolicy<K>),
    Lfu(LfuPolicy<K>),
    Rank(RankPolicy<K>),
}

impl<K> AnyPolicy<K> {
    /// Builds the policy for `kind`. `rank_source` is only consulted by the
    /// rank-based kinds.
    pub fn new(
        kind: PolicyKind,
        capacity: usize,
        rank_source: RankSource,
    ) -> Result<Self, ConfigError> {
        let capacity = capacity.min(PREALLOC_LIMIT);
        Ok(match kind {
            PolicyKind::Lru => AnyPolicy::Lru(LruPolicy::with_capacity(capacity)),
            PolicyKind::Lfu => AnyPolicy::Lfu(LfuPolicy::with_capacity(capacity)),
            PolicyKind::RankBased => AnyPolicy::Rank(RankPolicy::with_capacity(
                BucketOrder::Insertion,
                rank_source,
                capacity,
            )?),
            PolicyKind::RankBasedLru => AnyPolicy::Rank(RankPolicy::with_capacity(
                BucketOrder::Recency,
                rank_source,
                capacity,
            )?),
        })
    }
}

impl<K> EvictionPolicy<K> for AnyPolicy<K> {
    fn kind(&self) -> PolicyKind {
        match self {
            AnyPolicy::Lru(p) => p.kind(),
            AnyPolicy::Lfu(p) => p.kind(),
            AnyPolicy::Rank(p) => p.kind(),
        }
    }

    fn len(&self) -> usize {
        match self {
            AnyPolicy::Lru(p) => p.len(),
            AnyPolicy::Lfu(p) => p.len(),
            AnyPolicy::Rank(p) => p.len(),
        }
    }

    fn on_insert(&mut self, key: K, rank: Option<Rank>) -> SlotId {
        match self {
            AnyPolicy::Lru(p) => p.on_insert(key, rank),
            AnyPolicy::Lfu(p) => p.on_insert(key, rank),
            AnyPolicy::Rank(p) => p.on_insert(key, rank),
        }
    }

    fn on_get(&mut self, handle: SlotId) {
        match self {
            AnyPolicy::Lru(p) => p.on_get(handle),
            AnyPolicy::Lfu(p) => p.on_get(handle),
            AnyPolicy::Rank(p) => p.on_get(handle),
        }
    }

    fn on_update(&mut self, handle: SlotId, rank: Option<Rank>) {
        match self {
            AnyPolicy::Lru(p) => p.on_update(handle, rank),
            AnyPolicy::Lfu(p) => p.on_update(handle, rank),
            AnyPolicy::Rank(p) => p.on_update(handle, rank),
        }
    }

    fn on_remove(&mut self, handle: SlotId) -> Option<K> {
        match self {
            AnyPolicy::Lru(p) => p.on_remove(handle),
            AnyPolicy::Lfu(p) => p.on_remove(handle),
            AnyPolicy::Rank(p) => p.on_remove(handle),
        }
    }

    fn peek_victim(&self) -> Option<&K> {
        match self {
            AnyPolicy::Lru(p) => p.peek_victim(),
            AnyPolicy::Lfu(p) => p.peek_victim(),
            AnyPolicy::Rank(p) => p.peek_victim(),
        }
    }

    fn evict(&mut self) -> Option<K> {
        match self {
            AnyPolicy::Lru(p) => p.evict(),
            AnyPolicy::Lfu(p) => p.evict(),
            AnyPolicy::Rank(p) => p.evict(),
        }
    }

    fn clear(&mut self) {
        match self {
            AnyPolicy::Lru(p) => p.clear(),
            AnyPolicy::Lfu(p) => p.clear(),
            AnyPolicy::Rank(p) => p.clear(),
        }
    }

    fn key(&self, handle: SlotId) -> Option<&K> {
        match self {
            AnyPolicy::Lru(p) => p.key(handle),
            AnyPolicy::Lfu(p) => p.key(handle),
            AnyPolicy::Rank(p) => p.key(handle),
        }
    }

    fn frequency(&self, handle: SlotId) -> Option<u64> {
        match self {
            AnyPolicy::Lru(p) => p.frequency(handle),
            AnyPolicy::Lfu(p) => p.frequency(handle),
            AnyPolicy::Rank(p) => p.frequency(handle),
        }
    }

    fn rank(&self, handle: SlotId) -> Option<Rank> {
        match self {
            AnyPolicy::Lru(p) => p.rank(handle),
            AnyPolicy::Lfu(p) => p.rank(handle),
            AnyPolicy::Rank(p) => p.rank(handle),
        }
    }

    fn bucket_count(&self) -> usize {
        match self {
            AnyPolicy::Lru(p) => p.bucket_count(),
            AnyPolicy::Lfu(p) => p.bucket_count(),
            AnyPolicy::Rank(p) => p.bucket_count(),
        }
    }

    fn check_invariants(&self) -> Result<(), InvariantError> {
        match self {
            AnyPolicy::Lru(p) => p.check_invariants(),
            AnyPolicy::Lfu(p) => p.check_invariants(),
            AnyPolicy::Rank(p) => p.check_invariants(),
        }
    }
}
