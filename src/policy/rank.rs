//! # Rank-based policies
//!
//! Every key carries an integer [`Rank`]; the lowest rank is evicted first.
//! Ranks come from the caller (`put_ranked`) or from the configured
//! [`RankSource`] when a key is inserted through plain `put`.
//!
//! Two flavours share [`RankPolicy`], differing only in [`BucketOrder`]:
//!
//! | Flavour        | `on_get`             | Victim inside the lowest bucket |
//! |----------------|----------------------|---------------------------------|
//! | `RankBased`    | no change            | unspecified                     |
//! | `RankBasedLru` | front of its bucket  | least recently touched          |
//!
//! ```text
//!   BTreeMap<Rank, ListLinks>             (first key = lowest rank)
//!
//!   rank 1 ─► [k4] ◄──► [k0]   ◄── victim
//!   rank 3 ─► [k2]
//!   rank 9 ─► [k1] ◄──► [k3]
//! ```
//!
//! A rank change always files the key at the front of its new bucket.
//! Buckets are dropped the moment they empty.

use std::fmt;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::ds::{Rank, RankBuckets, SlotId};
use crate::error::{ConfigError, InvariantError};
use crate::policy::PolicyKind;
use crate::traits::EvictionPolicy;

/// Rank given to new keys when no source or explicit rank says otherwise.
pub const DEFAULT_RANK: Rank = 0;

/// Where the rank of a key inserted without an explicit rank comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RankSource {
    /// Every new key gets the same rank.
    Fixed(Rank),
    /// Uniform draw from `[low, high)`; seeded from entropy when `seed` is `None`.
    Uniform {
        low: Rank,
        high: Rank,
        seed: Option<u64>,
    },
}

impl RankSource {
    /// Uniform ranks in `[low, high)` from an entropy-seeded generator.
    pub const fn uniform(low: Rank, high: Rank) -> Self {
        Self::Uniform {
            low,
            high,
            seed: None,
        }
    }

    /// Uniform ranks in `[low, high)`, reproducible from `seed`.
    pub const fn seeded(low: Rank, high: Rank, seed: u64) -> Self {
        Self::Uniform {
            low,
            high,
            seed: Some(seed),
        }
    }

    /// Random ranks in `[1, 10)`.
    pub const fn reference() -> Self {
        Self::uniform(1, 10)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match *self {
            Self::Fixed(_) => Ok(()),
            Self::Uniform { low, high, .. } if low >= high => Err(ConfigError::new(format!(
                "empty rank range [{low}, {high}): low must be below high"
            ))),
            Self::Uniform { .. } => Ok(()),
        }
    }
}

impl Default for RankSource {
    fn default() -> Self {
        Self::Fixed(DEFAULT_RANK)
    }
}

/// Runtime state behind a [`RankSource`].
enum RankAssigner {
    Fixed(Rank),
    Uniform { rng: SmallRng, low: Rank, high: Rank },
}

impl RankAssigner {
    fn from_source(source: RankSource) -> Result<Self, ConfigError> {
        source.validate()?;
        Ok(match source {
            RankSource::Fixed(rank) => Self::Fixed(rank),
            RankSource::Uniform { low, high, seed } => {
                let rng = match seed {
                    Some(seed) => SmallRng::seed_from_u64(seed),
                    None => SmallRng::from_entropy(),
                };
                Self::Uniform { rng, low, high }
            },
        })
    }

    fn next_rank(&mut self) -> Rank {
        match self {
            Self::Fixed(rank) => *rank,
            Self::Uniform { rng, low, high } => rng.gen_range(*low..*high),
        }
    }
}

impl fmt::Debug for RankAssigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(rank) => f.debug_tuple("Fixed").field(rank).finish(),
            Self::Uniform { low, high, .. } => f
                .debug_struct("Uniform")
                .field("low", low)
                .field("high", high)
                .finish_non_exhaustive(),
        }
    }
}

/// How entries are ordered inside one rank bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketOrder {
    /// Reads leave the bucket alone.
    Insertion,
    /// Reads move the key to the front of its bucket.
    Recency,
}

/// Rank-ordered eviction.
///
/// # Example
///
/// ```
/// use flexcache::cache::Cache;
/// use flexcache::policy::rank::{BucketOrder, RankPolicy, RankSource};
///
/// let policy = RankPolicy::new(BucketOrder::Recency, RankSource::Fixed(5)).unwrap();
/// let mut cache = Cache::with_policy(2, policy);
/// cache.put("a", 1);
/// cache.put_ranked("b", 2, 1);
/// cache.put("c", 3);
///
/// assert!(!cache.contains(&"b"));
/// assert_eq!(cache.rank(&"a"), Some(5));
/// ```
#[derive(Debug)]
pub struct RankPolicy<K> {
    buckets: RankBuckets<K>,
    order: BucketOrder,
    source: RankSource,
    assigner: RankAssigner,
}

impl<K> RankPolicy<K> {
    pub fn new(order: BucketOrder, source: RankSource) -> Result<Self, ConfigError> {
        Self::with_capacity(order, source, 0)
    }

    pub fn with_capacity(
        order: BucketOrder,
        source: RankSource,
        capacity: usize,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            buckets: RankBuckets::with_capacity(capacity),
            order,
            source,
            assigner: RankAssigner::from_source(source)?,
        })
    }

    pub fn order(&self) -> BucketOrder {
        self.order
    }

    pub fn rank_source(&self) -> RankSource {
        self.source
    }

    /// Lowest rank currently held.
    pub fn min_rank(&self) -> Option<Rank> {
        self.buckets.min_rank()
    }

    pub fn bucket_len(&self, rank: Rank) -> usize {
        self.buckets.bucket_len(rank)
    }
}

impl<K> EvictionPolicy<K> for RankPolicy<K> {
    fn kind(&self) -> PolicyKind {
        match self.order {
            BucketOrder::Insertion => PolicyKind::RankBased,
            BucketOrder::Recency => PolicyKind::RankBasedLru,
        }
    }

    fn len(&self) -> usize {
        self.buckets.len()
    }

    fn on_insert(&mut self, key: K, rank: Option<Rank>) -> SlotId {
        let rank = rank.unwrap_or_else(|| self.assigner.next_rank());
        self.buckets.insert(key, rank)
    }

    fn on_get(&mut self, handle: SlotId) {
        if self.order == BucketOrder::Recency {
            self.buckets.touch(handle);
        }
    }

    fn on_update(&mut self, handle: SlotId, rank: Option<Rank>) {
        match (self.order, rank) {
            (BucketOrder::Recency, Some(rank)) => {
                self.buckets.set_rank(handle, rank);
            },
            (BucketOrder::Recency, None) => {
                self.buckets.touch(handle);
            },
            (BucketOrder::Insertion, Some(rank)) => {
                if self.buckets.rank(handle).is_some_and(|old| old != rank) {
                    self.buckets.set_rank(handle, rank);
                }
            },
            (BucketOrder::Insertion, None) => {},
        }
    }

    fn on_remove(&mut self, handle: SlotId) -> Option<K> {
        self.buckets.remove(handle)
    }

    fn peek_victim(&self) -> Option<&K> {
        self.buckets.peek_min().map(|(key, _)| key)
    }

    fn evict(&mut self) -> Option<K> {
        self.buckets.pop_min().map(|(key, _)| key)
    }

    fn clear(&mut self) {
        self.buckets.clear();
    }

    fn key(&self, handle: SlotId) -> Option<&K> {
        self.buckets.get(handle)
    }

    fn rank(&self, handle: SlotId) -> Option<Rank> {
        self.buckets.rank(handle)
    }

    fn bucket_count(&self) -> usize {
        self.buckets.bucket_count()
    }

    fn check_invariants(&self) -> Result<(), InvariantError> {
        self.buckets.check_invariants()
    }
}
