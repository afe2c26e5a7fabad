//! # Cache engine
//!
//! A fixed-capacity key/value store whose overflow victim is chosen by a
//! pluggable [`EvictionPolicy`].
//!
//! ## Architecture
//!
//! ```text
//!   ┌────────────────────────────────────────────────────────────────────┐
//!   │                        Cache<K, V, P>                              │
//!   │                                                                    │
//!   │   primary index: FxHashMap<K, Entry<V>>                            │
//!   │   ┌─────────┬──────────────────────────────┐                       │
//!   │   │   Key   │ Entry { value, handle }      │                       │
//!   │   ├─────────┼──────────────────────────────┤                       │
//!   │   │  "a"    │ { 1, SlotId(0) } ────────────┼──┐                    │
//!   │   │  "b"    │ { 2, SlotId(1) } ────────────┼──┼──┐                 │
//!   │   └─────────┴──────────────────────────────┘  │  │                 │
//!   │                                               ▼  ▼                 │
//!   │   policy: P (LRU list / LFU buckets / rank buckets)                │
//!   │   ┌──────────────────────────────────────────────────────────────┐ │
//!   │   │  arena of key nodes, linked into per-bucket lists            │ │
//!   │   └──────────────────────────────────────────────────────────────┘ │
//!   └────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The index and the policy always hold exactly the same key set. Every
//! public operation updates both before returning.
//!
//! ## Put Flow
//!
//! ```text
//!   put(key, value, rank?)
//!     │
//!     ├─ key present ─► replace value ─► policy.on_update(handle, rank)
//!     │                                   return Some(old)
//!     │
//!     ├─ capacity == 0 ─► drop the pair, return None
//!     │
//!     ├─ len == capacity ─► victim = policy.evict()
//!     │                     index.remove(victim), log, notify listener
//!     │
//!     └─ handle = policy.on_insert(key, rank); index.insert(key, handle)
//! ```
//!
//! ## Operations
//!
//! | Operation     | LRU / LFU | Rank-based | Policy notified |
//! |---------------|-----------|------------|-----------------|
//! | `get`         | O(1)      | O(log R)   | on hit          |
//! | `put`         | O(1)      | O(log R)   | always          |
//! | `remove`      | O(1)      | O(log R)   | if present      |
//! | `peek`        | O(1)      | O(1)       | never           |
//! | `contains`    | O(1)      | O(1)       | never           |
//! | `evict_one`   | O(1)      | O(log R)   | yes             |
//!
//! `R` is the number of distinct ranks in use.
//!
//! ## Example
//!
//! ```
//! use flexcache::cache::Cache;
//! use flexcache::policy::PolicyKind;
//!
//! let mut cache = Cache::new(2, PolicyKind::RankBasedLru).unwrap();
//! cache.put_ranked("a", 1, 5);
//! cache.put_ranked("b", 2, 1);
//! cache.put_ranked("c", 3, 3);
//!
//! assert_eq!(cache.get(&"b"), None);
//! assert_eq!(cache.get(&"a"), Some(&1));
//! assert_eq!(cache.rank(&"c"), Some(3));
//! ```

use std::fmt;
use std::hash::Hash;
use std::mem;

use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::builder::CacheBuilder;
use crate::ds::{Rank, SlotId};
use crate::error::{ConfigError, InvariantError};
use crate::listener::{EvictionCause, EvictionListener};
#[cfg(feature = "metrics")]
use crate::metrics::{
    CacheMetrics, CacheMetricsSnapshot, CoreMetricsReadRecorder, CoreMetricsRecorder,
    MetricsReset, MetricsSnapshotProvider,
};
use crate::policy::{AnyPolicy, PREALLOC_LIMIT, PolicyKind, RankSource};
use crate::traits::{CoreCache, EvictionPolicy, MutableCache};

#[derive(Debug)]
struct Entry<V> {
    value: V,
    handle: SlotId,
}

/// Fixed-capacity cache with a pluggable eviction policy.
///
/// `P` defaults to [`AnyPolicy`], chosen at runtime from a [`PolicyKind`].
/// Use [`Cache::with_policy`] to plug in a concrete policy type instead.
pub struct Cache<K, V, P = AnyPolicy<K>> {
    map: FxHashMap<K, Entry<V>>,
    policy: P,
    capacity: usize,
    listener: Option<Box<dyn EvictionListener<K, V>>>,
    #[cfg(feature = "metrics")]
    metrics: CacheMetrics,
}

impl<K, V> Cache<K, V>
where
    K: Eq + Hash + Clone + fmt::Debug,
{
    /// Creates a cache with the given runtime-selected policy.
    ///
    /// Rank-based policies give keys inserted through [`put`](Self::put) the
    /// default rank; see [`CacheBuilder::rank_source`] for other sources.
    pub fn new(capacity: usize, kind: PolicyKind) -> Result<Self, ConfigError> {
        Self::with_rank_source(capacity, kind, RankSource::default())
    }

    pub fn with_rank_source(
        capacity: usize,
        kind: PolicyKind,
        rank_source: RankSource,
    ) -> Result<Self, ConfigError> {
        let policy = AnyPolicy::new(kind, capacity, rank_source)?;
        Ok(Self::with_policy(capacity, policy))
    }

    /// Starts a [`CacheBuilder`].
    pub fn builder(capacity: usize) -> CacheBuilder<K, V> {
        CacheBuilder::new(capacity)
    }
}

impl<K, V, P> Cache<K, V, P>
where
    K: Eq + Hash + Clone + fmt::Debug,
    P: EvictionPolicy<K>,
{
    /// Creates a cache around an already constructed, empty policy.
    pub fn with_policy(capacity: usize, policy: P) -> Self {
        debug_assert!(policy.is_empty(), "policy must start empty");
        debug!(policy = %policy.kind(), capacity, "cache created");
        Self {
            map: FxHashMap::with_capacity_and_hasher(
                capacity.min(PREALLOC_LIMIT),
                Default::default(),
            ),
            policy,
            capacity,
            listener: None,
            #[cfg(feature = "metrics")]
            metrics: CacheMetrics::new(),
        }
    }

    pub(crate) fn set_listener(&mut self, listener: Option<Box<dyn EvictionListener<K, V>>>) {
        self.listener = listener;
    }

    /// Returns the value for `key` and records the access with the policy.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        match self.map.get(key) {
            Some(entry) => {
                self.policy.on_get(entry.handle);
                #[cfg(feature = "metrics")]
                self.metrics.record_get_hit();
                Some(&entry.value)
            },
            None => {
                #[cfg(feature = "metrics")]
                self.metrics.record_get_miss();
                None
            },
        }
    }

    /// Inserts or updates `key`, returning the previous value.
    ///
    /// A new key gets its rank from the policy's rank source (rank-based
    /// policies only). Updating a present key never changes its rank.
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        self.put_inner(key, value, None)
    }

    /// Inserts or updates `key` with an explicit rank.
    ///
    /// For non-ranked policies the rank is ignored and this behaves like
    /// [`put`](Self::put).
    pub fn put_ranked(&mut self, key: K, value: V, rank: Rank) -> Option<V> {
        self.put_inner(key, value, Some(rank))
    }

    fn put_inner(&mut self, key: K, value: V, rank: Option<Rank>) -> Option<V> {
        #[cfg(feature = "metrics")]
        self.metrics.record_insert_call();

        if let Some(entry) = self.map.get_mut(&key) {
            let old = mem::replace(&mut entry.value, value);
            self.policy.on_update(entry.handle, rank);
            #[cfg(feature = "metrics")]
            self.metrics.record_insert_update();
            return Some(old);
        }

        if self.capacity == 0 {
            trace!(key = ?key, "insert dropped by zero-capacity cache");
            #[cfg(feature = "metrics")]
            self.metrics.record_insert_rejected();
            return None;
        }

        if self.map.len() >= self.capacity {
            self.evict_for_insert();
        }

        let handle = self.policy.on_insert(key.clone(), rank);
        self.map.insert(key, Entry { value, handle });
        #[cfg(feature = "metrics")]
        self.metrics.record_insert_new();
        None
    }

    fn evict_for_insert(&mut self) {
        let victim = self
            .policy
            .evict()
            .expect("full cache must have an eviction victim");
        let entry = self
            .map
            .remove(&victim)
            .expect("evicted key must be present in the primary index");
        debug!(
            key = ?victim,
            policy = %self.policy.kind(),
            len = self.map.len(),
            capacity = self.capacity,
            "evicted entry"
        );
        if let Some(listener) = &self.listener {
            listener.on_evict(&victim, &entry.value, EvictionCause::Capacity);
        }
        #[cfg(feature = "metrics")]
        self.metrics.record_evicted_entry();
    }

    /// Removes `key`, returning its value. Removing an absent key is a no-op.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let entry = self.map.remove(key)?;
        let tracked = self
            .policy
            .on_remove(entry.handle)
            .expect("indexed key must be tracked by the policy");
        debug_assert!(&tracked == key, "policy handle resolved to a different key");
        trace!(key = ?key, policy = %self.policy.kind(), "removed entry");
        if let Some(listener) = &self.listener {
            listener.on_evict(key, &entry.value, EvictionCause::Explicit);
        }
        #[cfg(feature = "metrics")]
        self.metrics.record_removal();
        Some(entry.value)
    }

    /// Evicts the current victim as if the cache had overflowed.
    pub fn evict_one(&mut self) -> Option<(K, V)> {
        let victim = self.policy.evict()?;
        let entry = self
            .map
            .remove(&victim)
            .expect("evicted key must be present in the primary index");
        debug!(
            key = ?victim,
            policy = %self.policy.kind(),
            len = self.map.len(),
            "evicted entry on request"
        );
        if let Some(listener) = &self.listener {
            listener.on_evict(&victim, &entry.value, EvictionCause::Explicit);
        }
        #[cfg(feature = "metrics")]
        self.metrics.record_evicted_entry();
        Some((victim, entry.value))
    }

    /// Returns the value for `key` without touching eviction order.
    pub fn peek(&self, key: &K) -> Option<&V> {
        #[cfg(feature = "metrics")]
        self.metrics.record_peek_call();
        let value = self.map.get(key).map(|entry| &entry.value);
        #[cfg(feature = "metrics")]
        if value.is_some() {
            self.metrics.record_peek_found();
        }
        value
    }

    pub fn contains(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    /// The key the next overflowing `put` would evict.
    pub fn peek_victim(&self) -> Option<&K> {
        self.policy.peek_victim()
    }

    /// Access frequency of `key` under LFU; `None` for other policies.
    pub fn frequency(&self, key: &K) -> Option<u64> {
        let entry = self.map.get(key)?;
        self.policy.frequency(entry.handle)
    }

    /// Rank of `key` under a rank-based policy; `None` otherwise.
    pub fn rank(&self, key: &K) -> Option<Rank> {
        let entry = self.map.get(key)?;
        self.policy.rank(entry.handle)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of non-empty frequency or rank buckets (LRU: 1 when non-empty).
    pub fn bucket_count(&self) -> usize {
        self.policy.bucket_count()
    }

    pub fn policy_kind(&self) -> PolicyKind {
        self.policy.kind()
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Drops every entry. The eviction listener is not called.
    pub fn clear(&mut self) {
        trace!(len = self.map.len(), policy = %self.policy.kind(), "cleared cache");
        self.map.clear();
        self.policy.clear();
        #[cfg(feature = "metrics")]
        self.metrics.record_clear();
    }

    /// Iterates entries in arbitrary order without touching eviction order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.map.iter().map(|(key, entry)| (key, &entry.value))
    }

    /// Verifies the primary index and the policy agree.
    ///
    /// Checks that both hold the same number of keys, that the capacity bound
    /// holds, that every indexed handle resolves to the same key inside the
    /// policy, and finally the policy's own bucket invariants.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        if self.map.len() > self.capacity {
            return Err(InvariantError::new(format!(
                "cache holds {} entries over capacity {}",
                self.map.len(),
                self.capacity
            )));
        }
        if self.map.len() != self.policy.len() {
            return Err(InvariantError::new(format!(
                "primary index holds {} keys but the policy tracks {}",
                self.map.len(),
                self.policy.len()
            )));
        }
        for (key, entry) in &self.map {
            match self.policy.key(entry.handle) {
                Some(tracked) if tracked == key => {},
                Some(tracked) => {
                    return Err(InvariantError::new(format!(
                        "key {key:?} points at a policy node holding {tracked:?}"
                    )));
                },
                None => {
                    return Err(InvariantError::new(format!(
                        "key {key:?} points at a vacant policy node"
                    )));
                },
            }
        }
        self.policy.check_invariants()
    }

    #[cfg(feature = "metrics")]
    pub fn metrics_snapshot(&self) -> CacheMetricsSnapshot {
        self.metrics.snapshot(self.map.len(), self.capacity)
    }

    #[cfg(feature = "metrics")]
    pub fn reset_metrics(&mut self) {
        self.metrics.reset_metrics();
    }
}

#[cfg(feature = "metrics")]
impl<K, V, P> MetricsSnapshotProvider<CacheMetricsSnapshot> for Cache<K, V, P>
where
    K: Eq + Hash + Clone + fmt::Debug,
    P: EvictionPolicy<K>,
{
    fn snapshot(&self) -> CacheMetricsSnapshot {
        self.metrics_snapshot()
    }
}

impl<K, V, P> fmt::Debug for Cache<K, V, P>
where
    P: EvictionPolicy<K>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cache")
            .field("policy", &self.policy.kind())
            .field("len", &self.map.len())
            .field("capacity", &self.capacity)
            .field("listener", &self.listener.is_some())
            .finish_non_exhaustive()
    }
}

impl<K, V, P> CoreCache<K, V> for Cache<K, V, P>
where
    K: Eq + Hash + Clone + fmt::Debug,
    P: EvictionPolicy<K>,
{
    fn insert(&mut self, key: K, value: V) -> Option<V> {
        Cache::put(self, key, value)
    }

    fn get(&mut self, key: &K) -> Option<&V> {
        Cache::get(self, key)
    }

    fn contains(&self, key: &K) -> bool {
        Cache::contains(self, key)
    }

    fn len(&self) -> usize {
        Cache::len(self)
    }

    fn capacity(&self) -> usize {
        Cache::capacity(self)
    }

    fn clear(&mut self) {
        Cache::clear(self)
    }
}

impl<K, V, P> MutableCache<K, V> for Cache<K, V, P>
where
    K: Eq + Hash + Clone + fmt::Debug,
    P: EvictionPolicy<K>,
{
    fn remove(&mut self, key: &K) -> Option<V> {
        Cache::remove(self, key)
    }
}
