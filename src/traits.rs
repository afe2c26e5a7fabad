//! # Cache and Policy Traits
//!
//! Two layers of traits: the key/value surface every cache exposes, and the
//! seam between the cache engine and an eviction policy.
//!
//! ## Architecture
//!
//! ```text
//!   ┌─────────────────────────────────────────┐
//!   │            CoreCache<K, V>              │
//!   │  insert(&mut, K, V) → Option<V>         │
//!   │  get(&mut, &K) → Option<&V>             │
//!   │  contains(&, &K) → bool                 │
//!   │  len / is_empty / capacity / clear      │
//!   └──────────────────┬──────────────────────┘
//!                      │
//!                      ▼
//!   ┌─────────────────────────────────────────┐
//!   │           MutableCache<K, V>            │
//!   │  remove(&K) → Option<V>                 │
//!   │  remove_batch(&[K])                     │
//!   └─────────────────────────────────────────┘
//!
//!   Engine ⇄ policy seam:
//!
//!   ┌──────────────────────┐   on_insert / on_get   ┌──────────────────────┐
//!   │  Cache<K, V, P>      │ ─────────────────────► │ EvictionPolicy<K>    │
//!   │  key → (V, SlotId)   │   on_update/on_remove  │ owns its node arena  │
//!   │                      │ ◄───────────────────── │ evict() → victim key │
//!   └──────────────────────┘                        └──────────────────────┘
//! ```
//!
//! The engine owns the primary index and the values. A policy owns only the
//! ordering: it stores a copy of each key in its own arena and hands back a
//! [`SlotId`] that stays valid until the engine removes the entry. The engine
//! keeps that handle next to the value, so every notification is O(1) (or
//! O(log R) for rank buckets) without a second hash lookup.
//!
//! ## Trait Summary
//!
//! | Trait               | Extends     | Purpose                            |
//! |---------------------|-------------|------------------------------------|
//! | `CoreCache`         | -           | Universal cache operations         |
//! | `MutableCache`      | `CoreCache` | Adds arbitrary key removal         |
//! | `EvictionPolicy`    | -           | Victim selection behind the engine |

use crate::ds::{Rank, SlotId};
use crate::error::InvariantError;
use crate::policy::PolicyKind;

/// Core cache operations shared by every cache in this crate.
///
/// # Example
///
/// ```
/// use flexcache::cache::Cache;
/// use flexcache::policy::PolicyKind;
/// use flexcache::traits::CoreCache;
///
/// fn warm<C: CoreCache<u64, String>>(cache: &mut C, items: &[(u64, &str)]) {
///     for (key, value) in items {
///         cache.insert(*key, value.to_string());
///     }
/// }
///
/// let mut cache = Cache::new(8, PolicyKind::Lfu).unwrap();
/// warm(&mut cache, &[(1, "one"), (2, "two")]);
/// assert_eq!(CoreCache::len(&cache), 2);
/// ```
pub trait CoreCache<K, V> {
    /// Inserts a key-value pair, returning the previous value if it existed.
    ///
    /// If the cache is at capacity, the policy's victim is evicted first.
    fn insert(&mut self, key: K, value: V) -> Option<V>;

    /// Gets a reference to a value by key, notifying the policy of the access.
    ///
    /// Use [`contains`](Self::contains) to test membership without affecting
    /// eviction order.
    fn get(&mut self, key: &K) -> Option<&V>;

    /// Checks if a key exists without updating access state.
    fn contains(&self, key: &K) -> bool;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn capacity(&self) -> usize;

    /// Removes all entries from the cache.
    fn clear(&mut self);
}

/// Caches that support arbitrary key-based removal.
///
/// # Example
///
/// ```
/// use flexcache::cache::Cache;
/// use flexcache::policy::PolicyKind;
/// use flexcache::traits::{CoreCache, MutableCache};
///
/// let mut cache = Cache::new(4, PolicyKind::Lru).unwrap();
/// CoreCache::insert(&mut cache, 1, "one");
/// CoreCache::insert(&mut cache, 2, "two");
///
/// let removed = cache.remove_batch(&[1, 99]);
/// assert_eq!(removed, vec![Some("one"), None]);
/// assert!(!CoreCache::contains(&cache, &1));
/// ```
pub trait MutableCache<K, V>: CoreCache<K, V> {
    /// Removes a key, returning its value. Absent keys return `None`.
    fn remove(&mut self, key: &K) -> Option<V>;

    /// Removes multiple keys, returning results in input order.
    fn remove_batch(&mut self, keys: &[K]) -> Vec<Option<V>> {
        keys.iter().map(|k| self.remove(k)).collect()
    }
}

/// Victim selection strategy driven by the cache engine.
///
/// The engine calls exactly one notification per operation:
///
/// | Engine operation         | Notification                  |
/// |--------------------------|-------------------------------|
/// | `put` of a new key       | [`on_insert`](Self::on_insert) |
/// | `put` of a present key   | [`on_update`](Self::on_update) |
/// | `get` hit                | [`on_get`](Self::on_get)       |
/// | `remove` of a present key| [`on_remove`](Self::on_remove) |
/// | overflowing `put`        | [`evict`](Self::evict)         |
///
/// Handles passed back in are always ones this policy returned from
/// `on_insert` and has not yet released through `on_remove` or `evict`.
pub trait EvictionPolicy<K> {
    fn kind(&self) -> PolicyKind;

    /// Number of keys tracked.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Starts tracking `key`. `rank` is the caller-supplied rank, if any;
    /// policies without ranks ignore it.
    fn on_insert(&mut self, key: K, rank: Option<Rank>) -> SlotId;

    /// Records a read hit.
    fn on_get(&mut self, handle: SlotId);

    /// Records a write hit on a present key.
    fn on_update(&mut self, handle: SlotId, rank: Option<Rank>);

    /// Stops tracking the entry and returns its key.
    fn on_remove(&mut self, handle: SlotId) -> Option<K>;

    /// The key [`evict`](Self::evict) would return next.
    fn peek_victim(&self) -> Option<&K>;

    /// Removes and returns the current victim; `None` only when empty.
    fn evict(&mut self) -> Option<K>;

    fn clear(&mut self);

    /// Key stored under `handle`.
    fn key(&self, handle: SlotId) -> Option<&K>;

    /// Access frequency for frequency-ordered policies.
    fn frequency(&self, _handle: SlotId) -> Option<u64> {
        None
    }

    /// Rank for rank-ordered policies.
    fn rank(&self, _handle: SlotId) -> Option<Rank> {
        None
    }

    /// Number of non-empty ordering buckets.
    fn bucket_count(&self) -> usize;

    fn check_invariants(&self) -> Result<(), InvariantError>;
}
