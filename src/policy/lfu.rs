//! # Least Frequently Used (LFU) policy
//!
//! Keys live in [`FrequencyBuckets`]: one recency list per access frequency
//! plus an exact `min_freq`. The victim is the least recently touched key of
//! the lowest frequency.
//!
//! ```text
//!   min_freq = 1
//!       │
//!       ▼
//!   freq 1: [d] ◄──► [b]       ◄── victim: b
//!   freq 3: [a]
//!   freq 7: [c] ◄──► [e]
//! ```
//!
//! ## Notifications
//!
//! | Notification | Effect                                          |
//! |--------------|-------------------------------------------------|
//! | `on_insert`  | frequency 1, front of bucket 1, `min_freq = 1`  |
//! | `on_get`     | frequency + 1, front of the next bucket         |
//! | `on_update`  | same as `on_get` (a write counts as an access)  |
//! | `on_remove`  | unlink; empty bucket dropped, `min_freq` follows |
//! | `evict`      | tail of the `min_freq` bucket                   |
//!
//! Every operation is O(1). Frequencies saturate at `u64::MAX`.
//!
//! ## Example
//!
//! ```
//! use flexcache::cache::Cache;
//! use flexcache::policy::PolicyKind;
//!
//! let mut cache = Cache::new(2, PolicyKind::Lfu).unwrap();
//! cache.put("a", 1);
//! cache.put("b", 2);
//! cache.get(&"a");
//! cache.get(&"a");
//! cache.put("c", 3);
//!
//! assert!(cache.contains(&"a"));
//! assert!(!cache.contains(&"b"));
//! assert_eq!(cache.frequency(&"a"), Some(3));
//! ```

use crate::ds::{FrequencyBuckets, Rank, SlotId};
use crate::error::InvariantError;
use crate::policy::PolicyKind;
use crate::traits::EvictionPolicy;

/// Frequency-ordered eviction with LRU tie-breaking.
#[derive(Debug)]
pub struct LfuPolicy<K> {
    buckets: FrequencyBuckets<K>,
}

impl<K> LfuPolicy<K> {
    pub fn new() -> Self {
        Self {
            buckets: FrequencyBuckets::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buckets: FrequencyBuckets::with_capacity(capacity),
        }
    }

    /// Lowest frequency currently held; `None` when empty.
    pub fn min_frequency(&self) -> Option<u64> {
        self.buckets.min_freq()
    }

    /// Number of keys at exactly `freq`.
    pub fn bucket_len(&self, freq: u64) -> usize {
        self.buckets.bucket_len(freq)
    }
}

impl<K> Default for LfuPolicy<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> EvictionPolicy<K> for LfuPolicy<K> {
    fn kind(&self) -> PolicyKind {
        PolicyKind::Lfu
    }

    fn len(&self) -> usize {
        self.buckets.len()
    }

    fn on_insert(&mut self, key: K, _rank: Option<Rank>) -> SlotId {
        self.buckets.insert(key)
    }

    #[inline]
    fn on_get(&mut self, handle: SlotId) {
        self.buckets.touch(handle);
    }

    #[inline]
    fn on_update(&mut self, handle: SlotId, _rank: Option<Rank>) {
        self.buckets.touch(handle);
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

    fn frequency(&self, handle: SlotId) -> Option<u64> {
        self.buckets.frequency(handle)
    }

    fn bucket_count(&self) -> usize {
        self.buckets.bucket_count()
    }

    fn check_invariants(&self) -> Result<(), InvariantError> {
        self.buckets.check_invariants()
    }
}
