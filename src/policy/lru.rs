//! # Least Recently Used (LRU) policy
//!
//! One recency list over a slot arena. The head is the most recently used
//! key, the tail is the victim.
//!
//! ```text
//!   IntrusiveList<K>
//!
//!   head ──► ┌─────┐ ◄──► ┌─────┐ ◄──► ┌─────┐ ◄── tail
//!    (MRU)   │ "c" │      │ "a" │      │ "b" │    (LRU, evicted next)
//!            └─────┘      └─────┘      └─────┘
//! ```
//!
//! | Notification | Effect                 | Time |
//! |--------------|------------------------|------|
//! | `on_insert`  | push to head           | O(1) |
//! | `on_get`     | move to head           | O(1) |
//! | `on_update`  | move to head           | O(1) |
//! | `on_remove`  | unlink                 | O(1) |
//! | `evict`      | pop tail               | O(1) |
//!
//! Ranks are ignored.

use crate::ds::{IntrusiveList, Rank, SlotId};
use crate::error::InvariantError;
use crate::policy::PolicyKind;
use crate::traits::EvictionPolicy;

/// Recency-ordered eviction.
///
/// # Example
///
/// ```
/// use flexcache::cache::Cache;
/// use flexcache::policy::lru::LruPolicy;
///
/// let mut cache = Cache::with_policy(2, LruPolicy::new());
/// cache.put("a", 1);
/// cache.put("b", 2);
/// cache.get(&"a");
/// cache.put("c", 3);
///
/// assert!(cache.contains(&"a"));
/// assert!(!cache.contains(&"b"));
/// ```
#[derive(Debug)]
pub struct LruPolicy<K> {
    list: IntrusiveList<K>,
}

impl<K> LruPolicy<K> {
    pub fn new() -> Self {
        Self {
            list: IntrusiveList::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            list: IntrusiveList::with_capacity(capacity),
        }
    }

    /// Keys from most to least recently used.
    pub fn iter(&self) -> impl Iterator<Item = &K> {
        self.list.iter()
    }
}

impl<K> Default for LruPolicy<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> EvictionPolicy<K> for LruPolicy<K> {
    fn kind(&self) -> PolicyKind {
        PolicyKind::Lru
    }

    fn len(&self) -> usize {
        self.list.len()
    }

    fn on_insert(&mut self, key: K, _rank: Option<Rank>) -> SlotId {
        self.list.push_front(key)
    }

    #[inline]
    fn on_get(&mut self, handle: SlotId) {
        self.list.move_to_front(handle);
    }

    #[inline]
    fn on_update(&mut self, handle: SlotId, _rank: Option<Rank>) {
        self.list.move_to_front(handle);
    }

    fn on_remove(&mut self, handle: SlotId) -> Option<K> {
        self.list.remove(handle)
    }

    fn peek_victim(&self) -> Option<&K> {
        self.list.back()
    }

    fn evict(&mut self) -> Option<K> {
        self.list.pop_back()
    }

    fn clear(&mut self) {
        self.list.clear();
    }

    fn key(&self, handle: SlotId) -> Option<&K> {
        self.list.get(handle)
    }

    fn bucket_count(&self) -> usize {
        usize::from(!self.list.is_empty())
    }

    fn check_invariants(&self) -> Result<(), InvariantError> {
        self.list.check_invariants()
    }
}
