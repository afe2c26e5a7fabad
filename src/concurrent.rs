//! Thread-safe cache handle.
//!
//! ```text
//!   ┌──────────────────────────────────────────────┐
//!   │ ConcurrentCache<K, V>   (Clone: shares inner) │
//!   │   Arc<RwLock<Cache<K, V>>>                    │
//!   └──────────────────────────────────────────────┘
//!
//!   write lock: get, put, put_ranked, remove, evict_one, clear
//!   read lock:  peek, contains, len, capacity, frequency, rank, ...
//! ```
//!
//! `get` takes the write lock because every hit updates the policy's
//! ordering. Each call is one critical section, so no caller ever observes a
//! half-applied eviction. `get` and `peek` return values by clone and are the
//! only methods that need `V: Clone`.

use std::hash::Hash;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::cache::Cache;
use crate::ds::Rank;
use crate::error::{ConfigError, InvariantError};
#[cfg(feature = "metrics")]
use crate::metrics::{CacheMetricsSnapshot, MetricsSnapshotProvider};
use crate::policy::PolicyKind;

/// A cloneable, lock-protected [`Cache`].
///
/// # Example
///
/// ```
/// use std::thread;
///
/// use flexcache::concurrent::ConcurrentCache;
/// use flexcache::policy::PolicyKind;
///
/// let cache: ConcurrentCache<u32, String> = ConcurrentCache::new(100, PolicyKind::Lfu).unwrap();
///
/// let handles: Vec<_> = (0..4)
///     .map(|t| {
///         let cache = cache.clone();
///         thread::spawn(move || {
///             for i in 0..10 {
///                 cache.put(t * 10 + i, format!("v{i}"));
///             }
///         })
///     })
///     .collect();
/// for handle in handles {
///     handle.join().unwrap();
/// }
///
/// assert_eq!(cache.len(), 40);
/// assert_eq!(cache.get(&11), Some("v1".to_string()));
/// ```
pub struct ConcurrentCache<K, V> {
    inner: Arc<RwLock<Cache<K, V>>>,
}

impl<K, V> Clone for ConcurrentCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V> ConcurrentCache<K, V>
where
    K: Eq + Hash + Clone + std::fmt::Debug,
{
    pub fn new(capacity: usize, kind: PolicyKind) -> Result<Self, ConfigError> {
        Cache::new(capacity, kind).map(Self::from_cache)
    }

    /// Wraps an existing cache.
    pub fn from_cache(cache: Cache<K, V>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(cache)),
        }
    }

    pub fn put(&self, key: K, value: V) -> Option<V> {
        let mut cache = self.inner.write();
        cache.put(key, value)
    }

    pub fn put_ranked(&self, key: K, value: V, rank: Rank) -> Option<V> {
        let mut cache = self.inner.write();
        cache.put_ranked(key, value, rank)
    }

    pub fn remove(&self, key: &K) -> Option<V> {
        let mut cache = self.inner.write();
        cache.remove(key)
    }

    pub fn evict_one(&self) -> Option<(K, V)> {
        let mut cache = self.inner.write();
        cache.evict_one()
    }

    pub fn clear(&self) {
        let mut cache = self.inner.write();
        cache.clear();
    }

    pub fn contains(&self, key: &K) -> bool {
        self.inner.read().contains(key)
    }

    pub fn peek_victim(&self) -> Option<K> {
        self.inner.read().peek_victim().cloned()
    }

    pub fn frequency(&self, key: &K) -> Option<u64> {
        self.inner.read().frequency(key)
    }

    pub fn rank(&self, key: &K) -> Option<Rank> {
        self.inner.read().rank(key)
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.inner.read().capacity()
    }

    pub fn bucket_count(&self) -> usize {
        self.inner.read().bucket_count()
    }

    pub fn policy_kind(&self) -> PolicyKind {
        self.inner.read().policy_kind()
    }

    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.inner.read().check_invariants()
    }

    /// Runs `f` with exclusive access to the underlying cache.
    ///
    /// Use this to compose several operations into one critical section.
    pub fn with_cache<R>(&self, f: impl FnOnce(&mut Cache<K, V>) -> R) -> R {
        let mut cache = self.inner.write();
        f(&mut cache)
    }
}

impl<K, V> ConcurrentCache<K, V>
where
    K: Eq + Hash + Clone + std::fmt::Debug,
    V: Clone,
{
    /// Looks up `key`, counting as an access, and returns a clone of the value.
    pub fn get(&self, key: &K) -> Option<V> {
        let mut cache = self.inner.write();
        cache.get(key).cloned()
    }

    /// Like [`get`](Self::get) but leaves eviction order untouched.
    pub fn peek(&self, key: &K) -> Option<V> {
        let cache = self.inner.read();
        cache.peek(key).cloned()
    }
}

#[cfg(feature = "metrics")]
impl<K, V> ConcurrentCache<K, V>
where
    K: Eq + Hash + Clone + std::fmt::Debug,
{
    pub fn metrics_snapshot(&self) -> CacheMetricsSnapshot {
        self.inner.read().metrics_snapshot()
    }
}

#[cfg(feature = "metrics")]
impl<K, V> MetricsSnapshotProvider<CacheMetricsSnapshot> for ConcurrentCache<K, V>
where
    K: Eq + Hash + Clone + std::fmt::Debug,
{
    fn snapshot(&self) -> CacheMetricsSnapshot {
        self.metrics_snapshot()
    }
}

impl<K, V> std::fmt::Debug for ConcurrentCache<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConcurrentCache").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;
    use crate::builder::CacheBuilder;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn handle_is_send_and_sync() {
        assert_send_sync::<ConcurrentCache<u64, String>>();
    }

    #[test]
    fn clones_share_state() {
        let a: ConcurrentCache<u32, u32> = ConcurrentCache::new(2, PolicyKind::Lru).unwrap();
        let b = a.clone();
        a.put(1, 10);
        assert_eq!(b.get(&1), Some(10));
        b.put(2, 20);
        a.put(3, 30);
        assert!(!b.contains(&1));
        assert_eq!(a.peek_victim(), Some(2));
        assert_eq!(a.len(), 2);
    }

    #[test]
    fn ranked_operations_through_lock() {
        let cache: ConcurrentCache<&str, u8> =
            ConcurrentCache::new(2, PolicyKind::RankBased).unwrap();
        cache.put_ranked("a", 1, 5);
        cache.put_ranked("b", 2, 1);
        cache.put_ranked("c", 3, 3);
        assert_eq!(cache.rank(&"a"), Some(5));
        assert!(!cache.contains(&"b"));
        assert_eq!(cache.evict_one(), Some(("c", 3)));
        assert_eq!(cache.remove(&"a"), Some(1));
        assert!(cache.is_empty());
        assert_eq!(cache.bucket_count(), 0);
    }

    #[test]
    fn parallel_puts_respect_capacity() {
        let cache: ConcurrentCache<u64, u64> = CacheBuilder::new(64)
            .policy(PolicyKind::Lfu)
            .build_concurrent()
            .unwrap();

        let workers: Vec<_> = (0..8u64)
            .map(|t| {
                let cache = cache.clone();
                thread::spawn(move || {
                    for i in 0..500u64 {
                        let key = (t * 31 + i) % 200;
                        cache.put(key, i);
                        cache.get(&(key / 2));
                        if i % 7 == 0 {
                            cache.remove(&key);
                        }
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }

        assert!(cache.len() <= cache.capacity());
        cache.check_invariants().unwrap();
    }

    #[test]
    fn non_clone_values_are_supported() {
        #[derive(Debug, PartialEq)]
        struct Blob(Vec<u8>);

        let cache: ConcurrentCache<u8, Blob> = CacheBuilder::new(2)
            .policy(PolicyKind::RankBasedLru)
            .build_concurrent()
            .unwrap();
        cache.put_ranked(1, Blob(vec![1]), 3);
        cache.put_ranked(2, Blob(vec![2]), 1);
        cache.put_ranked(3, Blob(vec![3]), 2);

        assert!(!cache.contains(&2));
        assert_eq!(cache.with_cache(|c| c.get(&1).map(|b| b.0.len())), Some(1));
        assert_eq!(cache.evict_one(), Some((3, Blob(vec![3]))));
        assert_eq!(cache.remove(&1), Some(Blob(vec![1])));
        assert!(cache.is_empty());
        cache.check_invariants().unwrap();
    }

    #[test]
    fn with_cache_groups_operations() {
        let cache: ConcurrentCache<u8, u8> = ConcurrentCache::new(4, PolicyKind::Lfu).unwrap();
        let freq = cache.with_cache(|c| {
            c.put(1, 1);
            c.get(&1);
            c.frequency(&1)
        });
        assert_eq!(freq, Some(2));
        assert_eq!(cache.frequency(&1), Some(2));
        assert_eq!(cache.peek(&1), Some(1));
        cache.clear();
        assert_eq!(cache.policy_kind(), PolicyKind::Lfu);
        assert!(format!("{cache:?}").starts_with("ConcurrentCache"));
    }
}
