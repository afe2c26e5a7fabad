//! Eviction listener: a callback invoked whenever an entry leaves the cache
//! other than through `clear`.
//!
//! # Example
//! ```
//! use std::sync::{Arc, Mutex};
//!
//! use flexcache::builder::CacheBuilder;
//! use flexcache::listener::EvictionCause;
//! use flexcache::policy::PolicyKind;
//!
//! let log: Arc<Mutex<Vec<(u64, EvictionCause)>>> = Arc::new(Mutex::new(Vec::new()));
//! let log2 = Arc::clone(&log);
//!
//! let mut cache = CacheBuilder::new(2)
//!     .policy(PolicyKind::Lru)
//!     .eviction_listener(move |key: &u64, _val: &u64, cause| {
//!         log2.lock().unwrap().push((*key, cause));
//!     })
//!     .build()
//!     .unwrap();
//!
//! cache.put(1, 10);
//! cache.put(2, 20);
//! cache.put(3, 30); // capacity eviction of 1
//! cache.remove(&2); // explicit removal
//!
//! assert_eq!(
//!     *log.lock().unwrap(),
//!     vec![(1, EvictionCause::Capacity), (2, EvictionCause::Explicit)]
//! );
//! ```

// ---------------------------------------------------------------------------
// EvictionCause
// ---------------------------------------------------------------------------

/// The reason an entry was removed from the cache.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EvictionCause {
    /// Chosen as the victim by the eviction policy while inserting into a
    /// full cache.
    Capacity,
    /// Removed by [`Cache::remove`] or [`Cache::evict_one`].
    ///
    /// [`Cache::remove`]: crate::cache::Cache::remove
    /// [`Cache::evict_one`]: crate::cache::Cache::evict_one
    Explicit,
}

// ---------------------------------------------------------------------------
// EvictionListener trait
// ---------------------------------------------------------------------------

/// A callback invoked each time an entry is evicted or removed.
///
/// The callback runs inline, inside the cache operation that removed the
/// entry. When the cache is wrapped in a
/// [`ConcurrentCache`](crate::concurrent::ConcurrentCache) the write lock is
/// held, so the listener must not call back into that cache.
pub trait EvictionListener<K, V>: Send + Sync {
    fn on_evict(&self, key: &K, value: &V, cause: EvictionCause);
}

/// An [`EvictionListener`] backed by a closure.
///
/// Created via [`CacheBuilder::eviction_listener`](crate::builder::CacheBuilder::eviction_listener).
pub struct FnListener<F>(pub F);

impl<K, V, F> EvictionListener<K, V> for FnListener<F>
where
    F: Fn(&K, &V, EvictionCause) + Send + Sync + 'static,
{
    fn on_evict(&self, key: &K, value: &V, cause: EvictionCause) {
        (self.0)(key, value, cause)
    }
}
