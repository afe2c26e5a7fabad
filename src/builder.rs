//! Cache configuration and builder.
//!
//! [`CacheConfig`] is the plain-data part (capacity, policy, rank source) and
//! can be embedded in a host's own configuration with the `serde` feature.
//! [`CacheBuilder`] adds the runtime-only pieces such as the eviction
//! listener and produces a [`Cache`] or a
//! [`ConcurrentCache`](crate::concurrent::ConcurrentCache).
//!
//! ## Example
//!
//! ```rust
//! use flexcache::builder::CacheBuilder;
//! use flexcache::policy::{PolicyKind, RankSource};
//!
//! let mut cache = CacheBuilder::new(100)
//!     .policy(PolicyKind::RankBased)
//!     .rank_source(RankSource::seeded(1, 10, 42))
//!     .build()
//!     .unwrap();
//! cache.put(1u64, "hello".to_string());
//! assert!((1..10).contains(&cache.rank(&1).unwrap()));
//! ```

use std::fmt::Debug;
use std::hash::Hash;
use std::marker::PhantomData;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::cache::Cache;
#[cfg(feature = "concurrency")]
use crate::concurrent::ConcurrentCache;
use crate::error::ConfigError;
use crate::listener::{EvictionCause, EvictionListener, FnListener};
use crate::policy::{AnyPolicy, PolicyKind, RankSource};

/// Default capacity of [`CacheConfig::default`].
pub const DEFAULT_CAPACITY: usize = 128;

/// Plain-data cache configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CacheConfig {
    pub capacity: usize,
    pub policy: PolicyKind,
    /// Rank source for keys inserted without an explicit rank. Ignored by
    /// non-ranked policies, but still validated.
    pub rank_source: RankSource,
}

impl CacheConfig {
    pub fn new(capacity: usize, policy: PolicyKind) -> Self {
        Self {
            capacity,
            policy,
            rank_source: RankSource::default(),
        }
    }

    /// Checks the configuration without building anything.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.rank_source.validate()
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY, PolicyKind::default())
    }
}

/// Builder for [`Cache`] and [`ConcurrentCache`](crate::concurrent::ConcurrentCache).
pub struct CacheBuilder<K, V> {
    config: CacheConfig,
    listener: Option<Box<dyn EvictionListener<K, V>>>,
    _marker: PhantomData<fn() -> (K, V)>,
}

impl<K, V> CacheBuilder<K, V> {
    /// Creates a builder with the given capacity and default settings
    /// (LRU, fixed rank 0, no listener).
    pub fn new(capacity: usize) -> Self {
        Self::from_config(CacheConfig {
            capacity,
            ..CacheConfig::default()
        })
    }

    pub fn from_config(config: CacheConfig) -> Self {
        Self {
            config,
            listener: None,
            _marker: PhantomData,
        }
    }

    pub fn policy(mut self, policy: PolicyKind) -> Self {
        self.config.policy = policy;
        self
    }

    pub fn rank_source(mut self, rank_source: RankSource) -> Self {
        self.config.rank_source = rank_source;
        self
    }

    /// Replaces capacity, policy and rank source at once. A listener set
    /// earlier is kept.
    pub fn config(mut self, config: CacheConfig) -> Self {
        self.config = config;
        self
    }

    /// Registers a closure called for every capacity eviction, `remove` of a
    /// present key and `evict_one`.
    pub fn eviction_listener<F>(mut self, f: F) -> Self
    where
        F: Fn(&K, &V, EvictionCause) + Send + Sync + 'static,
    {
        self.listener = Some(Box::new(FnListener(f)));
        self
    }

    /// Registers an eviction listener via the [`EvictionListener`] trait.
    pub fn eviction_listener_impl<L>(mut self, listener: L) -> Self
    where
        L: EvictionListener<K, V> + 'static,
    {
        self.listener = Some(Box::new(listener));
        self
    }

    pub fn current_config(&self) -> &CacheConfig {
        &self.config
    }
}

impl<K, V> CacheBuilder<K, V>
where
    K: Eq + Hash + Clone + Debug,
{
    /// Validates the configuration and builds a single-threaded cache.
    pub fn build(self) -> Result<Cache<K, V>, ConfigError> {
        self.config.validate()?;
        let CacheConfig {
            capacity,
            policy,
            rank_source,
        } = self.config;
        let policy = AnyPolicy::new(policy, capacity, rank_source)?;
        let mut cache = Cache::with_policy(capacity, policy);
        cache.set_listener(self.listener);
        Ok(cache)
    }

    /// Builds a cache behind a shared read-write lock.
    #[cfg(feature = "concurrency")]
    pub fn build_concurrent(self) -> Result<ConcurrentCache<K, V>, ConfigError> {
        self.build().map(ConcurrentCache::from_cache)
    }
}

impl<K, V> Debug for CacheBuilder<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheBuilder")
            .field("config", &self.config)
            .field("listener", &self.listener.is_some())
            .finish()
    }
}
