//! Error types for the flexcache library.
//!
//! ## Key Components
//!
//! - [`ConfigError`]: Returned when a cache cannot be built from the requested
//!   configuration (unsupported policy name, empty rank range).
//! - [`InvariantError`]: Returned by `check_invariants` methods when the
//!   primary index and the policy's buckets disagree.
//!
//! Looking up or removing an absent key is not an error; those operations
//! return `Option`.
//!
//! ## Example Usage
//!
//! ```
//! use flexcache::error::ConfigError;
//! use flexcache::policy::PolicyKind;
//!
//! let kind: Result<PolicyKind, ConfigError> = "lfu".parse();
//! assert_eq!(kind, Ok(PolicyKind::Lfu));
//!
//! let bad: Result<PolicyKind, ConfigError> = "arc".parse();
//! assert!(bad.unwrap_err().message().contains("unsupported eviction policy"));
//! ```

use std::fmt;

// ---------------------------------------------------------------------------
// InvariantError
// ---------------------------------------------------------------------------

/// Error returned when internal cache invariants are violated.
///
/// Produced by [`Cache::check_invariants`](crate::cache::Cache::check_invariants)
/// and the per-structure checks it delegates to. Carries a human-readable
/// description of which invariant failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantError(String);

impl InvariantError {
    /// Creates a new `InvariantError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for InvariantError {}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Error returned when cache configuration parameters are invalid.
///
/// Produced by [`PolicyKind::from_str`](crate::policy::PolicyKind), by
/// [`CacheConfig::validate`](crate::builder::CacheConfig::validate) and by the
/// builder's `build()` methods. The cache is never constructed.
///
/// # Example
///
/// ```
/// use flexcache::builder::CacheBuilder;
/// use flexcache::policy::{PolicyKind, RankSource};
///
/// let err = CacheBuilder::<u64, u64>::new(8)
///     .policy(PolicyKind::RankBased)
///     .rank_source(RankSource::uniform(5, 5))
///     .build()
///     .unwrap_err();
/// assert!(err.to_string().contains("rank range"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError(String);

impl ConfigError {
    /// Creates a new `ConfigError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
