//! # Metrics Trait Hierarchy
//!
//! Recording, snapshotting and resetting are separate traits so the engine
//! only depends on the recorder, and benches/tests only on the provider.
//!
//! ```text
//!   ┌──────────────────────────────┐    ┌──────────────────────────────┐
//!   │     CoreMetricsRecorder      │    │   CoreMetricsReadRecorder    │
//!   │  get_hit/get_miss/insert_*   │    │  peek_call/peek_found        │
//!   │  evicted/removal/clear       │    │  (&self, interior mutable)   │
//!   └──────────────┬───────────────┘    └──────────────┬───────────────┘
//!                  │                                   │
//!                  └─────────────┬─────────────────────┘
//!                                ▼
//!                        ┌──────────────┐
//!                        │ CacheMetrics │
//!                        └──────┬───────┘
//!                               │ read by
//!                               ▼
//!   ┌──────────────────────────────┐    ┌──────────────────────────────┐
//!   │ MetricsSnapshotProvider<S>   │    │ MetricsReset                 │
//!   └──────────────────────────────┘    └──────────────────────────────┘
//! ```

/// Counters written on the mutating paths of the cache.
pub trait CoreMetricsRecorder {
    fn record_get_hit(&mut self);
    fn record_get_miss(&mut self);
    fn record_insert_call(&mut self);
    fn record_insert_new(&mut self);
    fn record_insert_update(&mut self);
    /// An insert dropped because the cache has zero capacity.
    fn record_insert_rejected(&mut self);
    /// An entry removed by the policy, on overflow or through `evict_one`.
    fn record_evicted_entry(&mut self);
    /// A present key removed through `remove`.
    fn record_removal(&mut self);
    fn record_clear(&mut self);
}

/// Counters written on `&self` paths.
pub trait CoreMetricsReadRecorder {
    fn record_peek_call(&self);
    fn record_peek_found(&self);
}

/// Produces a point-in-time copy of the counters.
pub trait MetricsSnapshotProvider<S> {
    fn snapshot(&self) -> S;
}

/// Zeroes all counters.
pub trait MetricsReset {
    fn reset_metrics(&mut self);
}
