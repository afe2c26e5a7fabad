//! Hit/miss/eviction counters for [`Cache`](crate::cache::Cache).
//!
//! Recording and reading are split the same way as the cache traits:
//! the engine writes through [`traits::CoreMetricsRecorder`] and
//! [`traits::CoreMetricsReadRecorder`], callers read a
//! [`snapshot::CacheMetricsSnapshot`] through
//! [`traits::MetricsSnapshotProvider`].

pub mod cell;
pub mod metrics_impl;
pub mod snapshot;
pub mod traits;

pub use metrics_impl::CacheMetrics;
pub use snapshot::CacheMetricsSnapshot;
pub use traits::{CoreMetricsReadRecorder, CoreMetricsRecorder, MetricsReset, MetricsSnapshotProvider};
