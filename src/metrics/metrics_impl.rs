use crate::metrics::cell::MetricsCell;
use crate::metrics::snapshot::CacheMetricsSnapshot;
use crate::metrics::traits::{CoreMetricsReadRecorder, CoreMetricsRecorder, MetricsReset};

#[derive(Debug, Default)]
pub struct CacheMetrics {
    pub get_calls: u64,
    pub get_hits: u64,
    pub get_misses: u64,
    pub insert_calls: u64,
    pub insert_updates: u64,
    pub insert_new: u64,
    pub insert_rejected: u64,
    pub evicted_entries: u64,
    pub removals: u64,
    pub clears: u64,
    pub peek_calls: MetricsCell,
    pub peek_found: MetricsCell,
}

impl CacheMetrics {
    pub fn new() -> CacheMetrics {
        Self::default()
    }

    /// Copies the counters and attaches the given gauges.
    pub fn snapshot(&self, cache_len: usize, capacity: usize) -> CacheMetricsSnapshot {
        CacheMetricsSnapshot {
            get_calls: self.get_calls,
            get_hits: self.get_hits,
            get_misses: self.get_misses,
            insert_calls: self.insert_calls,
            insert_updates: self.insert_updates,
            insert_new: self.insert_new,
            insert_rejected: self.insert_rejected,
            evicted_entries: self.evicted_entries,
            removals: self.removals,
            clears: self.clears,
            peek_calls: self.peek_calls.get(),
            peek_found: self.peek_found.get(),
            cache_len,
            capacity,
        }
    }
}

impl CoreMetricsRecorder for CacheMetrics {
    fn record_get_hit(&mut self) {
        self.get_calls += 1;
        self.get_hits += 1;
    }

    fn record_get_miss(&mut self) {
        self.get_calls += 1;
        self.get_misses += 1;
    }

    fn record_insert_call(&mut self) {
        self.insert_calls += 1;
    }

    fn record_insert_new(&mut self) {
        self.insert_new += 1;
    }

    fn record_insert_update(&mut self) {
        self.insert_updates += 1;
    }

    fn record_insert_rejected(&mut self) {
        self.insert_rejected += 1;
    }

    fn record_evicted_entry(&mut self) {
        self.evicted_entries += 1;
    }

    fn record_removal(&mut self) {
        self.removals += 1;
    }

    fn record_clear(&mut self) {
        self.clears += 1;
    }
}

impl CoreMetricsReadRecorder for CacheMetrics {
    fn record_peek_call(&self) {
        self.peek_calls.incr();
    }

    fn record_peek_found(&self) {
        self.peek_found.incr();
    }
}

impl MetricsReset for CacheMetrics {
    fn reset_metrics(&mut self) {
        self.get_calls = 0;
        self.get_hits = 0;
        self.get_misses = 0;
        self.insert_calls = 0;
        self.insert_updates = 0;
        self.insert_new = 0;
        self.insert_rejected = 0;
        self.evicted_entries = 0;
        self.removals = 0;
        self.clears = 0;
        self.peek_calls.reset();
        self.peek_found.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recorders_feed_snapshot() {
        let mut metrics = CacheMetrics::new();
        metrics.record_get_hit();
        metrics.record_get_miss();
        metrics.record_insert_call();
        metrics.record_insert_new();
        metrics.record_evicted_entry();
        metrics.record_peek_call();

        let snap = metrics.snapshot(3, 10);
        assert_eq!(snap.get_calls, 2);
        assert_eq!(snap.get_hits, 1);
        assert_eq!(snap.get_misses, 1);
        assert_eq!(snap.insert_new, 1);
        assert_eq!(snap.evicted_entries, 1);
        assert_eq!(snap.peek_calls, 1);
        assert_eq!(snap.peek_found, 0);
        assert_eq!((snap.cache_len, snap.capacity), (3, 10));
    }

    #[test]
    fn reset_zeroes_counters() {
        let mut metrics = CacheMetrics::new();
        metrics.record_removal();
        metrics.record_clear();
        metrics.record_peek_found();
        metrics.reset_metrics();
        assert_eq!(metrics.snapshot(0, 0), CacheMetricsSnapshot::default());
    }
}
