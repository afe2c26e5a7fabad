// ==============================================
// CONCURRENT CACHE HAMMER TESTS (integration)
// ==============================================
//
// Many threads hitting one ConcurrentCache with a mixed workload. After the
// threads join, the index and the policy must still agree and the capacity
// bound must hold.

#![cfg(feature = "concurrency")]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use flexcache::builder::CacheBuilder;
use flexcache::concurrent::ConcurrentCache;
use flexcache::listener::EvictionCause;
use flexcache::policy::{PolicyKind, RankSource};

const THREADS: u64 = 8;
const OPS_PER_THREAD: u64 = 2_000;

fn hammer(cache: &ConcurrentCache<u64, u64>) {
    let handles: Vec<_> = (0..THREADS)
        .map(|thread_id| {
            let cache = cache.clone();
            thread::spawn(move || {
                for i in 0..OPS_PER_THREAD {
                    let key = (thread_id * 7919 + i * 31) % 512;
                    match i % 6 {
                        0 | 1 => {
                            cache.put(key, i);
                        },
                        2 => {
                            cache.put_ranked(key, i, (i % 5) as i64);
                        },
                        3 => {
                            cache.get(&key);
                        },
                        4 => {
                            cache.remove(&key);
                        },
                        _ => {
                            cache.peek(&key);
                        },
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("worker thread panicked");
    }
}

#[test]
fn every_policy_survives_contention() {
    for kind in PolicyKind::ALL {
        let cache: ConcurrentCache<u64, u64> = CacheBuilder::new(100)
            .policy(kind)
            .rank_source(RankSource::seeded(1, 10, 3))
            .build_concurrent()
            .unwrap();

        hammer(&cache);

        assert!(cache.len() <= 100, "{kind}: len {} over capacity", cache.len());
        cache.check_invariants().unwrap();
    }
}

#[test]
fn listener_sees_every_departure() {
    let evictions = Arc::new(AtomicUsize::new(0));
    let removals = Arc::new(AtomicUsize::new(0));
    let (ev, rm) = (Arc::clone(&evictions), Arc::clone(&removals));

    let cache: ConcurrentCache<u64, u64> = CacheBuilder::new(32)
        .policy(PolicyKind::Lfu)
        .eviction_listener(move |_: &u64, _: &u64, cause: EvictionCause| match cause {
            EvictionCause::Capacity => {
                ev.fetch_add(1, Ordering::Relaxed);
            },
            EvictionCause::Explicit => {
                rm.fetch_add(1, Ordering::Relaxed);
            },
        })
        .build_concurrent()
        .unwrap();

    let handles: Vec<_> = (0..THREADS)
        .map(|thread_id| {
            let cache = cache.clone();
            thread::spawn(move || {
                let mut inserted = 0usize;
                let mut removed = 0usize;
                for i in 0..500u64 {
                    let key = thread_id * 1_000 + i;
                    if cache.put(key, i).is_none() {
                        inserted += 1;
                    }
                    if i % 4 == 0 && cache.remove(&key).is_some() {
                        removed += 1;
                    }
                }
                (inserted, removed)
            })
        })
        .collect();

    let mut inserted = 0;
    let mut removed = 0;
    for handle in handles {
        let (i, r) = handle.join().unwrap();
        inserted += i;
        removed += r;
    }

    // every inserted key either is still cached, was evicted, or was removed
    assert_eq!(removals.load(Ordering::Relaxed), removed);
    assert_eq!(
        inserted,
        cache.len() + evictions.load(Ordering::Relaxed) + removed
    );
    cache.check_invariants().unwrap();
}

#[cfg(feature = "metrics")]
#[test]
fn metrics_add_up_under_contention() {
    let cache: ConcurrentCache<u64, u64> = ConcurrentCache::new(64, PolicyKind::Lru).unwrap();
    hammer(&cache);

    let snap = cache.metrics_snapshot();
    assert_eq!(snap.get_calls, snap.get_hits + snap.get_misses);
    assert_eq!(snap.insert_calls, snap.insert_new + snap.insert_updates);
    assert_eq!(
        snap.insert_new,
        snap.cache_len as u64 + snap.evicted_entries + snap.removals
    );
    assert_eq!(snap.peek_calls, THREADS * (OPS_PER_THREAD / 6));
}
