//! Per-policy throughput benchmarks.
//!
//! Every [`PolicyKind`] runs the same workloads so the groups compare the
//! bookkeeping cost of each eviction strategy:
//! - `get_hit`: warm cache, every lookup hits
//! - `insert_churn`: every insert overflows and evicts
//! - `mixed`: skewed 80/20 key distribution with gets and puts

use std::hint::black_box;
use std::time::Instant;

use criterion::{BatchSize, BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use flexcache::cache::Cache;
use flexcache::policy::{PolicyKind, RankSource};

const CAPACITY: usize = 4096;
const OPS: u64 = 100_000;

fn warm_cache(kind: PolicyKind) -> Cache<u64, u64> {
    let mut cache = Cache::with_rank_source(CAPACITY, kind, RankSource::seeded(0, 16, 7))
        .expect("valid bench configuration");
    for i in 0..CAPACITY as u64 {
        cache.put(i, i);
    }
    cache
}

// =============================================================================
// Get (cache hit)
// =============================================================================

fn bench_get_hit(c: &mut Criterion) {
    let mut group = c.benchmark_group("get_hit");
    group.throughput(Throughput::Elements(OPS));

    for kind in PolicyKind::ALL {
        group.bench_with_input(BenchmarkId::from_parameter(kind), &kind, |b, &kind| {
            b.iter_custom(|iters| {
                let mut cache = warm_cache(kind);
                let start = Instant::now();
                for _ in 0..iters {
                    for i in 0..OPS {
                        let key = i % CAPACITY as u64;
                        black_box(cache.get(&key));
                    }
                }
                start.elapsed()
            })
        });
    }
    group.finish();
}

// =============================================================================
// Insert with eviction
// =============================================================================

fn bench_insert_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert_churn");
    group.throughput(Throughput::Elements(OPS));

    for kind in PolicyKind::ALL {
        group.bench_with_input(BenchmarkId::from_parameter(kind), &kind, |b, &kind| {
            b.iter_batched(
                || warm_cache(kind),
                |mut cache| {
                    for i in 0..OPS {
                        cache.put(black_box(CAPACITY as u64 + i), i);
                    }
                    cache
                },
                BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

// =============================================================================
// Skewed mixed workload
// =============================================================================

fn bench_mixed(c: &mut Criterion) {
    let mut group = c.benchmark_group("mixed");
    group.throughput(Throughput::Elements(OPS));

    let universe = CAPACITY as u64 * 4;
    let hot = CAPACITY as u64 / 5;
    let mut rng = SmallRng::seed_from_u64(42);
    let keys: Vec<u64> = (0..OPS)
        .map(|_| {
            if rng.gen_bool(0.8) {
                rng.gen_range(0..hot)
            } else {
                rng.gen_range(hot..universe)
            }
        })
        .collect();

    for kind in PolicyKind::ALL {
        group.bench_with_input(BenchmarkId::from_parameter(kind), &kind, |b, &kind| {
            b.iter_batched(
                || warm_cache(kind),
                |mut cache| {
                    for (i, &key) in keys.iter().enumerate() {
                        if cache.get(&key).is_none() {
                            cache.put(key, i as u64);
                        }
                    }
                    cache
                },
                BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_get_hit, bench_insert_churn, bench_mixed);
criterion_main!(benches);
