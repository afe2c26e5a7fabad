//! Walks through each eviction policy with debug logging on.
//!
//! Run with `RUST_LOG=flexcache=debug` to see the engine's own eviction
//! events next to the listener output.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use flexcache::builder::CacheBuilder;
use flexcache::listener::EvictionCause;
use flexcache::policy::{PolicyKind, RankSource};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    println!("flexcache eviction walkthrough");
    println!("==============================\n");

    for kind in PolicyKind::ALL {
        let evicted = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&evicted);

        let mut cache = CacheBuilder::new(3)
            .policy(kind)
            .eviction_listener(move |key: &&'static str, value: &u32, cause: EvictionCause| {
                counter.fetch_add(1, Ordering::Relaxed);
                println!("  [{kind}] {key} = {value} left the cache ({cause:?})");
            })
            .build()?;

        println!("{kind}:");
        cache.put_ranked("alpha", 1, 3);
        cache.put_ranked("beta", 2, 1);
        cache.put_ranked("gamma", 3, 2);

        // alpha gets a second access, beta stays cold
        cache.get(&"alpha");
        cache.get(&"gamma");
        cache.get(&"alpha");

        cache.put_ranked("delta", 4, 2);
        cache.put_ranked("epsilon", 5, 4);
        cache.remove(&"delta");

        let mut left: Vec<_> = cache.iter().map(|(k, _)| *k).collect();
        left.sort_unstable();
        info!(policy = %kind, remaining = ?left, evictions = evicted.load(Ordering::Relaxed), "done");
        println!("  remaining: {left:?}\n");
    }

    // Random ranks drawn from [0, 100) with a fixed seed.
    let mut cache = CacheBuilder::new(4)
        .policy(PolicyKind::RankBasedLru)
        .rank_source(RankSource::seeded(0, 100, 2024))
        .build()?;
    for key in 0..8u32 {
        cache.put(key, key * 10);
    }
    let mut ranks: Vec<_> = cache
        .iter()
        .map(|(k, _)| (*k, cache.rank(k).unwrap_or_default()))
        .collect();
    ranks.sort_unstable_by_key(|&(_, rank)| rank);
    println!("random ranks, lowest first: {ranks:?}");

    Ok(())
}
