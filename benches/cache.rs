//! Throughput of the sharded cache under single-threaded store/retrieve.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use fieldnotes::cache::{KeyValueCache, ShardedCache};

fn bench_store(c: &mut Criterion) {
    let cache: ShardedCache<u64, u64> = ShardedCache::new();
    c.bench_function("cache_store", |b| {
        b.iter(|| cache.store(black_box(5), black_box(5)));
    });
}

fn bench_retrieve(c: &mut Criterion) {
    let cache: ShardedCache<u64, u64> = ShardedCache::new();
    cache.store(5, 5);
    c.bench_function("cache_retrieve", |b| {
        b.iter(|| cache.retrieve(black_box(&5)));
    });
}

criterion_group!(benches, bench_store, bench_retrieve);
criterion_main!(benches);
