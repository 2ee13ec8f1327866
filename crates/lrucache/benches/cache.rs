use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use lrucache::BoundedCache;

fn bench_cached_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("cached_get");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    for size in [100u64, 10_000] {
        group.bench_with_input(BenchmarkId::new("hit", size), &size, |b, &size| {
            let cache = BoundedCache::new(size as usize);
            for key in 0..size {
                cache.get_or_insert(key, || vec![b'x'; 64]);
            }

            // Hits cost the same whatever the key's recency rank
            let mut counter = 0u64;
            b.iter(|| {
                black_box(cache.get(&(counter % size)));
                counter += 1;
            });
        });
    }

    group.finish();
}

fn bench_eviction_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("eviction");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    group.bench_function("insert_full_cache", |b| {
        let cache = BoundedCache::new(1000);
        for key in 0..1000u64 {
            cache.get_or_insert(key, || key);
        }

        // Every key is new, so every call evicts
        let mut counter = 1000u64;
        b.iter(|| {
            black_box(cache.get_or_insert(counter, || counter));
            counter += 1;
        });
    });

    group.finish();
}

fn bench_mixed_50_50(c: &mut Criterion) {
    let mut group = c.benchmark_group("mixed");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    group.bench_function("50_hit_50_miss", |b| {
        let cache = BoundedCache::new(100);
        for key in 0..100u64 {
            cache.get_or_insert(key, || key);
        }

        let mut counter = 0u64;
        b.iter(|| {
            let key = if counter % 2 == 0 {
                counter % 100
            } else {
                counter + 1_000
            };
            black_box(cache.get_or_insert(key, || key));
            counter += 1;
        });
    });

    group.finish();
}

fn bench_resize(c: &mut Criterion) {
    let mut group = c.benchmark_group("resize");
    group.sample_size(20);

    group.bench_function("shrink_grow_1000", |b| {
        let cache = BoundedCache::new(1000);
        b.iter(|| {
            for key in 0..1000u64 {
                cache.get_or_insert(key, || key);
            }
            cache.set_capacity(10).unwrap();
            cache.set_capacity(1000).unwrap();
            black_box(cache.count());
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_cached_get,
    bench_eviction_insert,
    bench_mixed_50_50,
    bench_resize
);
criterion_main!(benches);
