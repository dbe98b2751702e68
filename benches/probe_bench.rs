use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use simd_hash::{Index, Map, Set};

fn bench_map_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("map_insert");
    for size in [1_000u64, 10_000, 100_000] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| {
                let mut m: Map<u64, u64> = Map::new();
                for k in 0..size {
                    m.add(k, k);
                }
                m
            });
        });
    }
    group.finish();
}

fn bench_map_lookup_hit(c: &mut Criterion) {
    let mut group = c.benchmark_group("map_lookup_hit");
    for size in [1_000u64, 10_000, 100_000] {
        let mut m: Map<u64, u64> = Map::new();
        for k in 0..size {
            m.add(k, k);
        }
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| {
                for k in 0..size {
                    criterion::black_box(m.try_get_value(&k));
                }
            });
        });
    }
    group.finish();
}

fn bench_set_add_duplicate(c: &mut Criterion) {
    let mut group = c.benchmark_group("set_add_duplicate");
    for size in [1_000u64, 10_000, 100_000] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| {
                let mut s: Set<u64> = Set::new();
                for k in 0..size {
                    s.add(k);
                }
                for k in 0..size {
                    criterion::black_box(s.add(k));
                }
            });
        });
    }
    group.finish();
}

fn bench_index_add(c: &mut Criterion) {
    let mut group = c.benchmark_group("index_add");
    for size in [1_000u64, 10_000, 100_000] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| {
                let mut idx: Index<u64> = Index::new();
                for k in 0..size {
                    idx.try_add(k);
                }
                idx
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_map_insert,
    bench_map_lookup_hit,
    bench_set_add_duplicate,
    bench_index_add
);
criterion_main!(benches);
