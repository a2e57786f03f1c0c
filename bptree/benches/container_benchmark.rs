use bptree::{BPlusTreeMap, Container};
use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;

const SIZE: usize = 10_000;

/// Every key in `0..SIZE`, shuffled.
fn dense_keys() -> Vec<u64> {
    let mut keys: Vec<u64> = (0..SIZE as u64).collect();
    keys.shuffle(&mut StdRng::seed_from_u64(1));
    keys
}

/// `SIZE` random keys from a space much larger than `SIZE`, duplicates included.
fn sparse_keys() -> Vec<u64> {
    let mut rng = StdRng::seed_from_u64(2);
    (0..SIZE).map(|_| rng.gen_range(0..SIZE as u64 * 100)).collect()
}

fn filled<C: Container<u64, u64>>(mut container: C, keys: &[u64]) -> C {
    for &key in keys {
        container.insert(key, key);
    }
    container
}

fn bench_workload<C, F>(c: &mut Criterion, workload: &str, keys: &[u64], name: &str, make: F)
where
    C: Container<u64, u64>,
    F: Fn() -> C + Copy,
{
    let mut group = c.benchmark_group(format!("{}_{}", workload, name));

    group.bench_function(BenchmarkId::new("insert", SIZE), |b| {
        b.iter_batched(
            make,
            |container| black_box(filled(container, keys)),
            BatchSize::LargeInput,
        )
    });

    let full = filled(make(), keys);
    group.bench_function(BenchmarkId::new("search", SIZE), |b| {
        b.iter(|| {
            for key in keys {
                black_box(full.search(key));
            }
        })
    });

    group.bench_function(BenchmarkId::new("delete", SIZE), |b| {
        b.iter_batched(
            || filled(make(), keys),
            |mut container| {
                for key in keys {
                    black_box(container.delete(key));
                }
                container
            },
            BatchSize::LargeInput,
        )
    });

    group.finish();
}

fn container_benchmark(c: &mut Criterion) {
    for (workload, keys) in [("dense", dense_keys()), ("sparse", sparse_keys())] {
        for order in [16, 64, 128] {
            let name = format!("bptree_order_{}", order);
            bench_workload(c, workload, &keys, &name, move || {
                BPlusTreeMap::<u64, u64>::new(order).unwrap()
            });
        }
        bench_workload(c, workload, &keys, "std_btreemap", BTreeMap::<u64, u64>::new);
    }
}

criterion_group!(benches, container_benchmark);
criterion_main!(benches);
