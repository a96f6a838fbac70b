#![allow(
    missing_docs,
    clippy::missing_docs_in_private_items,
    clippy::unwrap_used,
    clippy::similar_names
)]
use std::collections::HashMap;

use chainmap::ChainedHashMap;
use criterion::{Criterion, criterion_group, criterion_main};
use proptest::{
    collection::vec,
    prelude::{Strategy, any},
    strategy::ValueTree,
    test_runner::TestRunner,
};

const ITEMS_AMOUNT: usize = 1000;
const SAMPLE_SIZE: usize = 10;

fn hash_map_benches(c: &mut Criterion) {
    let mut runner = TestRunner::default();
    let items = vec(any::<(String, String)>(), ITEMS_AMOUNT)
        .new_tree(&mut runner)
        .unwrap()
        .current();

    let mut group = c.benchmark_group("Hash map comparison benchmark");
    group.sample_size(SAMPLE_SIZE);
    group.bench_function("chained insert", |b| {
        b.iter(|| {
            let mut chained_map = ChainedHashMap::new();
            for (key, value) in items.clone() {
                chained_map.insert(key, value);
            }
            chained_map
        });
    });
    group.bench_function("rust std insert", |b| {
        b.iter(|| {
            let mut rust_map = HashMap::new();
            for (key, value) in items.clone() {
                rust_map.insert(key, value);
            }
            rust_map
        });
    });

    let chained_map: ChainedHashMap<String, String> = items.iter().cloned().collect();
    let rust_map: HashMap<String, String> = items.iter().cloned().collect();
    group.bench_function("chained get", |b| {
        b.iter(|| {
            for (key, _) in &items {
                let _ = chained_map.get(key);
            }
        });
    });
    group.bench_function("rust std get", |b| {
        b.iter(|| {
            for (key, _) in &items {
                let _ = rust_map.get(key);
            }
        });
    });
    group.bench_function("chained erase", |b| {
        b.iter(|| {
            let mut drained = chained_map.clone();
            for (key, _) in &items {
                drained.erase(key);
            }
            drained
        });
    });
    group.finish();
}

criterion_group!(benches, hash_map_benches);

criterion_main!(benches);
