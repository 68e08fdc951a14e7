//! Mining throughput per bitset backend.
//!
//! # Usage
//!
//! ```bash
//! cargo bench --bench eclat_benchmark -- --noplot
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::{Rng, SeedableRng};

use eclat_core::{
    eclat, AdaptiveBitset, Bitset, BitsetBag, DenseBitset, RoaringBitmap, TransactionSet,
};

const ITEMS: u32 = 64;
const MIN_SUPPORT: f64 = 0.05;

/// Skewed market-basket data: low item ids are much more frequent.
fn generate_transactions(count: usize, seed: u64) -> Vec<Vec<u32>> {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let len = rng.gen_range(2..12);
            let mut items: Vec<u32> = (0..len)
                .map(|_| {
                    let x: f64 = rng.gen();
                    (x * x * f64::from(ITEMS)) as u32
                })
                .collect();
            items.sort_unstable();
            items.dedup();
            items
        })
        .collect()
}

fn mine<B: Bitset>(transactions: &TransactionSet) -> u64 {
    let min_support = eclat_core::min_support_count(MIN_SUPPORT, transactions.len()).unwrap();
    let mut tree = BitsetBag::<B>::build(transactions.clone())
        .unwrap()
        .into_lattice(min_support)
        .unwrap();
    eclat(&mut tree, min_support).unwrap();
    tree.count()
}

fn bench_mining(c: &mut Criterion) {
    let mut group = c.benchmark_group("eclat_mine");
    group.sample_size(10);

    for count in [1_000usize, 10_000] {
        let transactions =
            TransactionSet::from_transactions(generate_transactions(count, 42)).unwrap();

        group.bench_with_input(BenchmarkId::new("roaring", count), &transactions, |b, t| {
            b.iter(|| black_box(mine::<RoaringBitmap>(t)));
        });
        group.bench_with_input(BenchmarkId::new("dense", count), &transactions, |b, t| {
            b.iter(|| black_box(mine::<DenseBitset>(t)));
        });
        group.bench_with_input(BenchmarkId::new("adaptive", count), &transactions, |b, t| {
            b.iter(|| black_box(mine::<AdaptiveBitset>(t)));
        });
    }

    group.finish();
}

fn bench_parse(c: &mut Criterion) {
    let text: String = generate_transactions(10_000, 7)
        .iter()
        .map(|t| {
            let line: Vec<String> = t.iter().map(u32::to_string).collect();
            line.join(" ") + "\n"
        })
        .collect();

    c.bench_function("parse_10k", |b| {
        b.iter(|| TransactionSet::parse(black_box(text.as_bytes()), 1.0).unwrap());
    });
}

criterion_group!(benches, bench_mining, bench_parse);
criterion_main!(benches);
