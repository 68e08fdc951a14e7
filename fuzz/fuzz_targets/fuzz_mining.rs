//! Fuzz target for the whole mining pipeline.
//!
//! Small structured databases are mined with every backend; the lattices must
//! agree and every reported support must be exact.

#![no_main]

use arbitrary::Arbitrary;
use eclat_core::{
    mine_transactions, AdaptiveBitset, Bitset, DenseBitset, FrequentItemset, MiningConfig,
    MiningLimits, RoaringBitmap, TransactionSet,
};
use libfuzzer_sys::fuzz_target;

/// Keeps the search space small enough for brute-force checks.
const MAX_ITEM: u8 = 15;
const MAX_TRANSACTIONS: usize = 64;

#[derive(Debug, Arbitrary)]
struct Input {
    min_support_permille: u16,
    transactions: Vec<Vec<u8>>,
}

fn mine<B: Bitset>(set: &TransactionSet, min_support: f64) -> Vec<FrequentItemset> {
    let config = MiningConfig {
        min_support,
        ..MiningConfig::default()
    };
    let limits = MiningLimits::new().with_max_itemsets(100_000);
    match mine_transactions::<B>(set.clone(), &config, &limits) {
        Ok(outcome) => outcome.tree.itemsets().collect(),
        Err(_) => Vec::new(),
    }
}

fuzz_target!(|input: Input| {
    let transactions: Vec<Vec<u32>> = input
        .transactions
        .into_iter()
        .take(MAX_TRANSACTIONS)
        .map(|t| t.into_iter().map(|i| u32::from(i % (MAX_ITEM + 1))).collect())
        .collect();
    let min_support = f64::from(input.min_support_permille.max(1)) / 1000.0;
    let Ok(set) = TransactionSet::from_transactions(transactions) else {
        return;
    };

    let roaring = mine::<RoaringBitmap>(&set, min_support);
    assert_eq!(roaring, mine::<DenseBitset>(&set, min_support));
    assert_eq!(roaring, mine::<AdaptiveBitset>(&set, min_support));

    for itemset in &roaring {
        assert!(itemset.items.windows(2).all(|w| w[0] < w[1]));
        let support = set
            .iter()
            .filter(|t| itemset.items.iter().all(|i| t.contains(i)))
            .count() as u64;
        assert_eq!(itemset.support, support);
    }
});
