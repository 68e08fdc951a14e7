//! End-to-end mining: transactions → vertical index → singleton level → Eclat.

use crate::bitset::Bitset;
use crate::config::MiningConfig;
use crate::error::Result;
use crate::guardrails::MiningLimits;
use crate::lattice::ItemTree;
use crate::miner::{EclatMiner, MiningObserver, MiningStats, NoopObserver};
use crate::transaction::{min_support_count, TransactionSet};
use crate::vertical::BitsetBag;

/// Result of a complete mining run.
#[derive(Debug)]
pub struct MiningOutcome<B> {
    /// The expanded lattice.
    pub tree: ItemTree<B>,
    /// Absolute minimum support used.
    pub min_support: u64,
    /// Number of transactions mined.
    pub transactions: usize,
    /// Search counters.
    pub stats: MiningStats,
}

/// Mines every frequent itemset of `transactions`.
///
/// `config.min_support` is converted with [`min_support_count`];
/// `config.fraction` is ignored here because it applies while reading.
///
/// # Errors
///
/// Returns [`crate::Error::InvalidSupport`] for a non-positive support,
/// [`crate::Error::AllocationFailure`] or [`crate::Error::LimitExceeded`] when
/// the run is aborted. No partial lattice is returned on error.
pub fn mine_transactions<B: Bitset>(
    transactions: TransactionSet,
    config: &MiningConfig,
    limits: &MiningLimits,
) -> Result<MiningOutcome<B>> {
    mine_transactions_with(transactions, config, limits, &mut NoopObserver)
}

/// Like [`mine_transactions`], reporting search events to `observer`.
///
/// # Errors
///
/// See [`mine_transactions`].
pub fn mine_transactions_with<B: Bitset>(
    transactions: TransactionSet,
    config: &MiningConfig,
    limits: &MiningLimits,
    observer: &mut dyn MiningObserver,
) -> Result<MiningOutcome<B>> {
    let count = transactions.len();
    let min_support = min_support_count(config.min_support, count)?;
    tracing::info!(
        transactions = count,
        min_support_fraction = config.min_support,
        min_support,
        "minimum support computed"
    );

    tracing::info!(backend = B::NAME, "creating bitsets");
    let bag = BitsetBag::<B>::build(transactions)?;

    tracing::info!("mining bitsets");
    let mut tree = bag.into_lattice(min_support)?;
    let stats = EclatMiner::new(min_support)
        .with_limits(limits.clone())
        .mine_with(&mut tree, observer)?;

    tracing::info!(
        itemsets = tree.len(),
        intersections = stats.intersections,
        pruned = stats.pruned,
        elapsed_ms = stats.elapsed.as_millis() as u64,
        "found frequent itemsets"
    );

    Ok(MiningOutcome {
        tree,
        min_support,
        transactions: count,
        stats,
    })
}
