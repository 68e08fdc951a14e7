//! Eclat lattice expansion.
//!
//! For every singleton `a` (left to right), the miner intersects the bitset
//! of the current prefix with the bitset of each singleton to the right of
//! the last item added. Intersections below the minimum support are dropped
//! on the spot; the others become children of the prefix and are expanded
//! recursively with the singletons to the right of the candidate that
//! produced them. Each itemset is therefore generated once, in lexicographic
//! order, and the tree shape itself encodes the prefix equivalence classes.
//!
//! ```rust
//! use eclat_core::{eclat, BitsetBag, RoaringBitmap, TransactionSet};
//!
//! let transactions =
//!     TransactionSet::from_transactions(vec![vec![0, 1], vec![0, 1, 2], vec![1, 2], vec![0, 2]])?;
//! let bag = BitsetBag::<RoaringBitmap>::build(transactions)?;
//! let mut tree = bag.into_lattice(2)?;
//! eclat(&mut tree, 2)?;
//!
//! assert_eq!(tree.count(), 6);
//! # Ok::<(), eclat_core::Error>(())
//! ```

use std::time::Duration;

use crate::bitset::Bitset;
use crate::error::{Error, Result};
use crate::guardrails::{MiningContext, MiningLimits};
use crate::lattice::{ItemTree, NodeId};

/// Hook for observing the search as it runs.
///
/// Passed explicitly to [`EclatMiner::mine_with`]; the miner holds no global
/// state. `depth` is the length of the itemset being tested.
pub trait MiningObserver {
    /// A frequent extension was inserted into the lattice.
    fn on_extension(&mut self, _depth: usize, _item: u32, _support: u64) {}

    /// An extension fell below the minimum support and was discarded.
    fn on_prune(&mut self, _depth: usize, _item: u32, _support: u64) {}

    /// The subtree of a singleton is complete.
    fn on_root_done(&mut self, _item: u32) {}
}

/// Observer that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl MiningObserver for NoopObserver {}

/// Observer forwarding events to `tracing` at TRACE level, and singleton
/// completion at DEBUG level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl MiningObserver for TracingObserver {
    fn on_extension(&mut self, depth: usize, item: u32, support: u64) {
        tracing::trace!(depth, item, support, "extension kept");
    }

    fn on_prune(&mut self, depth: usize, item: u32, support: u64) {
        tracing::trace!(depth, item, support, "extension pruned");
    }

    fn on_root_done(&mut self, item: u32) {
        tracing::debug!(item, "singleton expanded");
    }
}

/// Counters of one mining run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MiningStats {
    /// Bitset intersections computed.
    pub intersections: u64,
    /// Intersections discarded for lack of support.
    pub pruned: u64,
    /// Itemsets added below the singleton level.
    pub extensions: u64,
    /// Wall-clock duration of the expansion.
    pub elapsed: Duration,
}

/// Eclat search with a fixed minimum support.
#[derive(Debug, Clone)]
pub struct EclatMiner {
    min_support: u64,
    limits: MiningLimits,
}

struct Run<'o> {
    ctx: MiningContext,
    observer: &'o mut dyn MiningObserver,
    stats: MiningStats,
}

impl EclatMiner {
    /// Creates a miner for an absolute minimum support count.
    #[must_use]
    pub fn new(min_support: u64) -> Self {
        Self {
            min_support,
            limits: MiningLimits::default(),
        }
    }

    /// Replaces the guard rails.
    #[must_use]
    pub fn with_limits(mut self, limits: MiningLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Minimum support count.
    #[must_use]
    pub fn min_support(&self) -> u64 {
        self.min_support
    }

    /// Expands `tree`, whose singleton level must already be filtered with
    /// the same minimum support.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidLattice`] when `tree` was built with a
    /// different minimum support or already holds extensions,
    /// [`crate::Error::LimitExceeded`] when a guard rail trips and
    /// [`crate::Error::AllocationFailure`] when the lattice cannot grow. The
    /// tree keeps every node inserted before the failure.
    pub fn mine<B: Bitset>(&self, tree: &mut ItemTree<B>) -> Result<MiningStats> {
        self.mine_with(tree, &mut NoopObserver)
    }

    /// Like [`EclatMiner::mine`], reporting every step to `observer`.
    ///
    /// # Errors
    ///
    /// See [`EclatMiner::mine`].
    pub fn mine_with<B: Bitset>(
        &self,
        tree: &mut ItemTree<B>,
        observer: &mut dyn MiningObserver,
    ) -> Result<MiningStats> {
        if let Some(built) = tree.min_support() {
            if built != self.min_support {
                return Err(Error::InvalidLattice(format!(
                    "singletons filtered with minimum support {built}, miner uses {}",
                    self.min_support
                )));
            }
        }
        if tree.is_expanded() {
            return Err(Error::InvalidLattice("already expanded".to_string()));
        }

        let roots: Vec<NodeId> = tree.roots().to_vec();
        let mut run = Run {
            ctx: MiningContext::new(self.limits.clone(), roots.len()),
            observer,
            stats: MiningStats::default(),
        };

        for (i, &root) in roots.iter().enumerate() {
            run.ctx.check_timeout()?;
            self.expand(tree, root, &roots[i + 1..], 2, &mut run)?;
            run.observer.on_root_done(tree.node(root).item());
        }

        run.stats.elapsed = run.ctx.elapsed();
        Ok(run.stats)
    }

    /// Extends `prefix` with each candidate singleton in turn.
    fn expand<B: Bitset>(
        &self,
        tree: &mut ItemTree<B>,
        prefix: NodeId,
        candidates: &[NodeId],
        depth: usize,
        run: &mut Run<'_>,
    ) -> Result<()> {
        for (i, &candidate) in candidates.iter().enumerate() {
            let candidate_node = tree.node(candidate);
            let item = candidate_node.item();
            let intersection = tree.node(prefix).bitset().intersect(candidate_node.bitset());
            let support = intersection.cardinality();
            run.stats.intersections += 1;

            if support < self.min_support {
                run.stats.pruned += 1;
                run.observer.on_prune(depth, item, support);
                continue;
            }

            run.ctx.check_depth(depth)?;
            run.ctx.record_itemset()?;
            let child = tree.insert(Some(prefix), item, intersection)?;
            run.stats.extensions += 1;
            run.observer.on_extension(depth, item, support);

            self.expand(tree, child, &candidates[i + 1..], depth + 1, run)?;
        }
        Ok(())
    }
}

/// Expands `tree` with default limits. See [`EclatMiner::mine`].
///
/// # Errors
///
/// See [`EclatMiner::mine`].
pub fn eclat<B: Bitset>(tree: &mut ItemTree<B>, min_support: u64) -> Result<MiningStats> {
    EclatMiner::new(min_support).mine(tree)
}
