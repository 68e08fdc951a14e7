//! Vertical index: one bitset of transaction indices per item.
//!
//! Built in a single pass over every (transaction, item) pair. The bag owns
//! its bitsets until [`BitsetBag::into_lattice`] hands them to the lattice.

use crate::bitset::{Bitset, ItemBitset};
use crate::error::Result;
use crate::lattice::ItemTree;
use crate::transaction::TransactionSet;

/// Per-item bitsets for the item universe `[0, item_max]`.
#[derive(Debug, Clone)]
pub struct BitsetBag<B> {
    bitsets: Vec<ItemBitset<B>>,
    transactions: usize,
}

impl<B: Bitset> BitsetBag<B> {
    /// Builds the vertical representation, consuming the transactions.
    ///
    /// Identifiers that never occur get an empty bitset.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::AllocationFailure`] if the bitset array cannot be
    /// reserved. Nothing built so far outlives the error.
    pub fn build(transactions: TransactionSet) -> Result<Self> {
        let universe = transactions.universe();
        let mut bitsets: Vec<ItemBitset<B>> = Vec::new();
        bitsets.try_reserve_exact(universe)?;
        bitsets.resize_with(universe, ItemBitset::empty);

        for (tid, items) in transactions.iter().enumerate() {
            // TransactionSet guarantees tid fits in u32
            let tid = tid as u32;
            for &item in items {
                bitsets[item as usize].add(tid);
            }
        }

        tracing::debug!(
            backend = B::NAME,
            items = universe,
            transactions = transactions.len(),
            "vertical index built"
        );

        Ok(Self {
            bitsets,
            transactions: transactions.len(),
        })
    }

    /// Number of item bitsets (`item_max + 1`).
    #[must_use]
    pub fn len(&self) -> usize {
        self.bitsets.len()
    }

    /// Returns true if the bag holds no item.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bitsets.is_empty()
    }

    /// Number of transactions the bag was built from.
    #[must_use]
    pub fn transactions(&self) -> usize {
        self.transactions
    }

    /// Bitset of `item`, if it is inside the universe.
    #[must_use]
    pub fn get(&self, item: u32) -> Option<&ItemBitset<B>> {
        self.bitsets.get(item as usize)
    }

    /// Raw support count of every item, indexed by item identifier.
    #[must_use]
    pub fn supports(&self) -> Vec<u64> {
        self.bitsets.iter().map(ItemBitset::cardinality).collect()
    }

    /// Moves the bitsets into a new lattice holding the frequent singletons.
    ///
    /// # Errors
    ///
    /// See [`ItemTree::from_bag`].
    pub fn into_lattice(self, min_support: u64) -> Result<ItemTree<B>> {
        ItemTree::from_bag(self, min_support)
    }

    /// Consumes the bag, yielding `(item, bitset)` in ascending item order.
    pub(crate) fn into_items(self) -> impl Iterator<Item = (u32, ItemBitset<B>)> {
        self.bitsets
            .into_iter()
            .enumerate()
            .map(|(item, bitset)| (item as u32, bitset))
    }
}
