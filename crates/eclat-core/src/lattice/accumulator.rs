//! Read-only queries over a mined lattice.
//!
//! All walks share one convention: singletons have depth 1, their children
//! depth 2, and so on. Traversal is pre-order, left to right, which is also
//! the lexicographic order of the itemsets.

use std::io::{self, Write};

use serde::{Deserialize, Serialize};

use super::{ItemTree, NodeId};
use crate::bitset::Bitset;

/// Pre-order iterator over the nodes of an [`ItemTree`].
pub struct Preorder<'a, B> {
    tree: &'a ItemTree<B>,
    stack: Vec<NodeId>,
}

impl<'a, B: Bitset> Preorder<'a, B> {
    fn new(tree: &'a ItemTree<B>) -> Self {
        Self {
            tree,
            stack: tree.roots.iter().rev().copied().collect(),
        }
    }
}

impl<B: Bitset> Iterator for Preorder<'_, B> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.nodes[id.0].children.iter().rev().copied());
        Some(id)
    }
}

/// A frequent itemset with its support count.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrequentItemset {
    /// Items, ascending.
    pub items: Vec<u32>,
    /// Number of transactions containing every item.
    pub support: u64,
}

/// Iterator over the itemsets of an [`ItemTree`] in lexicographic order.
pub struct Itemsets<'a, B> {
    inner: Preorder<'a, B>,
}

impl<B: Bitset> Iterator for Itemsets<'_, B> {
    type Item = FrequentItemset;

    fn next(&mut self) -> Option<FrequentItemset> {
        let id = self.inner.next()?;
        let tree = self.inner.tree;
        Some(FrequentItemset {
            items: tree.itemset(id),
            support: tree.nodes[id.0].bitset.cardinality(),
        })
    }
}

/// Aggregate statistics of a lattice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatticeSummary {
    /// Number of itemsets.
    pub count: u64,
    /// Number of maximal itemsets (leaves).
    pub count_maximal: u64,
    /// Sum of all itemset lengths.
    pub length_sum: u64,
    /// Sum of maximal itemset lengths.
    pub maximal_length_sum: u64,
}

impl LatticeSummary {
    /// Mean itemset length, 0.0 for an empty lattice.
    #[must_use]
    pub fn avg_length(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.length_sum as f64 / self.count as f64
    }

    /// Mean maximal itemset length, 0.0 for an empty lattice.
    #[must_use]
    pub fn avg_maximal_length(&self) -> f64 {
        if self.count_maximal == 0 {
            return 0.0;
        }
        self.maximal_length_sum as f64 / self.count_maximal as f64
    }
}

impl<B: Bitset> ItemTree<B> {
    /// Visits every node in pre-order.
    #[must_use]
    pub fn preorder(&self) -> Preorder<'_, B> {
        Preorder::new(self)
    }

    /// Every frequent itemset, lexicographically ordered.
    #[must_use]
    pub fn itemsets(&self) -> Itemsets<'_, B> {
        Itemsets {
            inner: self.preorder(),
        }
    }

    /// Total number of itemsets.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.preorder().count() as u64
    }

    /// Number of maximal itemsets (nodes without children).
    #[must_use]
    pub fn count_maximal(&self) -> u64 {
        self.preorder()
            .filter(|id| self.nodes[id.0].children.is_empty())
            .count() as u64
    }

    /// Sum of the depths of all nodes.
    #[must_use]
    pub fn length_sum(&self) -> u64 {
        self.preorder()
            .map(|id| self.nodes[id.0].depth as u64)
            .sum()
    }

    /// Sum of the depths of the leaves.
    #[must_use]
    pub fn maximal_length_sum(&self) -> u64 {
        self.preorder()
            .map(|id| &self.nodes[id.0])
            .filter(|node| node.children.is_empty())
            .map(|node| node.depth as u64)
            .sum()
    }

    /// All four counters in a single walk.
    #[must_use]
    pub fn summary(&self) -> LatticeSummary {
        self.preorder()
            .map(|id| &self.nodes[id.0])
            .fold(LatticeSummary::default(), |mut acc, node| {
                let depth = node.depth as u64;
                acc.count += 1;
                acc.length_sum += depth;
                if node.children.is_empty() {
                    acc.count_maximal += 1;
                    acc.maximal_length_sum += depth;
                }
                acc
            })
    }

    /// Writes one line per itemset, indented by depth: `item (support)`.
    ///
    /// # Errors
    ///
    /// Propagates write errors.
    pub fn write_tree<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for id in self.preorder() {
            let node = &self.nodes[id.0];
            writeln!(
                out,
                "{:indent$}{} ({})",
                "",
                node.item,
                node.bitset.cardinality(),
                indent = node.depth - 1
            )?;
        }
        Ok(())
    }
}
