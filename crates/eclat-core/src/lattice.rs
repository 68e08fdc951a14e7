//! Itemset lattice (prefix tree).
//!
//! Every node is one frequent itemset: the item introduced at the node plus
//! the items on the path from the virtual root to its parent. Siblings are
//! kept in ascending item order and every child item is strictly greater
//! than its parent item, so each itemset appears exactly once.
//!
//! Nodes live in an arena and refer to each other by [`NodeId`]. Children are
//! owned through the arena; `parent` is a plain index used to rebuild a
//! node's itemset. The lattice only grows: nodes are never removed or
//! mutated after insertion, and all bitsets are released together when the
//! tree is dropped.

mod accumulator;

pub use accumulator::{FrequentItemset, Itemsets, LatticeSummary, Preorder};

use crate::bitset::{Bitset, ItemBitset};
use crate::error::Result;
use crate::vertical::BitsetBag;

/// Index of a node inside an [`ItemTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// One itemset of the lattice.
#[derive(Debug, Clone)]
pub struct ItemNode<B> {
    item: u32,
    depth: usize,
    bitset: ItemBitset<B>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl<B: Bitset> ItemNode<B> {
    /// Item introduced at this node.
    #[must_use]
    pub fn item(&self) -> u32 {
        self.item
    }

    /// Itemset length; singletons have depth 1.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Support count of the itemset.
    #[must_use]
    pub fn support(&self) -> u64 {
        self.bitset.cardinality()
    }

    /// Transactions containing the itemset.
    #[must_use]
    pub fn bitset(&self) -> &ItemBitset<B> {
        &self.bitset
    }

    /// Parent node, `None` at the singleton level.
    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Extensions of this itemset, ascending by item.
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// A node without extensions is a maximal itemset.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Prefix tree of frequent itemsets.
#[derive(Debug, Clone)]
pub struct ItemTree<B> {
    nodes: Vec<ItemNode<B>>,
    roots: Vec<NodeId>,
    min_support: Option<u64>,
}

impl<B: Bitset> Default for ItemTree<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: Bitset> ItemTree<B> {
    /// Creates an empty lattice.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            roots: Vec::new(),
            min_support: None,
        }
    }

    /// Builds the singleton level from a bitset bag.
    ///
    /// Items whose support reaches `min_support` move their bitset into a new
    /// node; the bitsets of the other items are released immediately.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::AllocationFailure`] if a node cannot be
    /// allocated. The partial tree and the rest of the bag are dropped.
    pub fn from_bag(bag: BitsetBag<B>, min_support: u64) -> Result<Self> {
        let mut tree = Self::new();
        tree.min_support = Some(min_support);
        let mut infrequent = 0usize;
        for (item, bitset) in bag.into_items() {
            if bitset.cardinality() >= min_support {
                tree.insert(None, item, bitset)?;
            } else {
                infrequent += 1;
                drop(bitset);
            }
        }
        tracing::debug!(
            frequent = tree.roots.len(),
            infrequent,
            min_support,
            "singleton level built"
        );
        Ok(tree)
    }

    /// Inserts a node under `parent` (or at the singleton level for `None`),
    /// keeping the sibling list sorted by item.
    ///
    /// The caller guarantees that no sibling already carries `item`, and that
    /// `item` is greater than the parent item.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::AllocationFailure`] if the arena or the sibling
    /// list cannot grow. `bitset` is released in that case.
    ///
    /// # Panics
    ///
    /// Panics if `parent` does not belong to this tree.
    pub fn insert(
        &mut self,
        parent: Option<NodeId>,
        item: u32,
        bitset: ItemBitset<B>,
    ) -> Result<NodeId> {
        let depth = parent.map_or(1, |p| self.nodes[p.0].depth + 1);
        debug_assert!(parent.map_or(true, |p| self.nodes[p.0].item < item));

        let siblings = match parent {
            Some(p) => &self.nodes[p.0].children,
            None => &self.roots,
        };
        // Items usually arrive in ascending order, so try the tail first
        let pos = match siblings.last() {
            None => 0,
            Some(&last) if self.nodes[last.0].item < item => siblings.len(),
            Some(_) => {
                let pos = siblings
                    .iter()
                    .position(|&id| self.nodes[id.0].item >= item)
                    .unwrap_or(siblings.len());
                debug_assert!(siblings
                    .get(pos)
                    .map_or(true, |&id| self.nodes[id.0].item != item));
                pos
            }
        };

        self.nodes.try_reserve(1)?;
        let id = NodeId(self.nodes.len());
        let siblings = match parent {
            Some(p) => &mut self.nodes[p.0].children,
            None => &mut self.roots,
        };
        siblings.try_reserve(1)?;
        siblings.insert(pos, id);
        self.nodes.push(ItemNode {
            item,
            depth,
            bitset,
            parent,
            children: Vec::new(),
        });
        Ok(id)
    }

    /// Minimum support the singleton level was filtered with, `None` for a
    /// lattice assembled by hand with [`ItemTree::insert`].
    #[must_use]
    pub fn min_support(&self) -> Option<u64> {
        self.min_support
    }

    /// Returns true once any singleton has been extended.
    #[must_use]
    pub fn is_expanded(&self) -> bool {
        self.roots.iter().any(|&id| !self.nodes[id.0].is_leaf())
    }

    /// Singleton level, ascending by item.
    #[must_use]
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Node behind `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this tree.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &ItemNode<B> {
        &self.nodes[id.0]
    }

    /// Node behind `id`, if it belongs to this tree.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&ItemNode<B>> {
        self.nodes.get(id.0)
    }

    /// Children of `id`, ascending by item.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Full itemset of `id`, ascending.
    #[must_use]
    pub fn itemset(&self, id: NodeId) -> Vec<u32> {
        let mut items = Vec::with_capacity(self.nodes[id.0].depth);
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let node = &self.nodes[current.0];
            items.push(node.item);
            cursor = node.parent;
        }
        items.reverse();
        items
    }

    /// Number of nodes allocated so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if no item reached the minimum support.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}
