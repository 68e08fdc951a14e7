//! Adaptive bitset for skewed item frequencies.
//!
//! Switches between two representations:
//! - `FxHashSet<u32>` for low-cardinality sets (< [`PROMOTION_THRESHOLD`])
//! - `RoaringBitmap` for high-cardinality sets
//!
//! | Operation | Small (HashSet) | Large (Roaring) |
//! |-----------|-----------------|-----------------|
//! | Add       | O(1) amortized  | O(log n)        |
//! | Intersect | O(min(n, m))    | O(n + m) blocks |
//! | Memory    | ~24 bytes/tx    | ~2-4 bytes/tx   |
//!
//! Intersections can only shrink a set, so results below the threshold are
//! demoted back to the small representation.

use roaring::RoaringBitmap;
use rustc_hash::FxHashSet;

use super::Bitset;

/// Cardinality at which a small set is promoted to Roaring.
pub const PROMOTION_THRESHOLD: usize = 1000;

/// Hybrid bitset that picks its representation from its cardinality.
#[derive(Debug, Clone)]
pub enum AdaptiveBitset {
    /// Hash set of indices (fast for < 1000 transactions).
    Small(FxHashSet<u32>),
    /// Roaring bitmap (compact for ≥ 1000 transactions).
    Large(RoaringBitmap),
}

impl Default for AdaptiveBitset {
    fn default() -> Self {
        Self::Small(FxHashSet::default())
    }
}

impl AdaptiveBitset {
    /// Returns true if this is the Roaring representation.
    #[must_use]
    pub fn is_large(&self) -> bool {
        matches!(self, AdaptiveBitset::Large(_))
    }

    /// Returns true if `index` is present.
    #[must_use]
    pub fn contains(&self, index: u32) -> bool {
        match self {
            AdaptiveBitset::Small(set) => set.contains(&index),
            AdaptiveBitset::Large(bitmap) => bitmap.contains(index),
        }
    }

    fn promote_to_large(&mut self) {
        if let AdaptiveBitset::Small(set) = self {
            let bitmap: RoaringBitmap = set.iter().copied().collect();
            *self = AdaptiveBitset::Large(bitmap);
        }
    }

    fn from_roaring(bitmap: RoaringBitmap) -> Self {
        if (bitmap.len() as usize) < PROMOTION_THRESHOLD {
            AdaptiveBitset::Small(bitmap.iter().collect())
        } else {
            AdaptiveBitset::Large(bitmap)
        }
    }
}

impl Bitset for AdaptiveBitset {
    const NAME: &'static str = "adaptive";

    fn create() -> Self {
        Self::default()
    }

    fn add(&mut self, index: u32) -> bool {
        match self {
            AdaptiveBitset::Small(set) => {
                let inserted = set.insert(index);
                if set.len() >= PROMOTION_THRESHOLD {
                    self.promote_to_large();
                }
                inserted
            }
            AdaptiveBitset::Large(bitmap) => bitmap.insert(index),
        }
    }

    fn intersect(&self, other: &Self) -> Self {
        match (self, other) {
            (AdaptiveBitset::Large(a), AdaptiveBitset::Large(b)) => Self::from_roaring(a & b),
            // Probe the small side against the other one
            (AdaptiveBitset::Small(set), rest) | (rest, AdaptiveBitset::Small(set)) => {
                AdaptiveBitset::Small(
                    set.iter()
                        .copied()
                        .filter(|&index| rest.contains(index))
                        .collect(),
                )
            }
        }
    }

    fn cardinality(&self) -> u64 {
        match self {
            AdaptiveBitset::Small(set) => set.len() as u64,
            AdaptiveBitset::Large(bitmap) => bitmap.len(),
        }
    }

    fn to_vec(&self) -> Vec<u32> {
        match self {
            AdaptiveBitset::Small(set) => {
                let mut out: Vec<u32> = set.iter().copied().collect();
                out.sort_unstable();
                out
            }
            AdaptiveBitset::Large(bitmap) => bitmap.iter().collect(),
        }
    }
}
