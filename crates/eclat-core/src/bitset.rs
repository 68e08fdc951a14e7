//! Bitset capability contract.
//!
//! The miner only needs five operations from a set of transaction indices:
//! create, add, intersect, cardinality and release. Release is `Drop`, so a
//! bitset is freed exactly once by whoever owns it last.
//!
//! Three backends are provided:
//!
//! | Backend | Storage | Best for |
//! |---------|---------|----------|
//! | [`RoaringBitmap`] | Roaring containers | General purpose (default) |
//! | [`DenseBitset`] | `Vec<u64>` words | Dense items, few transactions |
//! | [`AdaptiveBitset`] | `FxHashSet` then Roaring | Many rare items |

mod adaptive;
mod dense;
mod roaring_backend;

use serde::{Deserialize, Serialize};

pub use adaptive::{AdaptiveBitset, PROMOTION_THRESHOLD};
pub use dense::DenseBitset;
pub use roaring::RoaringBitmap;

/// Set of transaction indices backing one item or itemset.
pub trait Bitset: Sized {
    /// Short backend name used in logs and reports.
    const NAME: &'static str;

    /// Creates a new, empty bitset.
    fn create() -> Self;

    /// Marks `index` present. Returns `true` if it was not present before.
    fn add(&mut self, index: u32) -> bool;

    /// Returns the bitwise AND of `self` and `other` without mutating either.
    #[must_use]
    fn intersect(&self, other: &Self) -> Self;

    /// Population count.
    fn cardinality(&self) -> u64;

    /// Present indices in ascending order.
    fn to_vec(&self) -> Vec<u32>;
}

/// A bitset together with its cached cardinality.
///
/// The cardinality is computed when the value is created and only changes
/// through [`ItemBitset::add`], which counts newly set bits only. It therefore
/// always equals the population count of the bitmap.
#[derive(Debug, Clone)]
pub struct ItemBitset<B> {
    bitmap: B,
    card: u64,
}

impl<B: Bitset> ItemBitset<B> {
    /// Creates an empty bitset with cardinality 0.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            bitmap: B::create(),
            card: 0,
        }
    }

    /// Wraps an existing bitmap, computing its cardinality once.
    #[must_use]
    pub fn from_bitmap(bitmap: B) -> Self {
        let card = bitmap.cardinality();
        Self { bitmap, card }
    }

    /// Marks a transaction index as present.
    pub(crate) fn add(&mut self, index: u32) {
        if self.bitmap.add(index) {
            self.card += 1;
        }
    }

    /// Intersects with `other`, producing a new owned bitset.
    #[must_use]
    pub fn intersect(&self, other: &Self) -> Self {
        Self::from_bitmap(self.bitmap.intersect(&other.bitmap))
    }

    /// Cached population count (the support count).
    #[inline]
    #[must_use]
    pub fn cardinality(&self) -> u64 {
        self.card
    }

    /// Borrows the underlying bitmap.
    #[must_use]
    pub fn bitmap(&self) -> &B {
        &self.bitmap
    }

    /// Consumes the wrapper, returning the bitmap.
    #[must_use]
    pub fn into_bitmap(self) -> B {
        self.bitmap
    }
}

impl<B: Bitset> Default for ItemBitset<B> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Runtime selection of a bitset backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// [`RoaringBitmap`].
    #[default]
    Roaring,
    /// [`DenseBitset`].
    Dense,
    /// [`AdaptiveBitset`].
    Adaptive,
}

impl BackendKind {
    /// All backends, in declaration order.
    pub const ALL: [BackendKind; 3] = [Self::Roaring, Self::Dense, Self::Adaptive];

    /// Backend name, matching [`Bitset::NAME`].
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Roaring => RoaringBitmap::NAME,
            Self::Dense => DenseBitset::NAME,
            Self::Adaptive => AdaptiveBitset::NAME,
        }
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "roaring" => Ok(Self::Roaring),
            "dense" => Ok(Self::Dense),
            "adaptive" => Ok(Self::Adaptive),
            other => Err(format!(
                "unknown bitset backend '{other}', expected one of: roaring, dense, adaptive"
            )),
        }
    }
}
