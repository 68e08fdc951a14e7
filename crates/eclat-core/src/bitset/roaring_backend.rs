//! [`Bitset`] for `roaring::RoaringBitmap`.

use roaring::RoaringBitmap;

use super::Bitset;

impl Bitset for RoaringBitmap {
    const NAME: &'static str = "roaring";

    fn create() -> Self {
        RoaringBitmap::new()
    }

    #[inline]
    fn add(&mut self, index: u32) -> bool {
        self.insert(index)
    }

    #[inline]
    fn intersect(&self, other: &Self) -> Self {
        self & other
    }

    #[inline]
    fn cardinality(&self) -> u64 {
        self.len()
    }

    fn to_vec(&self) -> Vec<u32> {
        self.iter().collect()
    }
}
