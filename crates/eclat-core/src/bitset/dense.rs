//! Uncompressed bitset backed by `Vec<u64>`.

use super::Bitset;

const WORD_BITS: usize = 64;

/// Plain word-array bitset. Grows on [`Bitset::add`]; trailing zero words are
/// never produced by `intersect`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DenseBitset {
    blocks: Vec<u64>,
}

impl DenseBitset {
    /// Returns true if `index` is present.
    #[inline]
    #[must_use]
    pub fn contains(&self, index: u32) -> bool {
        let idx = index as usize;
        self.blocks
            .get(idx / WORD_BITS)
            .is_some_and(|block| block & (1u64 << (idx % WORD_BITS)) != 0)
    }
}

impl Bitset for DenseBitset {
    const NAME: &'static str = "dense";

    fn create() -> Self {
        Self::default()
    }

    #[inline]
    fn add(&mut self, index: u32) -> bool {
        let idx = index as usize;
        let word = idx / WORD_BITS;
        if word >= self.blocks.len() {
            self.blocks.resize(word + 1, 0);
        }
        let mask = 1u64 << (idx % WORD_BITS);
        let fresh = self.blocks[word] & mask == 0;
        self.blocks[word] |= mask;
        fresh
    }

    fn intersect(&self, other: &Self) -> Self {
        let mut blocks: Vec<u64> = self
            .blocks
            .iter()
            .zip(other.blocks.iter())
            .map(|(a, b)| a & b)
            .collect();
        while blocks.last() == Some(&0) {
            blocks.pop();
        }
        Self { blocks }
    }

    #[inline]
    fn cardinality(&self) -> u64 {
        self.blocks.iter().map(|b| u64::from(b.count_ones())).sum()
    }

    fn to_vec(&self) -> Vec<u32> {
        let mut out = Vec::with_capacity(self.cardinality() as usize);
        for (w, &block) in self.blocks.iter().enumerate() {
            let mut bits = block;
            while bits != 0 {
                let tz = bits.trailing_zeros() as usize;
                out.push((w * WORD_BITS + tz) as u32);
                bits &= bits - 1;
            }
        }
        out
    }
}
