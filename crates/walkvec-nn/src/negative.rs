//! Negative-sampling table (unigram^0.75).
//!
//! Each node index `i` with walk frequency `c_i > 0` gets
//!
//! ```text
//! max(1, floor(c_i^0.75 / Z * size)),   Z = sum_j c_j^0.75
//! ```
//!
//! slots. The table is shuffled once after construction and a draw picks a
//! uniformly random slot. Because of flooring and the one-slot minimum the
//! table length is only approximately `size`, and the sampled distribution
//! only approximately unigram^0.75.
//!
//! The 3/4 power smooths between:
//! - freq^1 (unigram): over-samples common nodes
//! - freq^0 (uniform): over-samples rare nodes

use rand::prelude::*;

/// Default number of slots.
pub const DEFAULT_TABLE_SIZE: usize = 200_000;

const POWER: f64 = 0.75;

/// Shuffled table of node indices for negative draws.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NegativeTable {
    slots: Vec<u32>,
}

impl NegativeTable {
    /// Build from per-index frequencies.
    ///
    /// Indices with zero frequency get no slots.
    pub fn build<R: Rng + ?Sized>(frequencies: &[u64], size: usize, rng: &mut R) -> Self {
        let z: f64 = frequencies
            .iter()
            .filter(|&&c| c > 0)
            .map(|&c| (c as f64).powf(POWER))
            .sum();

        let mut slots = Vec::with_capacity(size + frequencies.len());
        for (i, &c) in frequencies.iter().enumerate() {
            if c == 0 {
                continue;
            }
            let share = (c as f64).powf(POWER) / z * size as f64;
            let count = (share as usize).max(1);
            slots.extend(std::iter::repeat(i as u32).take(count));
        }
        slots.shuffle(rng);

        tracing::debug!(
            nodes = frequencies.len(),
            slots = slots.len(),
            "built negative sampling table"
        );
        Self { slots }
    }

    /// Use `slots` as-is, without shuffling.
    pub fn from_slots(slots: Vec<u32>) -> Self {
        Self { slots }
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True if the table has no slots.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// All slots in table order.
    pub fn slots(&self) -> &[u32] {
        &self.slots
    }

    /// Slots occupied by `index`.
    pub fn count(&self, index: u32) -> usize {
        self.slots.iter().filter(|&&s| s == index).count()
    }

    /// Draw one index from a uniformly random slot. `None` if empty.
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<u32> {
        self.slots.choose(rng).copied()
    }
}
