//! Skip-gram corpus construction from walks.
//!
//! Walks carry raw node ids. Training works on contiguous indices, so the
//! distinct ids seen in the walks are sorted into a [`Vocab`] and each walk
//! is mapped through it before pairs are emitted.
//!
//! For a walk `w` and radius `W`, every position `i` pairs with every
//! position `j` in `[i - W, i + W]` (clipped to the walk) except `i` itself:
//!
//! ```text
//! walk:    a b c d      W = 1
//! pairs:   (a,b) (b,a) (b,c) (c,b) (c,d) (d,c)
//! ```
//!
//! Pairs are directional and never deduplicated; a node that occurs in many
//! walks contributes proportionally more pairs.

use crate::{Error, Result};
use walkvec_core::NodeId;

/// A `(center, context)` pair of vocabulary indices.
pub type Pair = (u32, u32);

/// Sorted distinct node ids observed in a set of walks.
///
/// Index `i` is the `i`-th smallest id. This is the key space of the
/// embedding matrices.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vocab {
    ids: Vec<NodeId>,
}

impl Vocab {
    /// Build from every id that occurs in `walks`.
    pub fn from_walks(walks: &[Vec<NodeId>]) -> Self {
        let mut ids: Vec<NodeId> = walks.iter().flatten().copied().collect();
        ids.sort_unstable();
        ids.dedup();
        Self { ids }
    }

    /// Number of distinct nodes.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// True if no walk contained any node.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Ids in index order.
    pub fn ids(&self) -> &[NodeId] {
        &self.ids
    }

    /// Index of `id`.
    pub fn index_of(&self, id: NodeId) -> Option<u32> {
        self.ids
            .binary_search(&id)
            .ok()
            .and_then(|i| u32::try_from(i).ok())
    }

    /// Map a walk to indices.
    pub fn encode(&self, walk: &[NodeId]) -> Result<Vec<u32>> {
        walk.iter()
            .map(|&id| self.index_of(id).ok_or(Error::UnknownNode(id)))
            .collect()
    }

    /// Occurrences of each index across all walks.
    pub fn frequencies(&self, walks: &[Vec<NodeId>]) -> Result<Vec<u64>> {
        let mut freq = vec![0u64; self.len()];
        for walk in walks {
            for &id in walk {
                let i = self.index_of(id).ok_or(Error::UnknownNode(id))?;
                freq[i as usize] += 1;
            }
        }
        Ok(freq)
    }
}

/// Flatten walks into `(center, context)` pairs with a sliding window.
pub fn build_pairs(walks: &[Vec<NodeId>], window: usize, vocab: &Vocab) -> Result<Vec<Pair>> {
    // A window wider than the walk only ever sees the walk itself.
    let estimate = walks.iter().fold(0usize, |acc, w| {
        let span = window.min(w.len().saturating_sub(1));
        acc.saturating_add(w.len().saturating_mul(2).saturating_mul(span))
    });
    let mut pairs = Vec::with_capacity(estimate);

    for walk in walks {
        let ids = vocab.encode(walk)?;
        for (i, &center) in ids.iter().enumerate() {
            let start = i.saturating_sub(window);
            let end = i.saturating_add(window).saturating_add(1).min(ids.len());
            for (j, &context) in ids.iter().enumerate().take(end).skip(start) {
                if j != i {
                    pairs.push((center, context));
                }
            }
        }
    }

    tracing::info!(pairs = pairs.len(), window, "built skip-gram corpus");
    Ok(pairs)
}
