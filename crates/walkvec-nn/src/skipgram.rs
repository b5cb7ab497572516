//! Skip-gram training for node embeddings.
//!
//! # The Core Insight
//!
//! Nodes appearing in similar random walk contexts should have similar embeddings.
//! This is Word2Vec applied to graphs: walks are "sentences," nodes are "words."
//!
//! # Mathematical Foundation
//!
//! Skip-gram with negative sampling (SGNS) optimizes:
//!
//! ```text
//! L = log σ(v_o · v_c) + Σᵢ E[log σ(-v_nᵢ · v_c)]
//! ```
//!
//! where `v_c` is the center's `input` row and `v_o`, `v_nᵢ` are `output`
//! rows of the context and negative nodes.
//!
//! # Update rule
//!
//! For each pair `(c, o)`, with learning rate `α`:
//!
//! ```text
//! vc = copy(input[c])                         snapshot
//! g  = (1 - σ(vc · output[o])) · α
//! input[c]  += g · output[o]
//! output[o] += g · vc
//! for each negative n != o:
//!     g' = (0 - σ(vc · output[n])) · α
//!     input[c]  += g' · output[n]
//!     output[n] += g' · vc
//! ```
//!
//! Every update in one step reads the snapshot `vc`, never the partially
//! updated `input[c]`. A negative draw equal to `o` is dropped without
//! resampling, so a step can apply fewer than `k` negative updates.
//!
//! σ is clamped: inputs above 8 give 0.9997 and below -8 give 0.0003
//! without evaluating the exponential.
//!
//! # Schedule
//!
//! Each epoch shuffles the pair list in place and trains at a fixed rate
//!
//! ```text
//! α_e = lr · (1 - e / max(1, epochs))
//! ```
//!
//! so the last epoch of a multi-epoch run trains at `lr / epochs`.
//!
//! # References
//!
//! - Mikolov et al. (2013). "Distributed Representations of Words and Phrases."
//! - Perozzi et al. (2014). "DeepWalk: Online Learning of Social Representations."
//! - Grover & Leskovec (2016). "node2vec: Scalable Feature Learning for Networks."

use crate::corpus::Pair;
use crate::negative::NegativeTable;
use crate::{Error, Result};
use rand::prelude::*;
use rand_distr::{Distribution, Uniform};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};

const SIGMOID_BOUND: f32 = 8.0;

/// Logistic function with a hard clamp outside `[-8, 8]`.
pub fn sigmoid(x: f32) -> f32 {
    if x > SIGMOID_BOUND {
        0.9997
    } else if x < -SIGMOID_BOUND {
        0.0003
    } else {
        1.0 / (1.0 + (-x).exp())
    }
}

/// Learning rate for zero-based `epoch` out of `epochs`.
pub fn learning_rate_at(lr: f32, epoch: usize, epochs: usize) -> f32 {
    lr * (1.0 - epoch as f32 / epochs.max(1) as f32)
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn add_scaled(dst: &mut [f32], src: &[f32], scale: f32) {
    for (d, s) in dst.iter_mut().zip(src) {
        *d += scale * s;
    }
}

/// Skip-gram training configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkipGramConfig {
    /// Embedding dimension.
    pub embedding_dim: usize,
    /// Passes over the pair list.
    pub epochs: usize,
    /// Negative draws per positive pair.
    pub negative_samples: usize,
    /// Initial learning rate.
    pub learning_rate: f32,
}

impl Default for SkipGramConfig {
    fn default() -> Self {
        Self {
            embedding_dim: 128,
            epochs: 3,
            negative_samples: 5,
            learning_rate: 0.025,
        }
    }
}

/// Counters accumulated during [`SkipGram::train`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainStats {
    /// Epochs run to completion.
    pub epochs_completed: usize,
    /// Positive updates applied (one per pair per epoch).
    pub positive_updates: u64,
    /// Negative updates applied.
    pub negative_updates: u64,
    /// Negative draws dropped because they hit the context node.
    pub negatives_skipped: u64,
}

/// Skip-gram model for node embedding training.
///
/// Uses two row-major matrices of shape `(num_nodes, dim)`:
/// - `input`: center vectors, uniform in `[-0.5/dim, 0.5/dim)` at start
/// - `output`: context vectors, zero at start
///
/// The matrices are only ever modified by gradient steps. Normalization for
/// export happens in [`SkipGram::normalized`], which does not mutate them.
pub struct SkipGram {
    input: Vec<f32>,
    output: Vec<f32>,
    num_nodes: usize,
    dim: usize,
    /// Pre-update copy of the current center row.
    snapshot: Vec<f32>,
}

impl SkipGram {
    /// Create a new model, drawing `input` from `rng`.
    pub fn new<R: Rng + ?Sized>(num_nodes: usize, dim: usize, rng: &mut R) -> Result<Self> {
        if dim == 0 {
            return Err(Error::Config("embedding dimension must be at least 1".into()));
        }

        let bound = 0.5 / dim as f32;
        let dist = Uniform::new(-bound, bound)
            .map_err(|e| Error::Config(format!("invalid init range for dim {dim}: {e}")))?;

        let input: Vec<f32> = (0..num_nodes * dim).map(|_| dist.sample(rng)).collect();
        let output = vec![0.0; num_nodes * dim];

        Ok(Self {
            input,
            output,
            num_nodes,
            dim,
            snapshot: vec![0.0; dim],
        })
    }

    /// Run `config.epochs` epochs of SGD over `pairs`.
    ///
    /// `pairs` is reshuffled in place at the start of every epoch.
    /// `cancel` is checked before each epoch; when set, training stops with
    /// [`Error::Cancelled`] and the matrices keep the updates made so far.
    pub fn train<R: Rng + ?Sized>(
        &mut self,
        pairs: &mut [Pair],
        table: &NegativeTable,
        config: &SkipGramConfig,
        rng: &mut R,
        cancel: Option<&AtomicBool>,
    ) -> Result<TrainStats> {
        let mut stats = TrainStats::default();

        for epoch in 0..config.epochs {
            if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
                tracing::warn!(epoch, "training cancelled");
                return Err(Error::Cancelled { epoch });
            }

            pairs.shuffle(rng);
            let alpha = learning_rate_at(config.learning_rate, epoch, config.epochs);

            for &(center, context) in pairs.iter() {
                self.train_pair(
                    center,
                    context,
                    table,
                    config.negative_samples,
                    alpha,
                    rng,
                    &mut stats,
                );
            }

            stats.epochs_completed += 1;
            tracing::info!(
                epoch = epoch + 1,
                epochs = config.epochs,
                alpha,
                pairs = pairs.len(),
                "finished epoch"
            );
        }

        tracing::debug!(?stats, "training complete");
        Ok(stats)
    }

    /// One SGD step for a `(center, context)` pair plus `negatives` draws.
    #[allow(clippy::too_many_arguments)]
    pub fn train_pair<R: Rng + ?Sized>(
        &mut self,
        center: u32,
        context: u32,
        table: &NegativeTable,
        negatives: usize,
        alpha: f32,
        rng: &mut R,
        stats: &mut TrainStats,
    ) {
        let c = center as usize;
        self.snapshot
            .copy_from_slice(&self.input[c * self.dim..(c + 1) * self.dim]);

        self.update(c, context as usize, 1.0, alpha);
        stats.positive_updates += 1;

        for _ in 0..negatives {
            let Some(negative) = table.draw(rng) else {
                continue;
            };
            if negative == context {
                stats.negatives_skipped += 1;
                continue;
            }
            self.update(c, negative as usize, 0.0, alpha);
            stats.negative_updates += 1;
        }
    }

    /// Apply one logistic update between `input[center]` and `output[target]`,
    /// scoring against the snapshot.
    fn update(&mut self, center: usize, target: usize, label: f32, alpha: f32) {
        let dim = self.dim;
        let vc = &self.snapshot;
        let out = &mut self.output[target * dim..(target + 1) * dim];

        let g = (label - sigmoid(dot(vc, out))) * alpha;
        add_scaled(&mut self.input[center * dim..(center + 1) * dim], out, g);
        add_scaled(out, vc, g);
    }

    /// Center vector of `node`.
    pub fn input_vector(&self, node: usize) -> &[f32] {
        &self.input[node * self.dim..(node + 1) * self.dim]
    }

    /// Context vector of `node`.
    pub fn output_vector(&self, node: usize) -> &[f32] {
        &self.output[node * self.dim..(node + 1) * self.dim]
    }

    /// Unit-length `input[i] + output[i]` for every node.
    ///
    /// `norm = sqrt(Σ v_j²) + 1e-12`, so an all-zero sum maps to zero
    /// instead of NaN.
    pub fn normalized(&self) -> Vec<Vec<f32>> {
        (0..self.num_nodes)
            .map(|i| {
                let v: Vec<f32> = self
                    .input_vector(i)
                    .iter()
                    .zip(self.output_vector(i))
                    .map(|(a, b)| a + b)
                    .collect();
                let norm = dot(&v, &v).sqrt() + 1e-12;
                v.into_iter().map(|x| x / norm).collect()
            })
            .collect()
    }

    /// Number of nodes.
    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    /// Embedding dimension.
    pub fn embedding_dim(&self) -> usize {
        self.dim
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_xorshift::XorShiftRng;

    fn model(num_nodes: usize, dim: usize) -> SkipGram {
        SkipGram::new(num_nodes, dim, &mut XorShiftRng::seed_from_u64(42)).unwrap()
    }

    #[test]
    fn test_skipgram_init() {
        let m = model(100, 16);
        assert_eq!(m.num_nodes(), 100);
        assert_eq!(m.embedding_dim(), 16);

        let bound = 0.5 / 16.0;
        for i in 0..100 {
            assert!(m.input_vector(i).iter().all(|x| x.abs() <= bound));
            assert!(m.output_vector(i).iter().all(|&x| x == 0.0));
        }
    }

    #[test]
    fn test_zero_dim_rejected() {
        let err = SkipGram::new(3, 0, &mut XorShiftRng::seed_from_u64(0)).err();
        assert!(matches!(err, Some(Error::Config(_))));
    }

    #[test]
    fn test_sigmoid_clamp() {
        assert_eq!(sigmoid(8.5), 0.9997);
        assert_eq!(sigmoid(-100.0), 0.0003);
        assert_eq!(sigmoid(0.0), 0.5);
        assert!((sigmoid(8.0) - 0.99966).abs() < 1e-4);
        assert!(sigmoid(f32::INFINITY) < 1.0);
    }

    #[test]
    fn test_learning_rate_schedule() {
        assert_eq!(learning_rate_at(0.03, 0, 3), 0.03);
        assert!((learning_rate_at(0.03, 2, 3) - 0.01).abs() < 1e-7);
        assert_eq!(learning_rate_at(0.025, 0, 1), 0.025);
        assert_eq!(learning_rate_at(0.025, 0, 0), 0.025);
    }

    #[test]
    fn test_positive_update_from_zero_output() {
        // output starts at zero: the first positive step leaves input[c]
        // untouched and moves output[o] by 0.5 * alpha * vc.
        let mut m = model(2, 4);
        let vc = m.input_vector(0).to_vec();
        let mut stats = TrainStats::default();
        let table = NegativeTable::default();
        let mut rng = XorShiftRng::seed_from_u64(1);

        m.train_pair(0, 1, &table, 0, 0.1, &mut rng, &mut stats);

        assert_eq!(m.input_vector(0), vc.as_slice());
        for (o, v) in m.output_vector(1).iter().zip(&vc) {
            assert!((o - 0.05 * v).abs() < 1e-9);
        }
        assert_eq!(stats.positive_updates, 1);
    }

    #[test]
    fn test_colliding_negatives_skipped() {
        let mut m = model(3, 4);
        let vc = m.input_vector(0).to_vec();
        let table = NegativeTable::from_slots(vec![1, 1, 1]);
        let mut stats = TrainStats::default();
        let mut rng = XorShiftRng::seed_from_u64(2);

        m.train_pair(0, 1, &table, 5, 0.1, &mut rng, &mut stats);

        assert_eq!(stats.negatives_skipped, 5);
        assert_eq!(stats.negative_updates, 0);
        assert_eq!(m.input_vector(0), vc.as_slice());
        assert!(m.output_vector(2).iter().all(|&x| x == 0.0));
        for (o, v) in m.output_vector(1).iter().zip(&vc) {
            assert!((o - 0.05 * v).abs() < 1e-9);
        }
    }

    #[test]
    fn test_negative_update_uses_snapshot() {
        // Make output[1] nonzero so the positive step moves input[0]; the
        // negative step must still score and update against the old input[0].
        let mut m = model(3, 2);
        let mut rng = XorShiftRng::seed_from_u64(3);
        let mut stats = TrainStats::default();
        let empty = NegativeTable::default();
        m.train_pair(2, 1, &empty, 0, 1.0, &mut rng, &mut stats);

        let vc = m.input_vector(0).to_vec();
        let out1 = m.output_vector(1).to_vec();
        let alpha = 0.5;
        let table = NegativeTable::from_slots(vec![2]);
        m.train_pair(0, 1, &table, 1, alpha, &mut rng, &mut stats);

        // output[2] is still zero, so the negative gradient is -0.5 * alpha
        // and output[2] moves along the pre-update vc.
        let g_neg = -0.5 * alpha;
        for (o, v) in m.output_vector(2).iter().zip(&vc) {
            assert!((o - g_neg * v).abs() < 1e-7);
        }

        let g_pos = (1.0 - sigmoid(dot(&vc, &out1))) * alpha;
        for j in 0..2 {
            let expected = vc[j] + g_pos * out1[j];
            assert!((m.input_vector(0)[j] - expected).abs() < 1e-7);
        }
        assert_eq!(stats.negative_updates, 1);
    }

    #[test]
    fn test_train_counts_and_cancel() {
        let mut m = model(3, 8);
        let mut pairs = vec![(0, 1), (1, 0), (1, 2), (2, 1)];
        let table = NegativeTable::from_slots(vec![0, 1, 2]);
        let config = SkipGramConfig {
            embedding_dim: 8,
            epochs: 2,
            negative_samples: 3,
            learning_rate: 0.025,
        };
        let mut rng = XorShiftRng::seed_from_u64(4);

        let stats = m.train(&mut pairs, &table, &config, &mut rng, None).unwrap();
        assert_eq!(stats.epochs_completed, 2);
        assert_eq!(stats.positive_updates, 8);
        assert_eq!(stats.negative_updates + stats.negatives_skipped, 24);

        let cancel = AtomicBool::new(true);
        let err = m
            .train(&mut pairs, &table, &config, &mut rng, Some(&cancel))
            .unwrap_err();
        assert!(matches!(err, Error::Cancelled { epoch: 0 }));
    }

    #[test]
    fn test_normalized_unit_length() {
        let mut m = model(4, 16);
        let mut pairs = vec![(0, 1), (1, 2), (2, 3), (3, 0)];
        let table = NegativeTable::from_slots(vec![0, 1, 2, 3]);
        let mut rng = XorShiftRng::seed_from_u64(5);
        let config = SkipGramConfig {
            embedding_dim: 16,
            ..Default::default()
        };
        m.train(&mut pairs, &table, &config, &mut rng, None).unwrap();

        let raw = m.input_vector(0).to_vec();
        for v in m.normalized() {
            let norm = dot(&v, &v).sqrt();
            assert!((norm - 1.0).abs() < 1e-4);
        }
        assert_eq!(m.input_vector(0), raw.as_slice());
    }
}
