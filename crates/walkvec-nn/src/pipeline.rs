//! End-to-end embedding: graph → walks → corpus → skip-gram → unit vectors.
//!
//! # Random-number order
//!
//! Two generators, both seeded from `config.seed`:
//!
//! 1. walk generation (node shuffle per batch, one draw per step)
//! 2. training: `input` init, negative-table shuffle, per-epoch pair
//!    shuffle, negative draws
//!
//! With [`WalkMode::Sequential`] the whole run is a function of the inputs
//! and the seed, so repeated runs write byte-identical vector files.
//!
//! # Example
//!
//! ```rust
//! use walkvec_core::Graph;
//! use walkvec_nn::pipeline::{embed, EmbedConfig};
//!
//! let graph = Graph::read("0 1\n1 2\n2 0\n".as_bytes()).unwrap();
//! let config = EmbedConfig::default()
//!     .with_embedding_dim(8)
//!     .with_walk_length(5)
//!     .with_epochs(1);
//!
//! let (embedding, report) = embed(&graph, &config, None).unwrap();
//! assert_eq!(embedding.ids, vec![0, 1, 2]);
//! assert_eq!(report.num_walks, 3 * config.num_walks);
//! ```

use crate::corpus::{build_pairs, Vocab};
use crate::negative::{NegativeTable, DEFAULT_TABLE_SIZE};
use crate::skipgram::{SkipGram, SkipGramConfig, TrainStats};
use crate::vectors::VectorFile;
use crate::{Error, Result};
use rand::SeedableRng;
use rand_xorshift::XorShiftRng;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::sync::atomic::AtomicBool;
use std::time::Instant;
use walkvec_core::algo::random_walk::{generate_walks, Method, RandomWalkConfig, WalkMode};
use walkvec_core::{Graph, NodeId};

/// Full run configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmbedConfig {
    /// Transition rule (default: DeepWalk).
    pub method: Method,
    /// Embedding width (default: 128).
    pub embedding_dim: usize,
    /// Maximum walk length (default: 40).
    pub walk_length: usize,
    /// Walks started per node (default: 10).
    pub num_walks: usize,
    /// Skip-gram context radius (default: 5).
    pub window: usize,
    /// Training epochs (default: 3).
    pub epochs: usize,
    /// Negative draws per positive pair (default: 5).
    pub negative_samples: usize,
    /// Initial learning rate (default: 0.025).
    pub learning_rate: f32,
    /// node2vec return parameter (default: 1.0).
    pub p: f64,
    /// node2vec in-out parameter (default: 1.0).
    pub q: f64,
    /// Seed for both generators (default: 42).
    pub seed: u64,
    /// Walk batch scheduling (default: sequential).
    pub walk_mode: WalkMode,
    /// Negative table slots (default: 200000).
    pub table_size: usize,
}

impl Default for EmbedConfig {
    fn default() -> Self {
        Self {
            method: Method::DeepWalk,
            embedding_dim: 128,
            walk_length: 40,
            num_walks: 10,
            window: 5,
            epochs: 3,
            negative_samples: 5,
            learning_rate: 0.025,
            p: 1.0,
            q: 1.0,
            seed: 42,
            walk_mode: WalkMode::Sequential,
            table_size: DEFAULT_TABLE_SIZE,
        }
    }
}

impl EmbedConfig {
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn with_embedding_dim(mut self, dim: usize) -> Self {
        self.embedding_dim = dim;
        self
    }

    pub fn with_walk_length(mut self, walk_length: usize) -> Self {
        self.walk_length = walk_length;
        self
    }

    pub fn with_num_walks(mut self, num_walks: usize) -> Self {
        self.num_walks = num_walks;
        self
    }

    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    pub fn with_epochs(mut self, epochs: usize) -> Self {
        self.epochs = epochs;
        self
    }

    pub fn with_negative_samples(mut self, n: usize) -> Self {
        self.negative_samples = n;
        self
    }

    pub fn with_learning_rate(mut self, lr: f32) -> Self {
        self.learning_rate = lr;
        self
    }

    pub fn with_bias(mut self, p: f64, q: f64) -> Self {
        self.p = p;
        self.q = q;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_walk_mode(mut self, mode: WalkMode) -> Self {
        self.walk_mode = mode;
        self
    }

    /// Reject configurations before any work starts.
    pub fn validate(&self) -> Result<()> {
        self.walk_config().validate()?;
        if self.embedding_dim == 0 {
            return Err(Error::Config("embedding_dim must be at least 1".into()));
        }
        Ok(())
    }

    /// The walk-generation part of this configuration.
    pub fn walk_config(&self) -> RandomWalkConfig {
        RandomWalkConfig {
            walk_length: self.walk_length,
            num_walks: self.num_walks,
            method: self.method,
            p: self.p,
            q: self.q,
            seed: self.seed,
            mode: self.walk_mode,
        }
    }

    /// The training part of this configuration.
    pub fn skipgram_config(&self) -> SkipGramConfig {
        SkipGramConfig {
            embedding_dim: self.embedding_dim,
            epochs: self.epochs,
            negative_samples: self.negative_samples,
            learning_rate: self.learning_rate,
        }
    }
}

/// Unit-length node vectors in ascending id order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Embedding {
    /// Node ids, ascending.
    pub ids: Vec<NodeId>,
    /// One vector per id.
    pub vectors: Vec<Vec<f32>>,
}

impl Embedding {
    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// True if no node was embedded.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Vector of `id`.
    pub fn get(&self, id: NodeId) -> Option<&[f32]> {
        self.ids
            .binary_search(&id)
            .ok()
            .map(|i| self.vectors[i].as_slice())
    }

    /// Render in the vector file format.
    pub fn to_vector_string(&self) -> String {
        VectorFile::to_string(&self.ids, &self.vectors)
    }

    /// Write in the vector file format.
    pub fn write<W: Write>(&self, writer: W) -> Result<()> {
        VectorFile::write(writer, &self.ids, &self.vectors)
    }
}

/// What a run did, for logs and run summaries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmbedReport {
    /// Configuration the run used.
    pub config: EmbedConfig,
    /// Nodes in the vocabulary.
    pub num_nodes: usize,
    /// Walks generated.
    pub num_walks: usize,
    /// `(center, context)` pairs per epoch.
    pub num_pairs: usize,
    /// Negative table slots.
    pub table_slots: usize,
    /// Update counters.
    pub train: TrainStats,
    /// Wall-clock seconds spent generating walks.
    pub walk_secs: f64,
    /// Wall-clock seconds spent building the corpus and table.
    pub corpus_secs: f64,
    /// Wall-clock seconds spent in SGD.
    pub train_secs: f64,
}

/// Generate walks over `graph` and train on them.
pub fn embed(
    graph: &Graph,
    config: &EmbedConfig,
    cancel: Option<&AtomicBool>,
) -> Result<(Embedding, EmbedReport)> {
    config.validate()?;

    let start = Instant::now();
    let walks = generate_walks(graph, &config.walk_config());
    let walk_secs = start.elapsed().as_secs_f64();

    let (embedding, mut report) = train_walks(&walks, config, cancel)?;
    report.walk_secs = walk_secs;
    Ok((embedding, report))
}

/// Train on pre-generated walks.
///
/// The vocabulary is the sorted set of ids that occur in `walks`.
pub fn train_walks(
    walks: &[Vec<NodeId>],
    config: &EmbedConfig,
    cancel: Option<&AtomicBool>,
) -> Result<(Embedding, EmbedReport)> {
    config.validate()?;
    let mut rng = XorShiftRng::seed_from_u64(config.seed);

    let start = Instant::now();
    let vocab = Vocab::from_walks(walks);
    let frequencies = vocab.frequencies(walks)?;
    let mut model = SkipGram::new(vocab.len(), config.embedding_dim, &mut rng)?;
    let mut pairs = build_pairs(walks, config.window, &vocab)?;
    let table = NegativeTable::build(&frequencies, config.table_size, &mut rng);
    let corpus_secs = start.elapsed().as_secs_f64();

    let start = Instant::now();
    let train = model.train(
        &mut pairs,
        &table,
        &config.skipgram_config(),
        &mut rng,
        cancel,
    )?;
    let train_secs = start.elapsed().as_secs_f64();

    let embedding = Embedding {
        ids: vocab.ids().to_vec(),
        vectors: model.normalized(),
    };
    let report = EmbedReport {
        config: *config,
        num_nodes: vocab.len(),
        num_walks: walks.len(),
        num_pairs: pairs.len(),
        table_slots: table.len(),
        train,
        walk_secs: 0.0,
        corpus_secs,
        train_secs,
    };

    tracing::info!(
        nodes = report.num_nodes,
        pairs = report.num_pairs,
        negative_updates = train.negative_updates,
        negatives_skipped = train.negatives_skipped,
        "training finished"
    );
    Ok((embedding, report))
}
