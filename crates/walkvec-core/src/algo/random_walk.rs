//! DeepWalk and `node2vec` random walk generation.
//!
//! Implements uniform walks (Perozzi et al., "DeepWalk", KDD 2014) and
//! biased 2nd-order walks as described in:
//! Grover & Leskovec, "node2vec: Scalable Feature Learning for Networks" (KDD 2016)
//!
//! ## Walk procedure
//!
//! For each of `num_walks` batches, the node list is shuffled and one walk is
//! started from every node in shuffled order. A walk grows until it reaches
//! `walk_length` or lands on a node with no neighbors, in which case it ends
//! early.
//!
//! The first transition is always uniform. After that, `node2vec` weighs each
//! candidate `x` of the current node by its distance to the previous node:
//!
//! ```text
//! x == prev            -> 1/p   (return)
//! x in neighbors(prev) -> 1     (triangle, distance 1)
//! otherwise            -> 1/q   (explore, distance 2)
//! ```
//!
//! Weights are computed exactly over the full candidate list and drawn with
//! [`weighted_choice`]. Duplicate neighbors each get their own weight, so a
//! repeated edge is proportionally more likely.
//!
//! `p` and `q` are not validated. Non-positive values produce infinite or
//! negative weights; keeping them positive is the caller's job.
//!
//! ## Determinism
//!
//! [`WalkMode::Sequential`] consumes one generator in a fixed order (node
//! shuffle per batch, then one draw per step) and is reproducible for a
//! given seed. [`WalkMode::Parallel`] runs batches on rayon workers, each with
//! its own generator seeded by `seed + batch`. It is also reproducible, but
//! does not produce the same walks as sequential mode.

use super::sampling::weighted_choice;
use crate::{Error, Graph, NodeId, Result};
use rand::prelude::*;
use rand_xorshift::XorShiftRng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Transition rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    /// Uniform neighbor choice at every step.
    #[default]
    DeepWalk,
    /// 2nd-order biased choice after the first step.
    Node2Vec,
}

impl FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "deepwalk" => Ok(Self::DeepWalk),
            "node2vec" => Ok(Self::Node2Vec),
            _ => Err(Error::Config(format!(
                "unknown method {s:?} (expected \"deepwalk\" or \"node2vec\")"
            ))),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DeepWalk => write!(f, "deepwalk"),
            Self::Node2Vec => write!(f, "node2vec"),
        }
    }
}

/// Batch scheduling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WalkMode {
    /// One generator, batches in order.
    #[default]
    Sequential,
    /// One generator per batch, batches on the rayon pool.
    Parallel,
}

/// Configuration for random walks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RandomWalkConfig {
    /// Maximum length of each walk, start node included.
    pub walk_length: usize,
    /// Number of walks to start from each node.
    pub num_walks: usize,
    /// Transition rule.
    pub method: Method,
    /// Return parameter (p). Ignored for DeepWalk.
    /// - p > 1: less likely to backtrack
    /// - p < 1: more likely to backtrack
    pub p: f64,
    /// In-out parameter (q). Ignored for DeepWalk.
    /// - q > 1: BFS-like (local exploration)
    /// - q < 1: DFS-like (outward exploration)
    pub q: f64,
    /// Random seed for [`generate_walks`].
    pub seed: u64,
    /// Batch scheduling.
    pub mode: WalkMode,
}

impl Default for RandomWalkConfig {
    fn default() -> Self {
        Self {
            walk_length: 40,
            num_walks: 10,
            method: Method::DeepWalk,
            p: 1.0,
            q: 1.0,
            seed: 42,
            mode: WalkMode::Sequential,
        }
    }
}

impl RandomWalkConfig {
    /// Reject configurations that cannot produce walks.
    pub fn validate(&self) -> Result<()> {
        if self.walk_length == 0 {
            return Err(Error::Config("walk_length must be at least 1".into()));
        }
        Ok(())
    }
}

/// Generate all walks, seeding a fresh generator from `config.seed`.
///
/// # Returns
/// `num_walks * num_nodes` walks of node ids, batch-major.
#[must_use]
pub fn generate_walks(graph: &Graph, config: &RandomWalkConfig) -> Vec<Vec<NodeId>> {
    let walker = Walker::new(graph, *config);
    match config.mode {
        WalkMode::Sequential => walker.walk(&mut XorShiftRng::seed_from_u64(config.seed)),
        WalkMode::Parallel => walker.walk_parallel(),
    }
}

/// Transition weights of `cur`'s neighbors, given the walk arrived from `prev`.
///
/// One weight per entry of `graph.neighbors(cur)`, in the same order.
pub fn node2vec_weights(graph: &Graph, prev: u32, cur: u32, p: f64, q: f64) -> Vec<f64> {
    let prev_neighbors: HashSet<u32> = graph.neighbors(prev).iter().copied().collect();
    let mut weights = Vec::with_capacity(graph.degree(cur));
    fill_weights(graph.neighbors(cur), prev, &prev_neighbors, p, q, &mut weights);
    weights
}

fn fill_weights(
    candidates: &[u32],
    prev: u32,
    prev_neighbors: &HashSet<u32>,
    p: f64,
    q: f64,
    out: &mut Vec<f64>,
) {
    out.clear();
    out.extend(candidates.iter().map(|x| {
        if *x == prev {
            1.0 / p
        } else if prev_neighbors.contains(x) {
            1.0
        } else {
            1.0 / q
        }
    }));
}

/// Buffers reused across steps of one batch.
#[derive(Default)]
struct Scratch {
    prev_neighbors: HashSet<u32>,
    weights: Vec<f64>,
}

/// Random walker over a [`Graph`].
pub struct Walker<'a> {
    graph: &'a Graph,
    config: RandomWalkConfig,
}

impl<'a> Walker<'a> {
    /// Create a new walker.
    #[must_use]
    pub const fn new(graph: &'a Graph, config: RandomWalkConfig) -> Self {
        Self { graph, config }
    }

    /// Generate all batches sequentially from `rng`.
    pub fn walk<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<Vec<NodeId>> {
        let mut walks = Vec::with_capacity(self.graph.num_nodes() * self.config.num_walks);
        for _ in 0..self.config.num_walks {
            self.batch_into(rng, &mut walks);
        }
        tracing::info!(
            walks = walks.len(),
            method = %self.config.method,
            "generated walks"
        );
        walks
    }

    /// Generate batches in parallel, one generator per batch.
    pub fn walk_parallel(&self) -> Vec<Vec<NodeId>> {
        let walks: Vec<Vec<NodeId>> = (0..self.config.num_walks)
            .into_par_iter()
            .flat_map(|batch| {
                let mut rng =
                    XorShiftRng::seed_from_u64(self.config.seed.wrapping_add(batch as u64));
                let mut walks = Vec::with_capacity(self.graph.num_nodes());
                self.batch_into(&mut rng, &mut walks);
                walks
            })
            .collect();
        tracing::info!(
            walks = walks.len(),
            method = %self.config.method,
            "generated walks (parallel)"
        );
        walks
    }

    /// A single walk starting at node index `start`.
    pub fn walk_from<R: Rng + ?Sized>(&self, start: u32, rng: &mut R) -> Vec<NodeId> {
        self.walk_with_scratch(start, rng, &mut Scratch::default())
    }

    fn batch_into<R: Rng + ?Sized>(&self, rng: &mut R, walks: &mut Vec<Vec<NodeId>>) {
        let mut order: Vec<u32> = (0..self.graph.num_nodes() as u32).collect();
        order.shuffle(rng);

        let mut scratch = Scratch::default();
        for &start in &order {
            walks.push(self.walk_with_scratch(start, rng, &mut scratch));
        }
    }

    fn walk_with_scratch<R: Rng + ?Sized>(
        &self,
        start: u32,
        rng: &mut R,
        scratch: &mut Scratch,
    ) -> Vec<NodeId> {
        let max_len = self.config.walk_length;
        if max_len == 0 {
            return Vec::new();
        }

        let mut path = Vec::with_capacity(max_len);
        path.push(start);

        while path.len() < max_len {
            let cur = path[path.len() - 1];
            let neighbors = self.graph.neighbors(cur);
            if neighbors.is_empty() {
                break;
            }

            let choice = if path.len() == 1 || self.config.method == Method::DeepWalk {
                neighbors.choose(rng)
            } else {
                let prev = path[path.len() - 2];
                scratch.prev_neighbors.clear();
                scratch
                    .prev_neighbors
                    .extend(self.graph.neighbors(prev).iter().copied());
                fill_weights(
                    neighbors,
                    prev,
                    &scratch.prev_neighbors,
                    self.config.p,
                    self.config.q,
                    &mut scratch.weights,
                );
                weighted_choice(neighbors, &scratch.weights, rng)
            };

            let Some(&next) = choice else { break };
            path.push(next);
        }

        path.into_iter().map(|i| self.graph.id(i)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(edges: &str) -> Graph {
        Graph::read(edges.as_bytes()).unwrap()
    }

    #[test]
    fn test_random_walk_uniform() {
        let g = graph("0 1\n1 2\n");
        let config = RandomWalkConfig {
            walk_length: 10,
            num_walks: 2,
            ..Default::default()
        };

        let walks = generate_walks(&g, &config);
        assert_eq!(walks.len(), 3 * 2);
        for walk in &walks {
            assert_eq!(walk.len(), 10);
            for pair in walk.windows(2) {
                assert!(g.neighbor_ids(pair[0]).contains(&pair[1]));
            }
        }
    }

    #[test]
    fn test_every_node_starts_once_per_batch() {
        let g = graph("5 6\n6 7\n7 8\n");
        let config = RandomWalkConfig {
            walk_length: 3,
            num_walks: 4,
            ..Default::default()
        };

        let walks = generate_walks(&g, &config);
        for batch in walks.chunks(4) {
            let mut starts: Vec<_> = batch.iter().map(|w| w[0]).collect();
            starts.sort_unstable();
            assert_eq!(starts, vec![5, 6, 7, 8]);
        }
    }

    #[test]
    fn test_random_walk_biased() {
        // A path 0 - 1 - 2 - 3
        let g = graph("0 1\n1 2\n2 3\n");
        let config = RandomWalkConfig {
            walk_length: 20,
            num_walks: 5,
            method: Method::Node2Vec,
            p: 0.5,
            q: 2.0,
            seed: 123,
            ..Default::default()
        };

        let walks = generate_walks(&g, &config);
        assert_eq!(walks.len(), 4 * 5);
        for walk in &walks {
            assert_eq!(walk.len(), 20);
        }
    }

    #[test]
    fn test_node2vec_weights_fixture() {
        // prev = 0, cur = 1; 1's neighbors are 0 (return), 2 (also adjacent
        // to 0, triangle) and 3 (not adjacent to 0, explore).
        let g = graph("0 1\n0 2\n1 2\n1 3\n");
        let prev = g.index_of(0).unwrap();
        let cur = g.index_of(1).unwrap();

        let neighbors: Vec<NodeId> = g.neighbors(cur).iter().map(|&i| g.id(i)).collect();
        assert_eq!(neighbors, vec![0, 2, 3]);

        let weights = node2vec_weights(&g, prev, cur, 4.0, 0.25);
        assert_eq!(weights, vec![0.25, 1.0, 4.0]);
    }

    #[test]
    fn test_high_return_bias_backtracks() {
        // A star: from a leaf through the hub, tiny p makes returning dominant.
        let g = graph("0 1\n0 2\n0 3\n0 4\n");
        let config = RandomWalkConfig {
            walk_length: 3,
            num_walks: 50,
            method: Method::Node2Vec,
            p: 0.001,
            q: 1.0,
            seed: 9,
            ..Default::default()
        };

        let walks = generate_walks(&g, &config);
        let leaf_walks: Vec<_> = walks.iter().filter(|w| w[0] != 0).collect();
        let returned = leaf_walks.iter().filter(|w| w[2] == w[0]).count();
        assert!(returned as f64 / leaf_walks.len() as f64 > 0.95);
    }

    #[test]
    fn test_single_edge_walks_alternate() {
        let g = graph("0 1\n");
        let config = RandomWalkConfig {
            walk_length: 7,
            num_walks: 1,
            ..Default::default()
        };
        for walk in generate_walks(&g, &config) {
            let other = 1 - walk[0];
            let expected: Vec<NodeId> = (0..7)
                .map(|i| if i % 2 == 0 { walk[0] } else { other })
                .collect();
            assert_eq!(walk, expected);
        }

        let empty = Graph::default();
        assert!(generate_walks(&empty, &config).is_empty());
    }

    #[test]
    fn test_zero_length_walks_are_empty() {
        let g = graph("0 1\n");
        let config = RandomWalkConfig {
            walk_length: 0,
            num_walks: 1,
            ..Default::default()
        };
        assert!(config.validate().is_err());
        assert!(generate_walks(&g, &config).iter().all(Vec::is_empty));
    }

    #[test]
    fn test_random_walk_reproducible() {
        let g = graph("0 1\n1 2\n2 3\n3 0\n0 2\n");
        for method in [Method::DeepWalk, Method::Node2Vec] {
            for mode in [WalkMode::Sequential, WalkMode::Parallel] {
                let config = RandomWalkConfig {
                    walk_length: 10,
                    num_walks: 3,
                    method,
                    p: 0.7,
                    q: 1.3,
                    seed: 999,
                    mode,
                };
                assert_eq!(generate_walks(&g, &config), generate_walks(&g, &config));
            }
        }
    }

    #[test]
    fn test_explicit_generator_matches_seeded() {
        let g = graph("0 1\n1 2\n2 0\n");
        let config = RandomWalkConfig::default();
        let mut rng = XorShiftRng::seed_from_u64(config.seed);
        let walker = Walker::new(&g, config);
        assert_eq!(walker.walk(&mut rng), generate_walks(&g, &config));
    }

    #[test]
    fn test_method_parse() {
        assert_eq!("deepwalk".parse::<Method>().unwrap(), Method::DeepWalk);
        assert_eq!("node2vec".parse::<Method>().unwrap(), Method::Node2Vec);
        for name in ["line", "Node2Vec", "DEEPWALK", " deepwalk", ""] {
            assert!(matches!(name.parse::<Method>(), Err(Error::Config(_))), "{name:?}");
        }
        assert_eq!(Method::Node2Vec.to_string(), "node2vec");
    }
}
