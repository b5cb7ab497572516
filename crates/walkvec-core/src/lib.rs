#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::doc_markdown)]

//! Graphs and random walks for DeepWalk / node2vec baselines.
//!
//! This crate provides the walk side of walk-based node embedding:
//!
//! - [`Graph`] - an undirected graph loaded from an integer edge list, stored
//!   as a compressed adjacency layout over contiguous node indices
//! - [`algo::sampling`] - weighted choice with a uniform fallback
//! - [`algo::random_walk`] - uniform (DeepWalk) and 2nd-order biased
//!   (node2vec) walk generation
//!
//! # Node identity
//!
//! Edge lists name nodes by arbitrary non-negative integers ([`NodeId`]). On
//! load, the distinct ids are sorted and each is assigned a contiguous
//! index (`u32`). All adjacency is stored by index; ids are only used at the
//! boundaries (parsing, walk output).
//!
//! ```text
//! edges:   "10 7\n7 3\n"
//! ids:     [3, 7, 10]
//! index:   3 -> 0, 7 -> 1, 10 -> 2
//! adj:     0: [1]   1: [2, 0]   2: [1]
//! ```
//!
//! # Example
//!
//! ```rust
//! use walkvec_core::algo::random_walk::{generate_walks, Method, RandomWalkConfig};
//! use walkvec_core::Graph;
//!
//! let graph = Graph::read("0 1\n1 2\n2 0\n".as_bytes()).unwrap();
//! let config = RandomWalkConfig {
//!     walk_length: 5,
//!     num_walks: 2,
//!     method: Method::Node2Vec,
//!     p: 0.5,
//!     q: 2.0,
//!     ..Default::default()
//! };
//!
//! let walks = generate_walks(&graph, &config);
//! assert_eq!(walks.len(), 3 * 2);
//! ```

pub mod algo;
pub mod error;
pub mod graph;

pub use error::{Error, Result};
pub use graph::{EdgeList, Graph, GraphStats, NodeId, MAX_NODES};
