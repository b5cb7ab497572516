//! Graph algorithms.
//!
//! - [`sampling`] - weighted choice over candidate lists
//! - [`random_walk`] - DeepWalk and node2vec walk generation

pub mod random_walk;
pub mod sampling;
