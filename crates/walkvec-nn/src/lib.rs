#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::doc_markdown)]

//! Skip-gram node embeddings from random walks.
//!
//! Turns walks produced by [`walkvec_core`] into dense node vectors:
//!
//! - [`corpus`] - vocabulary and sliding-window `(center, context)` pairs
//! - [`negative`] - unigram^0.75 negative-sampling table
//! - [`skipgram`] - two-matrix SGD with negative sampling
//! - [`vectors`] - the `<id> <x1> ... <xd>` exchange format
//! - [`pipeline`] - the whole run under one [`EmbedConfig`]
//!
//! # Data flow
//!
//! ```text
//! Graph ──walks──▶ Vec<Vec<NodeId>> ──Vocab──▶ pairs ─┐
//!                         │                           ├─▶ SkipGram ──▶ unit vectors
//!                         └──frequencies──▶ NegativeTable
//! ```
//!
//! Everything is held in memory; training is single-threaded.

pub mod corpus;
pub mod error;
pub mod negative;
pub mod pipeline;
pub mod skipgram;
pub mod vectors;

pub use corpus::{build_pairs, Pair, Vocab};
pub use error::{Error, Result};
pub use negative::{NegativeTable, DEFAULT_TABLE_SIZE};
pub use pipeline::{embed, train_walks, EmbedConfig, EmbedReport, Embedding};
pub use skipgram::{SkipGram, SkipGramConfig, TrainStats};
pub use vectors::VectorFile;
