//! Error types for walkvec-nn.

use thiserror::Error;
use walkvec_core::NodeId;

/// Error type for corpus construction, training and vector IO.
#[derive(Error, Debug)]
pub enum Error {
    /// Graph loading or walk configuration error.
    #[error(transparent)]
    Core(#[from] walkvec_core::Error),

    /// Rejected training configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// A walk mentions a node the vocabulary was not built from.
    #[error("Node {0} is not in the vocabulary")]
    UnknownNode(NodeId),

    /// A vector-file line is not `<id> <x1> ... <xd>`.
    #[error("Invalid vector file at line {line}: {content:?}")]
    Format {
        /// 1-based line number.
        line: usize,
        /// The offending line, trimmed.
        content: String,
    },

    /// Cancellation was requested; `epoch` is the first epoch not run.
    #[error("Training cancelled before epoch {epoch}")]
    Cancelled {
        /// Zero-based epoch index.
        epoch: usize,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for walkvec-nn operations.
pub type Result<T> = std::result::Result<T, Error>;
