//! Error types for walkvec-core.

use thiserror::Error;

/// Error type for graph loading and walk configuration.
#[derive(Error, Debug)]
pub enum Error {
    /// An edge-list line is not two whitespace-separated non-negative integers.
    #[error("Invalid edge list at line {line}: {content:?}")]
    Format {
        /// 1-based line number.
        line: usize,
        /// The offending line, trimmed.
        content: String,
    },

    /// Rejected configuration or input beyond the supported node count.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for walkvec-core operations.
pub type Result<T> = std::result::Result<T, Error>;
