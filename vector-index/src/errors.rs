//! Unified error types for the crate.

use thiserror::Error;

/// Top-level error for vector index operations.
#[derive(Debug, Error)]
pub enum IndexError {
    /// Invalid or unsupported configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Mismatch between a produced vector and the collection dimension.
    #[error("vector size mismatch: got {got}, want {want}")]
    VectorSizeMismatch { got: usize, want: usize },

    /// Embedding backend failure (wrapped).
    #[error("embedding error: {0}")]
    Embedding(String),

    /// Payload (de)serialization errors.
    #[error("payload error: {0}")]
    Payload(#[from] serde_json::Error),

    /// Qdrant client errors (wrapped).
    #[error("qdrant error: {0}")]
    Qdrant(String),
}
