//! Unified error types for the crate.

use thiserror::Error;

/// Top-level error for pipeline operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Record store failures (wrapped).
    #[error("store error: {0}")]
    Store(#[from] record_store::StoreError),

    /// Vector index or embedding failures (wrapped).
    #[error("index error: {0}")]
    Index(#[from] vector_index::IndexError),

    /// Language model failures (wrapped).
    #[error("llm error: {0}")]
    Llm(#[from] llm_service::AiLlmError),

    /// A record that cannot be turned into an indexable document.
    #[error("conversion error: {0}")]
    Conversion(String),
}
