//! Unified error types for the crate.

use thiserror::Error;

/// Top-level error for record store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Invalid or unsupported configuration.
    #[error("config error: {0}")]
    Config(String),

    /// MongoDB driver errors (connection, query, write).
    #[error("mongodb error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    /// Insertion rejected because the episode id already exists.
    #[error("duplicate episode_id: {0}")]
    DuplicateEpisode(String),
}

impl StoreError {
    /// True when the error is a unique-key rejection rather than an outage.
    pub fn is_duplicate(&self) -> bool {
        matches!(self, StoreError::DuplicateEpisode(_))
    }
}
