//! Vector index for podcast summaries over Qdrant.
//!
//! This crate provides a clean API to:
//! - Keep one collection of summary embeddings, partitioned by namespace
//! - Upsert documents with flat scalar payloads that round-trip losslessly
//! - Retrieve top-K scored matches for a query vector
//!
//! The design is flat (no deep nesting) and splits responsibilities into focused modules.

mod config;
mod document;
mod embed;
mod errors;
mod ids;
mod qdrant_index;

pub use config::{DistanceKind, IndexConfig};
pub use document::{DocumentMetadata, IndexedDocument, ScoredMatch};
pub use embed::{EmbeddingsProvider, ProfileEmbedder};
pub use errors::IndexError;
pub use ids::{random_point_id, stable_point_id};
pub use qdrant_index::{DocumentIndex, QdrantIndex};
