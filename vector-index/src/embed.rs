//! Embedding provider seam.

use crate::errors::IndexError;

use llm_service::LlmServiceProfiles;
use std::sync::Arc;
use std::{future::Future, pin::Pin};

/// Asynchronous embedding provider.
///
/// Async is required because real providers (OpenAI, Ollama, etc.)
/// perform HTTP requests.
pub trait EmbeddingsProvider: Send + Sync {
    /// Async embedding function.
    fn embed<'a>(
        &'a self,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, IndexError>> + Send + 'a>>;
}

/// [`EmbeddingsProvider`] backed by the LLM service embedding profile.
///
/// Rejects vectors whose width differs from the collection dimensionality
/// before they reach an upsert or a query.
pub struct ProfileEmbedder {
    profiles: Arc<LlmServiceProfiles>,
    dim: usize,
}

impl ProfileEmbedder {
    pub fn new(profiles: Arc<LlmServiceProfiles>, dim: usize) -> Self {
        Self { profiles, dim }
    }
}

impl EmbeddingsProvider for ProfileEmbedder {
    fn embed<'a>(
        &'a self,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, IndexError>> + Send + 'a>> {
        Box::pin(async move {
            let vector = self
                .profiles
                .embed(text)
                .await
                .map_err(|e| IndexError::Embedding(e.to_string()))?;
            if vector.len() != self.dim {
                return Err(IndexError::VectorSizeMismatch {
                    got: vector.len(),
                    want: self.dim,
                });
            }
            Ok(vector)
        })
    }
}
