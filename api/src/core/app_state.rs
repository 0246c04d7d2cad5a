use std::sync::Arc;

use insight_engine::{AnswerOptions, AnswerPipeline};
use llm_service::LlmServiceProfiles;
use vector_index::{IndexConfig, ProfileEmbedder, QdrantIndex};

use crate::error_handler::AppError;

/// Shared state for all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// Retrieval-answer pipeline, ready to serve questions.
    pub pipeline: Arc<AnswerPipeline>,
    /// Provider profiles, kept for health reporting.
    pub profiles: Arc<LlmServiceProfiles>,
}

impl AppState {
    /// Load shared state from environment variables.
    ///
    /// # Errors
    /// Fails when provider or index configuration is missing, or when the
    /// vector index cannot be reached during startup.
    pub async fn from_env() -> Result<Self, AppError> {
        let profiles = Arc::new(
            LlmServiceProfiles::from_env().map_err(|e| AppError::Config(e.to_string()))?,
        );

        let index_cfg = IndexConfig::from_env().map_err(|e| AppError::Config(e.to_string()))?;
        let dim = index_cfg.dim;
        let index = QdrantIndex::connect(&index_cfg)
            .await
            .map_err(|e| AppError::Config(e.to_string()))?;

        let embedder = ProfileEmbedder::new(profiles.clone(), dim);
        let pipeline = AnswerPipeline::new(
            Arc::new(index),
            Arc::new(embedder),
            profiles.clone(),
            AnswerOptions::default(),
        );

        Ok(Self {
            pipeline: Arc::new(pipeline),
            profiles,
        })
    }
}
