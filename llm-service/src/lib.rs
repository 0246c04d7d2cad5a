//! Shared LLM service with providers (OpenAI/Ollama), unified errors, health
//! checks, and answer/reasoning/embedding profiles.
//!
//! The crate is organized around [`service_profiles::LlmServiceProfiles`]:
//! construct it once (usually via [`service_profiles::LlmServiceProfiles::from_env`]),
//! wrap it in an `Arc`, and hand clones to the pipelines that need generation,
//! tool-calling reasoning turns, or embeddings.

pub mod chat;
pub mod config;
pub mod error_handler;
pub mod health_service;
pub mod service_profiles;
pub mod services;

pub use chat::{ChatMessage, ChatOutcome, ToolCallFunction, ToolCallRequest, ToolSpec};
pub use config::llm_model_config::LlmModelConfig;
pub use config::llm_provider::LlmProvider;
pub use error_handler::AiLlmError;
pub use health_service::HealthStatus;
pub use service_profiles::LlmServiceProfiles;
