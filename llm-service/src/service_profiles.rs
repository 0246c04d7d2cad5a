//! Shared LLM service with three active profiles: `answer`, `reasoning`, and `embedding`.
//!
//! - Lives in the same Tokio runtime as the application.
//! - Construct once, wrap in `Arc`, and pass clones to dependents.
//! - Caches underlying HTTP clients per config (endpoint+model+key+timeout).
//! - Provides convenience methods for single-shot answering, tool-calling
//!   reasoning turns, and embeddings.
//! - If the `reasoning` profile is not provided, it falls back to `answer`.
//!
//! # Example
//! ```no_run
//! use std::sync::Arc;
//! use llm_service::service_profiles::LlmServiceProfiles;
//! use llm_service::config::llm_model_config::LlmModelConfig;
//! use llm_service::config::llm_provider::LlmProvider;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let answer = LlmModelConfig {
//!         provider: LlmProvider::Ollama,
//!         model: "qwen3:14b".into(),
//!         endpoint: "http://localhost:11434".into(),
//!         api_key: None,
//!         max_tokens: Some(512),
//!         temperature: Some(0.7),
//!         top_p: Some(0.9),
//!         timeout_secs: Some(30),
//!     };
//!
//!     let embedding = LlmModelConfig { ..answer.clone() };
//!
//!     let svc = Arc::new(LlmServiceProfiles::new(answer, None, embedding, Some(10))?);
//!
//!     let txt = svc.generate_answer("Hello world", None).await?;
//!     println!("ANSWER: {}", txt);
//!
//!     let emb = svc.embed("Ferris").await?;
//!     println!("Embedding dim = {}", emb.len());
//!
//!     let statuses = svc.health_all().await?;
//!     println!("Health = {:?}", statuses);
//!
//!     Ok(())
//! }
//! ```

use std::{
    collections::HashMap,
    hash::{Hash, Hasher},
    sync::Arc,
};

use tokio::sync::RwLock;

use crate::{
    chat::{ChatMessage, ChatOutcome, ToolSpec},
    config::{
        default_config, llm_model_config::LlmModelConfig, llm_provider::LlmProvider,
    },
    error_handler::AiLlmError,
    health_service::{HealthService, HealthStatus},
    services::{ollama_service::OllamaService, open_ai_service::OpenAiService},
};

/// Shared service that manages three logical LLM profiles: **answer**,
/// **reasoning**, and **embedding**.
///
/// Internally, it caches Ollama/OpenAI clients keyed by their configuration to
/// avoid recreating HTTP clients on each call.
pub struct LlmServiceProfiles {
    answer: LlmModelConfig,
    reasoning: LlmModelConfig,
    embedding: LlmModelConfig,

    ollama: RwLock<HashMap<ClientKey, Arc<OllamaService>>>,
    openai: RwLock<HashMap<ClientKey, Arc<OpenAiService>>>,

    health: HealthService,
}

impl LlmServiceProfiles {
    /// Creates a new service with three profiles.
    ///
    /// - `answer`: required single-shot answering profile.
    /// - `reasoning_opt`: optional tool-calling profile. If `None`, falls back to `answer`.
    /// - `embedding`: required embedding profile.
    /// - `health_timeout_secs`: optional timeout for the health checker.
    pub fn new(
        answer: LlmModelConfig,
        reasoning_opt: Option<LlmModelConfig>,
        embedding: LlmModelConfig,
        health_timeout_secs: Option<u64>,
    ) -> Result<Self, AiLlmError> {
        let reasoning = reasoning_opt.unwrap_or_else(|| answer.clone());

        Ok(Self {
            answer,
            reasoning,
            embedding,
            ollama: RwLock::new(HashMap::new()),
            openai: RwLock::new(HashMap::new()),
            health: HealthService::new(health_timeout_secs)?,
        })
    }

    /// Builds all three profiles from environment variables.
    ///
    /// `LLM_KIND` selects the provider family (`openai` default, `ollama`);
    /// the role constructors in [`default_config`] supply models, endpoints,
    /// and sampling defaults.
    ///
    /// # Errors
    /// Returns [`AiLlmError::Config`] when required variables are missing or
    /// malformed.
    pub fn from_env() -> Result<Self, AiLlmError> {
        let kind = default_config::provider_kind()?;
        let (answer, reasoning, embedding) = match kind {
            LlmProvider::OpenAi => (
                default_config::config_openai_answer()?,
                default_config::config_openai_reasoning()?,
                default_config::config_openai_embedding()?,
            ),
            LlmProvider::Ollama => (
                default_config::config_ollama_answer()?,
                default_config::config_ollama_reasoning()?,
                default_config::config_ollama_embedding()?,
            ),
        };
        Self::new(answer, Some(reasoning), embedding, None)
    }

    /// Generates text using the **answer** profile.
    ///
    /// # Arguments
    /// - `prompt`: input text prompt.
    /// - `system`: optional system instruction (applies to chat-style providers).
    ///
    /// # Errors
    /// Returns [`AiLlmError`] if generation fails.
    pub async fn generate_answer(
        &self,
        prompt: &str,
        system: Option<&str>,
    ) -> Result<String, AiLlmError> {
        match self.answer.provider {
            LlmProvider::Ollama => {
                let cli = self.get_or_init_ollama(&self.answer).await?;
                cli.generate(prompt).await
            }
            LlmProvider::OpenAi => {
                let cli = self.get_or_init_openai(&self.answer).await?;
                cli.generate(prompt, system).await
            }
        }
    }

    /// Runs one tool-calling turn using the **reasoning** profile.
    ///
    /// Falls back to the answer profile if no reasoning profile was specified
    /// at creation.
    ///
    /// # Errors
    /// Returns [`AiLlmError`] if the turn fails.
    pub async fn reason_step(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolSpec],
    ) -> Result<ChatOutcome, AiLlmError> {
        match self.reasoning.provider {
            LlmProvider::Ollama => {
                let cli = self.get_or_init_ollama(&self.reasoning).await?;
                cli.chat(messages, tools).await
            }
            LlmProvider::OpenAi => {
                let cli = self.get_or_init_openai(&self.reasoning).await?;
                cli.chat(messages, tools).await
            }
        }
    }

    /// Computes embeddings using the **embedding** profile.
    ///
    /// # Arguments
    /// - `input`: text to embed.
    ///
    /// # Errors
    /// Returns [`AiLlmError`] if embedding fails.
    pub async fn embed(&self, input: &str) -> Result<Vec<f32>, AiLlmError> {
        match self.embedding.provider {
            LlmProvider::Ollama => {
                let cli = self.get_or_init_ollama(&self.embedding).await?;
                cli.embeddings(input).await
            }
            LlmProvider::OpenAi => {
                let cli = self.get_or_init_openai(&self.embedding).await?;
                cli.embeddings(input).await
            }
        }
    }

    /// Returns a health snapshot for all distinct profiles.
    ///
    /// If the reasoning profile equals the answer profile, it is checked only once.
    pub async fn health_all(&self) -> Result<Vec<HealthStatus>, AiLlmError> {
        let mut list = Vec::<LlmModelConfig>::with_capacity(3);
        list.push(self.answer.clone());
        if self.reasoning != self.answer {
            list.push(self.reasoning.clone());
        }
        if self.embedding != self.answer && self.embedding != self.reasoning {
            list.push(self.embedding.clone());
        }
        Ok(self.health.check_many(&list).await)
    }

    /// Returns references to the current profiles `(answer, reasoning, embedding)`.
    pub fn profiles(&self) -> (&LlmModelConfig, &LlmModelConfig, &LlmModelConfig) {
        (&self.answer, &self.reasoning, &self.embedding)
    }

    /* --------------------- Internals --------------------- */

    async fn get_or_init_ollama(
        &self,
        cfg: &LlmModelConfig,
    ) -> Result<Arc<OllamaService>, AiLlmError> {
        let key = ClientKey::from(cfg);
        if let Some(cli) = self.ollama.read().await.get(&key).cloned() {
            return Ok(cli);
        }
        let mut w = self.ollama.write().await;
        if let Some(cli) = w.get(&key).cloned() {
            return Ok(cli);
        }
        let cli = Arc::new(OllamaService::new(cfg.clone())?);
        w.insert(key, cli.clone());
        Ok(cli)
    }

    async fn get_or_init_openai(
        &self,
        cfg: &LlmModelConfig,
    ) -> Result<Arc<OpenAiService>, AiLlmError> {
        let key = ClientKey::from(cfg);
        if let Some(cli) = self.openai.read().await.get(&key).cloned() {
            return Ok(cli);
        }
        let mut w = self.openai.write().await;
        if let Some(cli) = w.get(&key).cloned() {
            return Ok(cli);
        }
        let cli = Arc::new(OpenAiService::new(cfg.clone())?);
        w.insert(key, cli.clone());
        Ok(cli)
    }
}

/// Internal cache key to identify unique client configs.
#[derive(Debug, Clone, Eq)]
struct ClientKey {
    provider: LlmProvider,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    timeout: Option<u64>,
}

impl From<&LlmModelConfig> for ClientKey {
    fn from(cfg: &LlmModelConfig) -> Self {
        Self {
            provider: cfg.provider,
            endpoint: cfg.endpoint.clone(),
            model: cfg.model.clone(),
            api_key: cfg.api_key.clone(),
            timeout: cfg.timeout_secs,
        }
    }
}

impl PartialEq for ClientKey {
    fn eq(&self, other: &Self) -> bool {
        self.provider == other.provider
            && self.endpoint == other.endpoint
            && self.model == other.model
            && self.api_key == other.api_key
            && self.timeout == other.timeout
    }
}

impl Hash for ClientKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.provider.hash(state);
        self.endpoint.hash(state);
        self.model.hash(state);
        if let Some(ref k) = self.api_key {
            k.hash(state);
        } else {
            0usize.hash(state);
        }
        self.timeout.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(model: &str) -> LlmModelConfig {
        LlmModelConfig {
            provider: LlmProvider::Ollama,
            model: model.into(),
            endpoint: "http://localhost:11434".into(),
            api_key: None,
            max_tokens: None,
            temperature: Some(0.7),
            top_p: None,
            timeout_secs: Some(5),
        }
    }

    #[test]
    fn reasoning_falls_back_to_answer() {
        let svc =
            LlmServiceProfiles::new(cfg("answer-model"), None, cfg("embed-model"), None).unwrap();
        let (answer, reasoning, _) = svc.profiles();
        assert_eq!(answer, reasoning);
    }

    #[test]
    fn client_key_distinguishes_models() {
        let a = ClientKey::from(&cfg("model-a"));
        let b = ClientKey::from(&cfg("model-b"));
        let a2 = ClientKey::from(&cfg("model-a"));
        assert_ne!(a, b);
        assert_eq!(a, a2);
    }

    #[tokio::test]
    async fn client_cache_returns_same_instance() {
        let svc =
            LlmServiceProfiles::new(cfg("answer-model"), None, cfg("embed-model"), None).unwrap();
        let first = svc.get_or_init_ollama(&svc.answer).await.unwrap();
        let second = svc.get_or_init_ollama(&svc.answer).await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }
}
