//! Default LLM configs loaded strictly from environment variables.
//!
//! This module provides convenience constructors for [`LlmModelConfig`],
//! grouped by provider and role. Two providers are supported, **OpenAI**
//! (the default) and **Ollama**, each with three roles:
//!
//! - **Answer**    → single-shot answering over retrieved context
//! - **Reasoning** → tool-calling model driving the discovery agent
//! - **Embedding** → embedding generator for the vector index
//!
//! # Environment variables
//!
//! Common:
//! - `LLM_KIND`         = provider kind (`openai` | `ollama`), default `openai`
//! - `ANSWER_MODEL`     = answer model (default `gpt-3.5-turbo`)
//! - `REASONING_MODEL`  = reasoning model (default `o4-mini`)
//! - `EMBEDDING_MODEL`  = embedding model (default `text-embedding-3-large`)
//! - `LLM_MAX_TOKENS`   = optional max tokens (u32)
//! - `LLM_TIMEOUT_SECS` = optional request timeout (u64)
//!
//! OpenAI-specific:
//! - `OPENAI_API_KEY` = API key (mandatory)
//! - `OPENAI_URL`     = endpoint base (default `https://api.openai.com`)
//!
//! Ollama-specific:
//! - `OLLAMA_URL` or `OLLAMA_PORT` = endpoint (mandatory)

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{
        AiLlmError, ConfigError, env_opt_u32, env_opt_u64, env_or, must_env,
        validate_http_endpoint, validate_range_f32,
    },
};

const DEFAULT_OPENAI_URL: &str = "https://api.openai.com";
const DEFAULT_ANSWER_MODEL: &str = "gpt-3.5-turbo";
const DEFAULT_REASONING_MODEL: &str = "o4-mini";
const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-large";

/// Answer-role sampling temperature.
const ANSWER_TEMPERATURE: f32 = 0.7;

/// Reads the provider kind from `LLM_KIND` (default `openai`).
///
/// # Errors
/// Returns [`ConfigError::UnsupportedProvider`] for unknown values.
pub fn provider_kind() -> Result<LlmProvider, AiLlmError> {
    LlmProvider::parse(&env_or("LLM_KIND", "openai"))
}

/// Resolves the OpenAI endpoint and API key strictly from environment.
///
/// # Errors
/// - [`ConfigError::MissingVar`] if `OPENAI_API_KEY` is missing
/// - [`ConfigError::InvalidFormat`] if `OPENAI_URL` lacks an http scheme
fn openai_base() -> Result<(String, String), AiLlmError> {
    let api_key = must_env("OPENAI_API_KEY")?;
    let endpoint = env_or("OPENAI_URL", DEFAULT_OPENAI_URL);
    validate_http_endpoint("OPENAI_URL", &endpoint)?;
    Ok((endpoint, api_key))
}

/// Resolves the Ollama endpoint strictly from environment.
///
/// Precedence:
/// 1. `OLLAMA_URL` if present and non-empty
/// 2. `OLLAMA_PORT` → `http://localhost:{port}`
///
/// # Errors
/// - [`ConfigError::MissingVar`] if both are missing
/// - [`ConfigError::InvalidNumber`] if `OLLAMA_PORT` is invalid
fn ollama_endpoint() -> Result<String, AiLlmError> {
    if let Ok(url) = std::env::var("OLLAMA_URL") {
        if !url.trim().is_empty() {
            return Ok(url);
        }
    }
    if let Ok(port) = std::env::var("OLLAMA_PORT") {
        if !port.trim().is_empty() {
            let _ = port
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidNumber {
                    var: "OLLAMA_PORT",
                    reason: "expected u16 (1..=65535)",
                })?;
            return Ok(format!("http://localhost:{port}"));
        }
    }
    Err(AiLlmError::Config(ConfigError::MissingVar(
        "OLLAMA_URL or OLLAMA_PORT",
    )))
}

/// Constructs the config for the **answer** role on OpenAI.
///
/// # Env
/// - `OPENAI_API_KEY` (required), `OPENAI_URL`, `ANSWER_MODEL`,
///   `LLM_MAX_TOKENS`, `LLM_TIMEOUT_SECS`
///
/// # Defaults
/// - `temperature = Some(0.7)`
/// - `timeout_secs = Some(60)`
pub fn config_openai_answer() -> Result<LlmModelConfig, AiLlmError> {
    let (endpoint, api_key) = openai_base()?;
    let model = env_or("ANSWER_MODEL", DEFAULT_ANSWER_MODEL);
    let max_tokens = env_opt_u32("LLM_MAX_TOKENS")?;
    let timeout_secs = env_opt_u64("LLM_TIMEOUT_SECS")?.or(Some(60));

    validate_range_f32("temperature", ANSWER_TEMPERATURE, 0.0, 2.0)?;

    Ok(LlmModelConfig {
        provider: LlmProvider::OpenAi,
        model,
        endpoint,
        api_key: Some(api_key),
        max_tokens,
        temperature: Some(ANSWER_TEMPERATURE),
        top_p: None,
        timeout_secs,
    })
}

/// Constructs the config for the **reasoning** role on OpenAI.
///
/// Reasoning-class models reject explicit sampling parameters, so
/// `temperature`/`top_p` are left unset.
///
/// # Env
/// - `OPENAI_API_KEY` (required), `OPENAI_URL`, `REASONING_MODEL`,
///   `LLM_TIMEOUT_SECS`
///
/// # Defaults
/// - `timeout_secs = Some(120)` (tool-calling turns run longer)
pub fn config_openai_reasoning() -> Result<LlmModelConfig, AiLlmError> {
    let (endpoint, api_key) = openai_base()?;
    let model = env_or("REASONING_MODEL", DEFAULT_REASONING_MODEL);
    let timeout_secs = env_opt_u64("LLM_TIMEOUT_SECS")?.or(Some(120));

    Ok(LlmModelConfig {
        provider: LlmProvider::OpenAi,
        model,
        endpoint,
        api_key: Some(api_key),
        max_tokens: None,
        temperature: None,
        top_p: None,
        timeout_secs,
    })
}

/// Constructs the config for the **embedding** role on OpenAI.
///
/// # Env
/// - `OPENAI_API_KEY` (required), `OPENAI_URL`, `EMBEDDING_MODEL`
///
/// # Defaults
/// - `timeout_secs = Some(30)`
pub fn config_openai_embedding() -> Result<LlmModelConfig, AiLlmError> {
    let (endpoint, api_key) = openai_base()?;
    let model = env_or("EMBEDDING_MODEL", DEFAULT_EMBEDDING_MODEL);

    Ok(LlmModelConfig {
        provider: LlmProvider::OpenAi,
        model,
        endpoint,
        api_key: Some(api_key),
        max_tokens: None,
        temperature: None,
        top_p: None,
        timeout_secs: Some(30),
    })
}

/// Constructs the config for the **answer** role on Ollama.
///
/// # Env
/// - `OLLAMA_URL` or `OLLAMA_PORT` (required), `ANSWER_MODEL` (required),
///   `LLM_MAX_TOKENS`, `LLM_TIMEOUT_SECS`
pub fn config_ollama_answer() -> Result<LlmModelConfig, AiLlmError> {
    let endpoint = ollama_endpoint()?;
    let model = must_env("ANSWER_MODEL")?;
    let max_tokens = env_opt_u32("LLM_MAX_TOKENS")?;
    let timeout_secs = env_opt_u64("LLM_TIMEOUT_SECS")?.or(Some(600));

    validate_range_f32("temperature", ANSWER_TEMPERATURE, 0.0, 2.0)?;

    Ok(LlmModelConfig {
        provider: LlmProvider::Ollama,
        model,
        endpoint,
        api_key: None,
        max_tokens,
        temperature: Some(ANSWER_TEMPERATURE),
        top_p: Some(0.9),
        timeout_secs,
    })
}

/// Constructs the config for the **reasoning** role on Ollama.
///
/// # Env
/// - `OLLAMA_URL` or `OLLAMA_PORT` (required), `REASONING_MODEL` (required),
///   `LLM_TIMEOUT_SECS`
///
/// # Defaults
/// - `temperature = Some(0.2)` (keep tool selection stable)
pub fn config_ollama_reasoning() -> Result<LlmModelConfig, AiLlmError> {
    let endpoint = ollama_endpoint()?;
    let model = must_env("REASONING_MODEL")?;
    let timeout_secs = env_opt_u64("LLM_TIMEOUT_SECS")?.or(Some(600));

    Ok(LlmModelConfig {
        provider: LlmProvider::Ollama,
        model,
        endpoint,
        api_key: None,
        max_tokens: None,
        temperature: Some(0.2),
        top_p: None,
        timeout_secs,
    })
}

/// Constructs the config for the **embedding** role on Ollama.
///
/// # Env
/// - `OLLAMA_URL` or `OLLAMA_PORT` (required), `EMBEDDING_MODEL` (required)
///
/// # Defaults
/// - `temperature = Some(0.0)` (deterministic)
/// - `timeout_secs = Some(30)`
pub fn config_ollama_embedding() -> Result<LlmModelConfig, AiLlmError> {
    let endpoint = ollama_endpoint()?;
    let model = must_env("EMBEDDING_MODEL")?;

    Ok(LlmModelConfig {
        provider: LlmProvider::Ollama,
        model,
        endpoint,
        api_key: None,
        max_tokens: None,
        temperature: Some(0.0),
        top_p: None,
        timeout_secs: Some(30),
    })
}
