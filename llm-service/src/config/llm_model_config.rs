use crate::config::llm_provider::LlmProvider;

/// Configuration for an LLM model invocation.
///
/// This struct contains both general and provider-specific parameters.
/// It can be extended as needed to support new backends or features.
///
/// # Fields
///
/// - `provider`: Which LLM provider/backend to use (e.g., OpenAI, Ollama).
/// - `model`: The model identifier (e.g., `"gpt-3.5-turbo"`, `"qwen3:14b"`).
/// - `endpoint`: The inference endpoint (local server or remote API URL).
/// - `api_key`: Optional API key for providers that require authentication.
/// - `max_tokens`: Maximum number of tokens to generate (if supported).
/// - `temperature`: Controls randomness (0.0 = deterministic, >1.0 = more random).
/// - `top_p`: Nucleus sampling cutoff (alternative to temperature).
/// - `timeout_secs`: Optional request timeout in seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct LlmModelConfig {
    /// The LLM provider/backend (e.g., OpenAI, Ollama).
    pub provider: LlmProvider,

    /// Model identifier string (e.g., `"gpt-3.5-turbo"`, `"qwen3:14b"`).
    pub model: String,

    /// Inference endpoint (local socket/URL or remote API URL).
    pub endpoint: String,

    /// Optional API key for authentication (e.g., OpenAI).
    pub api_key: Option<String>,

    /// Maximum number of tokens to generate.
    pub max_tokens: Option<u32>,

    /// Sampling temperature (controls creativity).
    pub temperature: Option<f32>,

    /// Nucleus sampling parameter.
    pub top_p: Option<f32>,

    /// Optional request timeout (in seconds).
    pub timeout_secs: Option<u64>,
}
