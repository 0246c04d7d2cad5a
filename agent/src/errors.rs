//! Unified error types for the crate.

use thiserror::Error;

/// Top-level error for discovery runs.
#[derive(Debug, Error)]
pub enum AgentError {
    /// Invalid or missing configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Language model failures (wrapped).
    #[error("llm error: {0}")]
    Llm(#[from] llm_service::AiLlmError),

    /// The shared HTTP client could not be built.
    #[error("http client error: {0}")]
    Http(String),

    /// The run consumed its reasoning budget without reaching a final answer.
    #[error("run exceeded the limit of {0} reasoning steps")]
    StepLimit(usize),
}
