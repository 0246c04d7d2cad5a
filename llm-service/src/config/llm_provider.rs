use crate::error_handler::{AiLlmError, ConfigError};

/// Represents the provider (backend) used for large language model (LLM) inference.
///
/// This enum distinguishes between OpenAI's REST API and a local Ollama
/// runtime. Adding more providers in the future (e.g., Anthropic, Mistral API)
/// can be done by extending this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LlmProvider {
    /// OpenAI REST API (hosted).
    OpenAi,
    /// Local Ollama runtime for on-device inference.
    Ollama,
}

impl LlmProvider {
    /// Parses a provider kind from its environment-variable spelling.
    ///
    /// Accepted values (case-insensitive): `openai`, `ollama`.
    ///
    /// # Errors
    /// Returns [`ConfigError::UnsupportedProvider`] for anything else.
    pub fn parse(value: &str) -> Result<Self, AiLlmError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(LlmProvider::OpenAi),
            "ollama" => Ok(LlmProvider::Ollama),
            other => Err(ConfigError::UnsupportedProvider(other.to_string()).into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_providers() {
        assert_eq!(LlmProvider::parse("openai").ok(), Some(LlmProvider::OpenAi));
        assert_eq!(LlmProvider::parse("OLLAMA").ok(), Some(LlmProvider::Ollama));
        assert_eq!(LlmProvider::parse(" openai ").ok(), Some(LlmProvider::OpenAi));
    }

    #[test]
    fn rejects_unknown_provider() {
        assert!(LlmProvider::parse("bedrock").is_err());
        assert!(LlmProvider::parse("").is_err());
    }
}
