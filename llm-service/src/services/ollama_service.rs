//! Lightweight Ollama service for text generation, tool-calling chat, and embeddings.
//!
//! This module implements a thin client for the local Ollama API:
//! - `POST {endpoint}/api/generate`   — synchronous text generation (`stream=false`)
//! - `POST {endpoint}/api/chat`       — transcript completion with tool calling
//! - `POST {endpoint}/api/embeddings` — embeddings retrieval
//!
//! It uses the universal configuration [`LlmModelConfig`] and ensures
//! that the selected provider is [`LlmProvider::Ollama`].
//!
//! Ollama's tool-call wire shape differs from OpenAI's (no call ids,
//! arguments as a JSON object instead of a string), so this client maps both
//! directions onto the provider-neutral types in [`crate::chat`].

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::chat::{ChatMessage, ChatOutcome, ToolCallFunction, ToolCallRequest, ToolSpec};
use crate::config::llm_model_config::LlmModelConfig;
use crate::config::llm_provider::LlmProvider;
use crate::error_handler::{
    AiLlmError, HttpError, Provider, ProviderError, ProviderErrorKind, make_snippet,
};

/// Thin client for Ollama.
///
/// Initialized with a full [`LlmModelConfig`]. Reuses an HTTP client with
/// a configurable timeout. Provides high-level calls:
/// - [`OllamaService::generate`]   — synchronous text generation
/// - [`OllamaService::chat`]       — transcript completion with tools
/// - [`OllamaService::embeddings`] — embeddings retrieval
pub struct OllamaService {
    client: reqwest::Client,
    cfg: LlmModelConfig,
    url_generate: String,
    url_chat: String,
    url_embeddings: String,
}

impl OllamaService {
    /// Creates a new [`OllamaService`] from the given config.
    ///
    /// # Errors
    /// - [`AiLlmError::Provider`] with `InvalidProvider` if `cfg.provider` is not Ollama
    /// - [`AiLlmError::Provider`] with `InvalidEndpoint` if `cfg.endpoint` is invalid
    /// - [`AiLlmError::HttpTransport`] if the HTTP client cannot be built
    pub fn new(cfg: LlmModelConfig) -> Result<Self, AiLlmError> {
        if cfg.provider != LlmProvider::Ollama {
            return Err(
                ProviderError::new(Provider::Ollama, ProviderErrorKind::InvalidProvider).into(),
            );
        }

        let endpoint = cfg.endpoint.trim();
        if endpoint.is_empty()
            || !(endpoint.starts_with("http://") || endpoint.starts_with("https://"))
        {
            return Err(ProviderError::new(
                Provider::Ollama,
                ProviderErrorKind::InvalidEndpoint(cfg.endpoint.clone()),
            )
            .into());
        }

        let timeout = cfg
            .timeout_secs
            .map(Duration::from_secs)
            .unwrap_or_else(|| Duration::from_secs(60));

        let client = reqwest::Client::builder().timeout(timeout).build()?;

        let base = endpoint.trim_end_matches('/').to_string();
        let url_generate = format!("{}/api/generate", base);
        let url_chat = format!("{}/api/chat", base);
        let url_embeddings = format!("{}/api/embeddings", base);

        Ok(Self {
            client,
            cfg,
            url_generate,
            url_chat,
            url_embeddings,
        })
    }

    /// Performs a **non-streaming** generation request via `/api/generate`.
    ///
    /// Mapped options:
    /// - `model`        ← `self.cfg.model`
    /// - `prompt`       ← argument
    /// - `num_predict`  ← `self.cfg.max_tokens`
    /// - `temperature`  ← `self.cfg.temperature`
    /// - `top_p`        ← `self.cfg.top_p`
    ///
    /// # Errors
    /// - [`AiLlmError::Provider`] with `HttpStatus` for non-2xx responses
    /// - [`AiLlmError::HttpTransport`] for client errors
    /// - [`AiLlmError::Provider`] with `Decode` if response cannot be parsed
    #[instrument(skip_all, fields(model = %self.cfg.model))]
    pub async fn generate(&self, prompt: &str) -> Result<String, AiLlmError> {
        let body = GenerateRequest::from_cfg(&self.cfg, prompt);

        debug!("POST {}", self.url_generate);
        let resp = self
            .client
            .post(&self.url_generate)
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(Self::status_error(resp, self.url_generate.clone()).await);
        }

        let out: GenerateResponse = resp.json().await.map_err(|e| {
            ProviderError::new(
                Provider::Ollama,
                ProviderErrorKind::Decode(format!(
                    "serde error: {e}; ensure `stream=false` is used"
                )),
            )
        })?;

        Ok(out.response)
    }

    /// Completes a full transcript via `/api/chat`, offering `tools`.
    ///
    /// Tool calls in the reply carry synthesized ids (`call_0`, `call_1` ...)
    /// because Ollama does not assign any; arguments objects are re-encoded
    /// to JSON strings to match the provider-neutral shape.
    ///
    /// # Errors
    /// - [`AiLlmError::Provider`] with `HttpStatus` for non-2xx responses
    /// - [`AiLlmError::HttpTransport`] for client errors
    /// - [`AiLlmError::Provider`] with `Decode` if response cannot be parsed
    #[instrument(skip_all, fields(model = %self.cfg.model))]
    pub async fn chat(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolSpec],
    ) -> Result<ChatOutcome, AiLlmError> {
        let wire_messages: Vec<OllamaChatMessage<'_>> =
            messages.iter().map(OllamaChatMessage::from).collect();

        let body = ChatRequest {
            model: &self.cfg.model,
            messages: wire_messages,
            tools,
            stream: false,
            options: Some(GenerateOptions {
                temperature: self.cfg.temperature,
                top_p: self.cfg.top_p,
                num_predict: self.cfg.max_tokens,
            }),
        };

        debug!(tools = tools.len(), "POST {}", self.url_chat);
        let resp = self.client.post(&self.url_chat).json(&body).send().await?;

        if !resp.status().is_success() {
            return Err(Self::status_error(resp, self.url_chat.clone()).await);
        }

        let out: ChatResponse = resp.json().await.map_err(|e| {
            ProviderError::new(
                Provider::Ollama,
                ProviderErrorKind::Decode(format!("serde error: {e}; expected `message` object")),
            )
        })?;

        let tool_calls = out
            .message
            .tool_calls
            .into_iter()
            .enumerate()
            .map(|(i, call)| ToolCallRequest {
                id: format!("call_{i}"),
                kind: "function".to_string(),
                function: ToolCallFunction {
                    name: call.function.name,
                    arguments: serde_json::to_string(&call.function.arguments)
                        .unwrap_or_else(|_| "{}".to_string()),
                },
            })
            .collect();

        Ok(ChatOutcome {
            content: out.message.content.filter(|c| !c.is_empty()),
            tool_calls,
        })
    }

    /// Retrieves embeddings via `/api/embeddings`.
    ///
    /// **Note:** Usually a dedicated embedding model is used. If you want to
    /// use a different one, create another [`OllamaService`] with the desired
    /// config.
    ///
    /// # Errors
    /// - [`AiLlmError::Provider`] with `HttpStatus` for non-2xx responses
    /// - [`AiLlmError::HttpTransport`] for client errors
    /// - [`AiLlmError::Provider`] with `Decode` if response cannot be parsed
    #[instrument(skip_all, fields(model = %self.cfg.model))]
    pub async fn embeddings(&self, input: &str) -> Result<Vec<f32>, AiLlmError> {
        let body = EmbeddingsRequest {
            model: &self.cfg.model,
            prompt: input,
        };

        debug!("POST {}", self.url_embeddings);
        let resp = self
            .client
            .post(&self.url_embeddings)
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(Self::status_error(resp, self.url_embeddings.clone()).await);
        }

        let out: EmbeddingsResponse = resp.json().await.map_err(|e| {
            ProviderError::new(
                Provider::Ollama,
                ProviderErrorKind::Decode(format!(
                    "serde error: {e}; expected `{{ embedding: number[] }}`"
                )),
            )
        })?;

        Ok(out.embedding)
    }

    /// Drains a non-2xx response into a tagged HTTP status error.
    async fn status_error(resp: reqwest::Response, url: String) -> AiLlmError {
        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();
        let snippet = make_snippet(&text);
        ProviderError::new(
            Provider::Ollama,
            ProviderErrorKind::HttpStatus(HttpError {
                status,
                url,
                snippet,
            }),
        )
        .into()
    }
}

/* ==========================
HTTP payloads & options
========================== */

/// Request body for `/api/generate` (non-streaming).
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<GenerateOptions>,
}

impl<'a> GenerateRequest<'a> {
    /// Builds a request from config and prompt.
    fn from_cfg(cfg: &'a LlmModelConfig, prompt: &'a str) -> Self {
        let options = GenerateOptions {
            temperature: cfg.temperature,
            top_p: cfg.top_p,
            num_predict: cfg.max_tokens,
        };

        Self {
            model: &cfg.model,
            prompt,
            stream: false,
            options: Some(options),
        }
    }
}

/// Subset of Ollama `options`.
///
/// Extend this struct as needed (top_k, stop sequences, penalties, etc.).
#[derive(Debug, Default, Serialize)]
struct GenerateOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

/// Response body for `/api/generate`.
///
/// Minimal shape: the generated text is in `response`.
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Request body for `/api/chat` (non-streaming).
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<OllamaChatMessage<'a>>,
    #[serde(skip_serializing_if = "<[ToolSpec]>::is_empty")]
    tools: &'a [ToolSpec],
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<GenerateOptions>,
}

/// Chat message in Ollama's wire shape.
#[derive(Debug, Serialize)]
struct OllamaChatMessage<'a> {
    role: &'a str,
    content: &'a str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tool_calls: Vec<OllamaToolCallOut>,
}

impl<'a> From<&'a ChatMessage> for OllamaChatMessage<'a> {
    fn from(msg: &'a ChatMessage) -> Self {
        let tool_calls = msg
            .tool_calls
            .iter()
            .map(|call| OllamaToolCallOut {
                function: OllamaFunctionOut {
                    name: call.function.name.clone(),
                    arguments: call.arguments_json(),
                },
            })
            .collect();

        Self {
            role: &msg.role,
            content: msg.content.as_deref().unwrap_or(""),
            tool_calls,
        }
    }
}

#[derive(Debug, Serialize)]
struct OllamaToolCallOut {
    function: OllamaFunctionOut,
}

#[derive(Debug, Serialize)]
struct OllamaFunctionOut {
    name: String,
    arguments: serde_json::Value,
}

/// Response body for `/api/chat`.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: OllamaChatMessageIn,
}

#[derive(Debug, Deserialize)]
struct OllamaChatMessageIn {
    content: Option<String>,
    #[serde(default)]
    tool_calls: Vec<OllamaToolCallIn>,
}

#[derive(Debug, Deserialize)]
struct OllamaToolCallIn {
    function: OllamaFunctionIn,
}

#[derive(Debug, Deserialize)]
struct OllamaFunctionIn {
    name: String,
    #[serde(default)]
    arguments: serde_json::Value,
}

/// Request body for `/api/embeddings`.
#[derive(Debug, Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

/// Response body for `/api/embeddings`.
#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    embedding: Vec<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ollama_cfg() -> LlmModelConfig {
        LlmModelConfig {
            provider: LlmProvider::Ollama,
            model: "qwen3:14b".into(),
            endpoint: "http://localhost:11434".into(),
            api_key: None,
            max_tokens: Some(256),
            temperature: Some(0.7),
            top_p: Some(0.9),
            timeout_secs: Some(5),
        }
    }

    #[test]
    fn new_accepts_valid_config() {
        assert!(OllamaService::new(ollama_cfg()).is_ok());
    }

    #[test]
    fn new_rejects_wrong_provider() {
        let cfg = LlmModelConfig {
            provider: LlmProvider::OpenAi,
            ..ollama_cfg()
        };
        assert!(OllamaService::new(cfg).is_err());
    }

    #[test]
    fn new_rejects_bad_endpoint() {
        let cfg = LlmModelConfig {
            endpoint: "localhost:11434".into(),
            ..ollama_cfg()
        };
        assert!(OllamaService::new(cfg).is_err());
    }

    #[test]
    fn chat_response_maps_object_arguments_to_string() {
        let raw = json!({
            "message": {
                "role": "assistant",
                "content": "",
                "tool_calls": [
                    { "function": { "name": "search_videos", "arguments": { "query": "ai" } } }
                ]
            }
        });
        let parsed: ChatResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(parsed.message.tool_calls.len(), 1);
        assert_eq!(parsed.message.tool_calls[0].function.name, "search_videos");
        assert_eq!(parsed.message.tool_calls[0].function.arguments["query"], "ai");
    }

    #[test]
    fn wire_message_defaults_missing_content_to_empty() {
        let msg = ChatMessage::assistant_tool_calls(
            None,
            vec![ToolCallRequest {
                id: "call_0".into(),
                kind: "function".into(),
                function: ToolCallFunction {
                    name: "current_date".into(),
                    arguments: "{}".into(),
                },
            }],
        );
        let wire = OllamaChatMessage::from(&msg);
        let v = serde_json::to_value(&wire).unwrap();
        assert_eq!(v["content"], "");
        assert_eq!(v["tool_calls"][0]["function"]["name"], "current_date");
        assert!(v["tool_calls"][0]["function"]["arguments"].is_object());
    }
}
