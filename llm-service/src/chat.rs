//! Provider-neutral chat types, including function/tool calling.
//!
//! These types mirror the OpenAI chat wire shapes closely enough to serialize
//! straight into `/v1/chat/completions`, while the Ollama client maps its own
//! wire format onto them. Callers (the discovery agent in particular) build a
//! transcript of [`ChatMessage`] values, offer a set of [`ToolSpec`]s, and get
//! back a [`ChatOutcome`] that either carries final text or tool invocations
//! to dispatch.

use serde::{Deserialize, Serialize};

/// A single message in a chat transcript.
///
/// `content` is optional because assistant messages that carry tool calls may
/// have no text, and `tool_calls`/`tool_call_id` are populated only on the
/// relevant roles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// One of: "system" | "user" | "assistant" | "tool".
    pub role: String,

    /// Plain text content, when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    /// Tool invocations requested by the assistant (assistant role only).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCallRequest>,

    /// Id of the tool call this message answers (tool role only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl ChatMessage {
    /// System instruction message.
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: "system".into(),
            content: Some(text.into()),
            tool_calls: Vec::new(),
            tool_call_id: None,
        }
    }

    /// User message.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: "user".into(),
            content: Some(text.into()),
            tool_calls: Vec::new(),
            tool_call_id: None,
        }
    }

    /// Plain assistant message.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: "assistant".into(),
            content: Some(text.into()),
            tool_calls: Vec::new(),
            tool_call_id: None,
        }
    }

    /// Assistant message that requests tool invocations.
    ///
    /// Providers require this echo of the request before the matching
    /// tool-result messages.
    pub fn assistant_tool_calls(content: Option<String>, calls: Vec<ToolCallRequest>) -> Self {
        Self {
            role: "assistant".into(),
            content,
            tool_calls: calls,
            tool_call_id: None,
        }
    }

    /// Tool-result message answering the call with `call_id`.
    pub fn tool(call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: "tool".into(),
            content: Some(content.into()),
            tool_calls: Vec::new(),
            tool_call_id: Some(call_id.into()),
        }
    }
}

/// A callable tool offered to the model.
#[derive(Debug, Clone, Serialize)]
pub struct ToolSpec {
    #[serde(rename = "type")]
    kind: &'static str,
    function: ToolFunctionSpec,
}

/// The function payload inside a [`ToolSpec`].
#[derive(Debug, Clone, Serialize)]
pub struct ToolFunctionSpec {
    /// Tool name the model will reference in calls.
    pub name: String,
    /// One-paragraph description the model uses to pick tools.
    pub description: String,
    /// JSON schema of the arguments object.
    pub parameters: serde_json::Value,
}

impl ToolSpec {
    /// Declares a function-style tool.
    pub fn function(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: serde_json::Value,
    ) -> Self {
        Self {
            kind: "function",
            function: ToolFunctionSpec {
                name: name.into(),
                description: description.into(),
                parameters,
            },
        }
    }

    /// The declared tool name.
    pub fn name(&self) -> &str {
        &self.function.name
    }
}

/// A tool invocation requested by the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallRequest {
    /// Provider-assigned call id, echoed back in the tool-result message.
    pub id: String,
    #[serde(rename = "type", default = "default_call_kind")]
    pub kind: String,
    /// Which function to invoke, and with what arguments.
    pub function: ToolCallFunction,
}

/// The function reference inside a [`ToolCallRequest`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallFunction {
    /// Tool name as declared in the matching [`ToolSpec`].
    pub name: String,
    /// JSON-encoded arguments object, exactly as delivered by the provider.
    pub arguments: String,
}

impl ToolCallRequest {
    /// Parses the arguments string into JSON, `Null` when it is not valid JSON.
    ///
    /// Models occasionally emit malformed argument payloads; dispatching with
    /// `Null` lets the tool reply with a structured error instead of the loop
    /// aborting.
    pub fn arguments_json(&self) -> serde_json::Value {
        serde_json::from_str(&self.function.arguments).unwrap_or(serde_json::Value::Null)
    }
}

fn default_call_kind() -> String {
    "function".to_string()
}

/// The model's reply to one chat turn.
#[derive(Debug, Clone)]
pub struct ChatOutcome {
    /// Final (or interim) text content, when present.
    pub content: Option<String>,
    /// Tool invocations the caller is expected to perform. Empty means the
    /// turn is final.
    pub tool_calls: Vec<ToolCallRequest>,
}

impl ChatOutcome {
    /// True when the model requested at least one tool invocation.
    pub fn wants_tools(&self) -> bool {
        !self.tool_calls.is_empty()
    }

    /// Converts the outcome into the assistant message that must be appended
    /// to the transcript before tool results.
    pub fn into_message(self) -> ChatMessage {
        if self.tool_calls.is_empty() {
            ChatMessage::assistant(self.content.unwrap_or_default())
        } else {
            ChatMessage::assistant_tool_calls(self.content, self.tool_calls)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn user_message_serializes_minimal_shape() {
        let msg = ChatMessage::user("hello");
        let v = serde_json::to_value(&msg).unwrap();
        assert_eq!(v, json!({ "role": "user", "content": "hello" }));
    }

    #[test]
    fn tool_message_carries_call_id() {
        let msg = ChatMessage::tool("call_1", "{\"status\":\"success\"}");
        let v = serde_json::to_value(&msg).unwrap();
        assert_eq!(v["role"], "tool");
        assert_eq!(v["tool_call_id"], "call_1");
    }

    #[test]
    fn tool_spec_uses_function_wire_shape() {
        let spec = ToolSpec::function(
            "current_date",
            "Returns the current date.",
            json!({ "type": "object", "properties": {} }),
        );
        let v = serde_json::to_value(&spec).unwrap();
        assert_eq!(v["type"], "function");
        assert_eq!(v["function"]["name"], "current_date");
        assert!(v["function"]["parameters"].is_object());
    }

    #[test]
    fn tool_call_request_parses_from_provider_json() {
        let raw = json!({
            "id": "call_abc",
            "type": "function",
            "function": { "name": "search_videos", "arguments": "{\"query\":\"ai podcast\"}" }
        });
        let call: ToolCallRequest = serde_json::from_value(raw).unwrap();
        assert_eq!(call.function.name, "search_videos");
        assert_eq!(call.arguments_json()["query"], "ai podcast");
    }

    #[test]
    fn malformed_arguments_parse_to_null() {
        let call = ToolCallRequest {
            id: "call_x".into(),
            kind: "function".into(),
            function: ToolCallFunction {
                name: "send_email".into(),
                arguments: "{not json".into(),
            },
        };
        assert!(call.arguments_json().is_null());
    }

    #[test]
    fn outcome_with_tool_calls_becomes_assistant_echo() {
        let outcome = ChatOutcome {
            content: None,
            tool_calls: vec![ToolCallRequest {
                id: "call_1".into(),
                kind: "function".into(),
                function: ToolCallFunction {
                    name: "current_date".into(),
                    arguments: "{}".into(),
                },
            }],
        };
        assert!(outcome.wants_tools());
        let msg = outcome.into_message();
        assert_eq!(msg.role, "assistant");
        assert_eq!(msg.tool_calls.len(), 1);
        assert!(msg.content.is_none());
    }
}
