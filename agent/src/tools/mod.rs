//! Tool surface the reasoning model can call.
//!
//! Tools never abort a run. Every failure folds into a
//! `{"status": "error", ...}` payload that goes back to the model as the
//! tool result, so the model can read the problem and adjust its plan.

mod current_date;
mod fetch_transcript;
mod search_videos;
mod send_email;
mod store_record;

pub use current_date::CurrentDate;
pub use fetch_transcript::FetchTranscript;
pub use search_videos::SearchVideos;
pub use send_email::SendEmail;
pub use store_record::StorePodcastRecord;

use async_trait::async_trait;
use llm_service::{ChatMessage, ToolCallRequest, ToolSpec};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{debug, warn};

/// One callable capability exposed to the model.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Wire name the model uses to call this tool.
    fn name(&self) -> &'static str;

    /// One-line purpose shown to the model.
    fn description(&self) -> &'static str;

    /// JSON schema of the arguments object.
    fn parameters(&self) -> Value;

    /// Runs the tool. Never fails; errors come back as payloads.
    async fn invoke(&self, args: Value) -> Value;
}

/// Failure payload shared by all tools.
pub(crate) fn error_payload(message: impl Into<String>) -> Value {
    json!({ "status": "error", "error": message.into() })
}

/// Name-indexed tool set for one agent.
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new(tools: Vec<Arc<dyn Tool>>) -> Self {
        Self { tools }
    }

    /// Declarations advertised to the model on every reasoning turn.
    pub fn specs(&self) -> Vec<ToolSpec> {
        self.tools
            .iter()
            .map(|tool| ToolSpec::function(tool.name(), tool.description(), tool.parameters()))
            .collect()
    }

    /// Executes one requested call and wraps the result as a tool message.
    ///
    /// An unknown tool name produces an error payload instead of failing the
    /// run. Models occasionally hallucinate names and recover once told.
    pub async fn dispatch(&self, call: &ToolCallRequest) -> ChatMessage {
        let name = call.function.name.as_str();
        let result = match self.tools.iter().find(|tool| tool.name() == name) {
            Some(tool) => {
                debug!("Dispatching tool '{name}'");
                tool.invoke(call.arguments_json()).await
            }
            None => {
                warn!("Model requested unknown tool '{name}'");
                error_payload(format!("unknown tool '{name}'"))
            }
        };
        ChatMessage::tool(call.id.clone(), result.to_string())
    }
}
