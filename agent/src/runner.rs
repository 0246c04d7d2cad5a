//! Bounded reasoning loop driving a discovery run.
//!
//! A run walks an explicit three-phase machine. `Reasoning` asks the model
//! for its next move; when the model requests tool calls the run enters
//! `ToolDispatch`, appends every result to the transcript and returns to
//! `Reasoning`; when the model answers in plain text the run is `Terminal`.
//! The step budget is checked on every `Reasoning` entry, so a model that
//! loops on tools cannot run forever.

use crate::config::AgentConfig;
use crate::errors::AgentError;
use crate::prompt::SUMMARIZER_SYSTEM_PROMPT;
use crate::tools::{
    CurrentDate, FetchTranscript, SearchVideos, SendEmail, StorePodcastRecord, ToolRegistry,
};

use async_trait::async_trait;
use llm_service::{ChatMessage, ChatOutcome, LlmServiceProfiles, ToolCallRequest, ToolSpec};
use record_store::RecordStore;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Outbound HTTP budget for a single tool call. Transcripts can be large.
const TOOL_HTTP_TIMEOUT_SECS: u64 = 120;

/// One reasoning turn against a language model.
#[async_trait]
pub trait ReasoningModel: Send + Sync {
    async fn step(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolSpec],
    ) -> Result<ChatOutcome, AgentError>;
}

#[async_trait]
impl ReasoningModel for LlmServiceProfiles {
    async fn step(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolSpec],
    ) -> Result<ChatOutcome, AgentError> {
        Ok(self.reason_step(messages, tools).await?)
    }
}

/// Loop phases. Explicit so the budget check lives in exactly one place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Reasoning,
    ToolDispatch,
    Terminal,
}

/// Result of a completed run.
#[derive(Debug, Clone)]
pub struct AgentOutcome {
    /// The model's final report text.
    pub report: String,
    /// Reasoning turns consumed.
    pub steps: usize,
}

/// Drives the summarizer workflow: search, transcribe, report, deliver.
pub struct DiscoveryAgent {
    model: Arc<dyn ReasoningModel>,
    registry: ToolRegistry,
    max_steps: usize,
}

impl DiscoveryAgent {
    pub fn new(model: Arc<dyn ReasoningModel>, registry: ToolRegistry, max_steps: usize) -> Self {
        Self {
            model,
            registry,
            max_steps: max_steps.max(1),
        }
    }

    /// Wires the standard tool set from configuration.
    ///
    /// # Errors
    /// Returns `AgentError::Http` when the shared HTTP client cannot be
    /// built.
    pub fn with_default_tools(
        model: Arc<dyn ReasoningModel>,
        store: Arc<dyn RecordStore>,
        cfg: &AgentConfig,
    ) -> Result<Self, AgentError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(TOOL_HTTP_TIMEOUT_SECS))
            .build()
            .map_err(|e| AgentError::Http(e.to_string()))?;

        let registry = ToolRegistry::new(vec![
            Arc::new(SearchVideos::new(client.clone(), cfg)),
            Arc::new(FetchTranscript::new(client.clone(), cfg)),
            Arc::new(CurrentDate),
            Arc::new(SendEmail::new(client, cfg)),
            Arc::new(StorePodcastRecord::new(store)),
        ]);

        Ok(Self::new(model, registry, cfg.max_steps))
    }

    /// Runs the full workflow for one topic and returns the final report.
    ///
    /// # Errors
    /// Fails when the model errors or when the step budget runs out before
    /// the model produces a final answer.
    pub async fn run(&self, topic: &str) -> Result<AgentOutcome, AgentError> {
        let specs = self.registry.specs();
        let mut messages = vec![
            ChatMessage::system(SUMMARIZER_SYSTEM_PROMPT),
            ChatMessage::user(topic),
        ];

        let mut phase = Phase::Reasoning;
        let mut pending: Vec<ToolCallRequest> = Vec::new();
        let mut report = String::new();
        let mut steps = 0usize;

        loop {
            match phase {
                Phase::Reasoning => {
                    if steps >= self.max_steps {
                        return Err(AgentError::StepLimit(self.max_steps));
                    }
                    steps += 1;
                    debug!("Reasoning step {steps}/{}", self.max_steps);

                    let outcome = self.model.step(&messages, &specs).await?;
                    if outcome.wants_tools() {
                        pending = outcome.tool_calls.clone();
                        messages.push(outcome.into_message());
                        phase = Phase::ToolDispatch;
                    } else {
                        report = outcome.content.unwrap_or_default();
                        phase = Phase::Terminal;
                    }
                }
                Phase::ToolDispatch => {
                    for call in pending.drain(..) {
                        let reply = self.registry.dispatch(&call).await;
                        messages.push(reply);
                    }
                    phase = Phase::Reasoning;
                }
                Phase::Terminal => {
                    info!("Run finished after {steps} reasoning steps");
                    return Ok(AgentOutcome { report, steps });
                }
            }
        }
    }
}
