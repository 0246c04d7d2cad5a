//! Autonomous discovery agent for the podcast pipeline.
//!
//! Wraps a tool-calling language model in a bounded reasoning loop. Given a
//! topic, the agent searches for recent episodes, pulls transcripts,
//! composes a markdown digest, mails it and files one record per episode
//! into the record store.

pub mod config;
pub mod errors;
pub mod markdown;
pub mod prompt;
pub mod runner;
pub mod tools;

pub use config::AgentConfig;
pub use errors::AgentError;
pub use runner::{AgentOutcome, DiscoveryAgent, ReasoningModel};
pub use tools::{Tool, ToolRegistry};
