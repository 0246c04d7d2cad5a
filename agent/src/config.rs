//! Runtime configuration for discovery runs.

use crate::errors::AgentError;

/// Connection settings and limits for the agent and its tools.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// API key for the video search service.
    pub serpapi_key: String,
    /// Video search endpoint. Override for proxies or test doubles.
    pub serpapi_url: String,
    /// Base URL of the transcript service.
    pub transcript_api_url: String,
    /// Optional bearer token for the transcript service.
    pub transcript_api_key: Option<String>,
    /// Base URL of the mail relay.
    pub mail_relay_url: String,
    /// Optional bearer token for the mail relay.
    pub mail_relay_token: Option<String>,
    /// Recipient of the discovery report.
    pub email_recipient: String,
    /// Search topic used when the caller does not supply one.
    pub discovery_query: String,
    /// Reasoning turn budget for a single run.
    pub max_steps: usize,
}

pub const DEFAULT_SERPAPI_URL: &str = "https://serpapi.com/search";
pub const DEFAULT_DISCOVERY_QUERY: &str = "latest AI advancements podcast";
pub const DEFAULT_MAX_STEPS: usize = 15;

impl AgentConfig {
    /// Reads the configuration from environment variables.
    ///
    /// # Errors
    /// Returns `AgentError::Config` when a required variable is missing or
    /// blank.
    pub fn from_env() -> Result<Self, AgentError> {
        Ok(Self {
            serpapi_key: must_env("SERPAPI_KEY")?,
            serpapi_url: env_or("SERPAPI_URL", DEFAULT_SERPAPI_URL),
            transcript_api_url: must_env("TRANSCRIPT_API_URL")?,
            transcript_api_key: env_opt("TRANSCRIPT_API_KEY"),
            mail_relay_url: must_env("MAIL_RELAY_URL")?,
            mail_relay_token: env_opt("MAIL_RELAY_TOKEN"),
            email_recipient: must_env("EMAIL_RECIPIENT")?,
            discovery_query: env_or("DISCOVERY_QUERY", DEFAULT_DISCOVERY_QUERY),
            max_steps: std::env::var("AGENT_MAX_STEPS")
                .ok()
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(DEFAULT_MAX_STEPS),
        })
    }
}

fn must_env(name: &str) -> Result<String, AgentError> {
    env_opt(name).ok_or_else(|| AgentError::Config(format!("{name} is not set")))
}

fn env_or(name: &str, default: &str) -> String {
    env_opt(name).unwrap_or_else(|| default.to_string())
}

/// Blank values count as unset so an empty line in `.env` does not shadow a
/// default.
fn env_opt(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.trim().is_empty())
}
