//! Report delivery through the mail relay.

use super::{Tool, error_payload};
use crate::config::AgentConfig;
use crate::markdown;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{info, warn};

/// Sends the final markdown report to the configured recipient.
///
/// The recipient comes from configuration, not from the model. A prompt
/// injection in a transcript must not be able to redirect mail.
pub struct SendEmail {
    client: Client,
    base_url: String,
    token: Option<String>,
    recipient: String,
}

#[derive(Deserialize)]
struct EmailArgs {
    subject: String,
    /// Markdown body. Rendered to HTML before sending.
    message: String,
}

impl SendEmail {
    pub fn new(client: Client, cfg: &AgentConfig) -> Self {
        Self {
            client,
            base_url: cfg.mail_relay_url.trim_end_matches('/').to_string(),
            token: cfg.mail_relay_token.clone(),
            recipient: cfg.email_recipient.clone(),
        }
    }

    async fn send(&self, args: &EmailArgs) -> Result<Value, String> {
        let html = markdown::to_html(&args.message);
        let url = format!("{}/messages", self.base_url);

        let mut request = self.client.post(&url).json(&json!({
            "to": self.recipient,
            "subject": args.subject,
            "html": html,
        }));
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| format!("mail request failed: {e}"))?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("mail relay returned HTTP {status}"));
        }

        info!("Report mailed to {}", self.recipient);
        Ok(json!({ "status": "success", "recipient": self.recipient }))
    }
}

#[async_trait]
impl Tool for SendEmail {
    fn name(&self) -> &'static str {
        "send_email"
    }

    fn description(&self) -> &'static str {
        "Email the final markdown report to the configured recipient."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "subject": {
                    "type": "string",
                    "description": "Email subject line"
                },
                "message": {
                    "type": "string",
                    "description": "Report body in Markdown"
                }
            },
            "required": ["subject", "message"]
        })
    }

    async fn invoke(&self, args: Value) -> Value {
        let args: EmailArgs = match serde_json::from_value(args) {
            Ok(parsed) => parsed,
            Err(e) => return error_payload(format!("invalid arguments: {e}")),
        };

        match self.send(&args).await {
            Ok(result) => result,
            Err(e) => {
                warn!("send_email failed: {e}");
                error_payload(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tool() -> SendEmail {
        let cfg = AgentConfig {
            serpapi_key: String::new(),
            serpapi_url: String::new(),
            transcript_api_url: String::new(),
            transcript_api_key: None,
            mail_relay_url: "http://127.0.0.1:1/relay/".into(),
            mail_relay_token: None,
            email_recipient: "digest@example.com".into(),
            discovery_query: String::new(),
            max_steps: 1,
        };
        SendEmail::new(Client::new(), &cfg)
    }

    #[tokio::test]
    async fn missing_subject_is_an_argument_error() {
        let result = tool().invoke(json!({ "message": "body" })).await;

        assert_eq!(result["status"], "error");
        assert!(result["error"].as_str().unwrap().contains("invalid arguments"));
    }

    #[test]
    fn recipient_comes_from_configuration() {
        assert_eq!(tool().recipient, "digest@example.com");
    }
}
