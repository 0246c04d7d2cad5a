//! Transcript retrieval from the transcript service.

use super::{Tool, error_payload};
use crate::config::AgentConfig;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::warn;

/// Downloads the full transcript for one video id.
pub struct FetchTranscript {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

#[derive(Deserialize)]
struct TranscriptArgs {
    video_id: String,
}

#[derive(Deserialize)]
struct TranscriptResponse {
    #[serde(default)]
    segments: Vec<TranscriptSegment>,
}

#[derive(Deserialize)]
struct TranscriptSegment {
    #[serde(default)]
    text: String,
}

impl FetchTranscript {
    pub fn new(client: Client, cfg: &AgentConfig) -> Self {
        Self {
            client,
            base_url: cfg.transcript_api_url.trim_end_matches('/').to_string(),
            api_key: cfg.transcript_api_key.clone(),
        }
    }

    async fn fetch(&self, video_id: &str) -> Result<Value, String> {
        let url = format!(
            "{}/transcripts/{}",
            self.base_url,
            urlencoding::encode(video_id)
        );

        let mut request = self.client.get(&url);
        if let Some(token) = &self.api_key {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| format!("transcript request failed: {e}"))?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("transcript service returned HTTP {status}"));
        }

        let body: TranscriptResponse = response
            .json()
            .await
            .map_err(|e| format!("transcript decode failed: {e}"))?;

        let text = body
            .segments
            .iter()
            .map(|segment| segment.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        if text.trim().is_empty() {
            return Err(format!("no transcript available for video '{video_id}'"));
        }

        Ok(json!({ "status": "success", "text": text }))
    }
}

#[async_trait]
impl Tool for FetchTranscript {
    fn name(&self) -> &'static str {
        "fetch_transcript"
    }

    fn description(&self) -> &'static str {
        "Retrieve the complete transcript text for a video id returned by search_videos."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "video_id": {
                    "type": "string",
                    "description": "Video id exactly as it appears in search results"
                }
            },
            "required": ["video_id"]
        })
    }

    async fn invoke(&self, args: Value) -> Value {
        let args: TranscriptArgs = match serde_json::from_value(args) {
            Ok(parsed) => parsed,
            Err(e) => return error_payload(format!("invalid arguments: {e}")),
        };

        match self.fetch(&args.video_id).await {
            Ok(result) => result,
            Err(e) => {
                warn!("fetch_transcript failed: {e}");
                error_payload(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tool() -> FetchTranscript {
        let cfg = AgentConfig {
            serpapi_key: String::new(),
            serpapi_url: String::new(),
            transcript_api_url: "http://127.0.0.1:1/api/".into(),
            transcript_api_key: Some("secret".into()),
            mail_relay_url: String::new(),
            mail_relay_token: None,
            email_recipient: String::new(),
            discovery_query: String::new(),
            max_steps: 1,
        };
        FetchTranscript::new(Client::new(), &cfg)
    }

    #[tokio::test]
    async fn missing_video_id_is_an_argument_error() {
        let result = tool().invoke(json!({})).await;

        assert_eq!(result["status"], "error");
        assert!(result["error"].as_str().unwrap().contains("invalid arguments"));
    }

    #[test]
    fn base_url_loses_its_trailing_slash() {
        assert_eq!(tool().base_url, "http://127.0.0.1:1/api");
    }

    #[test]
    fn segments_join_into_plain_text() {
        let body: TranscriptResponse = serde_json::from_value(json!({
            "segments": [{ "text": "hello" }, { "text": "world" }]
        }))
        .unwrap();

        let text = body
            .segments
            .iter()
            .map(|segment| segment.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        assert_eq!(text, "hello world");
    }
}
