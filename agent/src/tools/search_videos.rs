//! Video search through the SerpAPI search endpoint.

use super::{Tool, error_payload};
use crate::config::AgentConfig;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::warn;

/// Hits requested per search.
const RESULT_LIMIT: u32 = 5;

/// Finds recent videos for a query on the video search vertical.
pub struct SearchVideos {
    client: Client,
    api_key: String,
    base_url: String,
}

#[derive(Deserialize)]
struct SearchArgs {
    query: String,
    /// Recency filter in search-engine `tbs` syntax, e.g. `qdr:w`.
    #[serde(default)]
    time_filter: Option<String>,
}

impl SearchVideos {
    pub fn new(client: Client, cfg: &AgentConfig) -> Self {
        Self {
            client,
            api_key: cfg.serpapi_key.clone(),
            base_url: cfg.serpapi_url.clone(),
        }
    }

    async fn search(&self, args: &SearchArgs) -> Result<Value, String> {
        let mut params: Vec<(&str, String)> = vec![
            ("engine", "google".to_string()),
            ("q", args.query.clone()),
            ("api_key", self.api_key.clone()),
            ("num", RESULT_LIMIT.to_string()),
            ("tbm", "vid".to_string()),
        ];
        if let Some(tbs) = &args.time_filter {
            params.push(("tbs", tbs.clone()));
        }

        let response = self
            .client
            .get(&self.base_url)
            .query(&params)
            .send()
            .await
            .map_err(|e| format!("search request failed: {e}"))?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("search returned HTTP {status}"));
        }

        let results: Value = response
            .json()
            .await
            .map_err(|e| format!("search response decode failed: {e}"))?;

        Ok(json!({ "status": "success", "results": results }))
    }
}

#[async_trait]
impl Tool for SearchVideos {
    fn name(&self) -> &'static str {
        "search_videos"
    }

    fn description(&self) -> &'static str {
        "Search for videos matching a query. Returns raw results with titles, links and video ids."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Search term, e.g. a show name plus topic"
                },
                "time_filter": {
                    "type": "string",
                    "description": "Optional recency filter in tbs syntax, e.g. 'qdr:w' for the past week"
                }
            },
            "required": ["query"]
        })
    }

    async fn invoke(&self, args: Value) -> Value {
        let args: SearchArgs = match serde_json::from_value(args) {
            Ok(parsed) => parsed,
            Err(e) => return error_payload(format!("invalid arguments: {e}")),
        };

        match self.search(&args).await {
            Ok(results) => results,
            Err(e) => {
                warn!("search_videos failed: {e}");
                error_payload(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tool() -> SearchVideos {
        let cfg = AgentConfig {
            serpapi_key: "test-key".into(),
            serpapi_url: "http://127.0.0.1:1/search".into(),
            transcript_api_url: String::new(),
            transcript_api_key: None,
            mail_relay_url: String::new(),
            mail_relay_token: None,
            email_recipient: String::new(),
            discovery_query: String::new(),
            max_steps: 1,
        };
        SearchVideos::new(Client::new(), &cfg)
    }

    #[tokio::test]
    async fn missing_query_is_an_argument_error() {
        let result = tool().invoke(json!({ "time_filter": "qdr:w" })).await;

        assert_eq!(result["status"], "error");
        assert!(result["error"].as_str().unwrap().contains("invalid arguments"));
    }

    #[test]
    fn schema_requires_the_query_field() {
        let schema = tool().parameters();
        assert_eq!(schema["required"], json!(["query"]));
        assert!(schema["properties"]["time_filter"].is_object());
    }
}
