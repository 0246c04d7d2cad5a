//! Persisting summarized episodes into the record store.

use super::{Tool, error_payload};

use async_trait::async_trait;
use record_store::{PodcastRecord, RecordStore};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{info, warn};

/// Files one structured episode record.
pub struct StorePodcastRecord {
    store: Arc<dyn RecordStore>,
}

#[derive(Deserialize)]
struct StoreArgs {
    episode_id: String,
    podcast_title: String,
    #[serde(default)]
    podcast_description: String,
    podcast_url: String,
    podcast_summary: String,
    #[serde(default)]
    length: Option<String>,
}

impl StorePodcastRecord {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    async fn store(&self, args: &StoreArgs) -> Result<Value, String> {
        if args.episode_id.trim().is_empty() {
            return Err("episode_id must not be empty".to_string());
        }
        if args.podcast_summary.trim().is_empty() {
            return Err("podcast_summary must not be empty".to_string());
        }

        let mut record = PodcastRecord::new(
            &args.episode_id,
            &args.podcast_title,
            &args.podcast_description,
            &args.podcast_url,
            &args.podcast_summary,
        );
        record.length = args.length.clone();

        match self.store.insert(&record).await {
            Ok(inserted_id) => {
                info!("Stored episode '{}' as {inserted_id}", args.episode_id);
                Ok(json!({
                    "status": "success",
                    "inserted_id": inserted_id,
                    "message": "Podcast summary stored successfully",
                }))
            }
            Err(e) if e.is_duplicate() => Err(format!(
                "episode '{}' is already stored",
                args.episode_id
            )),
            Err(e) => Err(format!("database error: {e}")),
        }
    }
}

#[async_trait]
impl Tool for StorePodcastRecord {
    fn name(&self) -> &'static str {
        "store_podcast_record"
    }

    fn description(&self) -> &'static str {
        "Persist one summarized episode with its metadata. Call once per episode after the report is sent."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "episode_id": {
                    "type": "string",
                    "description": "Stable external id of the episode, e.g. the video id"
                },
                "podcast_title": {
                    "type": "string",
                    "description": "Exact episode title"
                },
                "podcast_description": {
                    "type": "string",
                    "description": "Short description of the episode"
                },
                "podcast_url": {
                    "type": "string",
                    "description": "Canonical URL of the episode"
                },
                "podcast_summary": {
                    "type": "string",
                    "description": "Full markdown summary produced during analysis"
                },
                "length": {
                    "type": "string",
                    "description": "Episode duration, e.g. '01:02:45'"
                }
            },
            "required": ["episode_id", "podcast_title", "podcast_url", "podcast_summary"]
        })
    }

    async fn invoke(&self, args: Value) -> Value {
        let args: StoreArgs = match serde_json::from_value(args) {
            Ok(parsed) => parsed,
            Err(e) => return error_payload(format!("invalid arguments: {e}")),
        };

        match self.store(&args).await {
            Ok(result) => result,
            Err(e) => {
                warn!("store_podcast_record failed: {e}");
                error_payload(e)
            }
        }
    }
}
