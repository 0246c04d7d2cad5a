//! Core data model for stored podcast summaries.

use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Canonical record of one summarized podcast episode.
///
/// `episode_id` is the unique business key; the MongoDB `_id` is internal to
/// the store layer and never crosses it. `database_record_date` is set at
/// insertion time and drives recency ordering. Dates serialize as RFC3339
/// strings, which sort correctly under the store's lexicographic sort.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PodcastRecord {
    /// Internal row id, assigned by MongoDB. Absent before insertion.
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    /// Unique episode identifier (e.g., the source video id).
    pub episode_id: String,

    /// Episode title.
    #[serde(default)]
    pub podcast_title: String,

    /// Short episode description.
    #[serde(default)]
    pub podcast_description: String,

    /// Public URL of the episode.
    #[serde(default)]
    pub podcast_url: String,

    /// Markdown summary. The only field whose text gets embedded.
    #[serde(default)]
    pub podcast_summary: String,

    /// Optional human-readable duration (e.g., "1:02:45").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<String>,

    /// Insertion timestamp; recency ordering key.
    pub database_record_date: DateTime<Utc>,

    /// Whether the episode was newly discovered in the last run.
    #[serde(default = "default_is_new")]
    pub is_new: bool,
}

fn default_is_new() -> bool {
    true
}

impl PodcastRecord {
    /// Builds a fresh record with the insertion timestamp set to now.
    pub fn new(
        episode_id: impl Into<String>,
        podcast_title: impl Into<String>,
        podcast_description: impl Into<String>,
        podcast_url: impl Into<String>,
        podcast_summary: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            episode_id: episode_id.into(),
            podcast_title: podcast_title.into(),
            podcast_description: podcast_description.into(),
            podcast_url: podcast_url.into(),
            podcast_summary: podcast_summary.into(),
            length: None,
            database_record_date: Utc::now(),
            is_new: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson;

    #[test]
    fn new_record_has_no_row_id() {
        let rec = PodcastRecord::new("ep-1", "Title", "Desc", "https://x/1", "Summary");
        assert!(rec.id.is_none());
        assert!(rec.is_new);
        assert!(rec.length.is_none());
    }

    #[test]
    fn serialization_skips_absent_row_id() {
        let rec = PodcastRecord::new("ep-1", "Title", "Desc", "https://x/1", "Summary");
        let doc = bson::to_document(&rec).unwrap();
        assert!(!doc.contains_key("_id"));
        assert_eq!(doc.get_str("episode_id").unwrap(), "ep-1");
    }

    #[test]
    fn deserialization_defaults_optional_fields() {
        let raw = serde_json::json!({
            "episode_id": "ep-2",
            "database_record_date": "2026-08-01T10:00:00Z"
        });
        let rec: PodcastRecord = serde_json::from_value(raw).unwrap();
        assert_eq!(rec.podcast_title, "");
        assert!(rec.length.is_none());
        assert!(rec.is_new);
    }

    #[test]
    fn record_date_round_trips_as_rfc3339() {
        let rec = PodcastRecord::new("ep-3", "T", "D", "https://x/3", "S");
        let v = serde_json::to_value(&rec).unwrap();
        let parsed: PodcastRecord = serde_json::from_value(v).unwrap();
        assert_eq!(parsed.database_record_date, rec.database_record_date);
    }
}
