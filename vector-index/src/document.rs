//! Canonical document shapes stored in and returned from the index.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Descriptive fields attached to a summary vector.
///
/// Every field is a scalar so the whole struct survives the Qdrant payload
/// round-trip unchanged. Field names match the record store schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Upstream episode identifier (video id).
    pub episode_id: String,
    #[serde(default)]
    pub podcast_title: String,
    #[serde(default)]
    pub podcast_description: String,
    #[serde(default)]
    pub podcast_url: String,
    /// Episode duration as reported upstream (e.g. `"25:31"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<String>,
    /// When the row was written to the record store.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_record_date: Option<DateTime<Utc>>,
    /// Freshness flag carried over from the record store.
    #[serde(default)]
    pub is_new: bool,
}

/// A summary plus its metadata, ready for embedding and upsert.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedDocument {
    /// Text the vector is computed from (the episode summary).
    pub content: String,
    pub metadata: DocumentMetadata,
}

/// One ranked hit returned from a similarity query.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredMatch {
    pub content: String,
    pub metadata: DocumentMetadata,
    /// Similarity score as reported by the index (higher is closer).
    pub score: f32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn metadata_serializes_scalars_only() {
        let meta = DocumentMetadata {
            episode_id: "abc123".into(),
            podcast_title: "AI Weekly".into(),
            podcast_description: "News".into(),
            podcast_url: "https://youtu.be/abc123".into(),
            length: Some("25:31".into()),
            database_record_date: Some(Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()),
            is_new: true,
        };
        let json = serde_json::to_value(&meta).unwrap();
        let obj = json.as_object().unwrap();
        assert!(obj.values().all(|v| !v.is_array() && !v.is_object()));
        assert_eq!(obj["database_record_date"], "2025-06-01T12:00:00Z");
    }

    #[test]
    fn metadata_omits_absent_options() {
        let meta = DocumentMetadata {
            episode_id: "abc123".into(),
            podcast_title: String::new(),
            podcast_description: String::new(),
            podcast_url: String::new(),
            length: None,
            database_record_date: None,
            is_new: false,
        };
        let json = serde_json::to_value(&meta).unwrap();
        let obj = json.as_object().unwrap();
        assert!(!obj.contains_key("length"));
        assert!(!obj.contains_key("database_record_date"));
    }

    #[test]
    fn metadata_round_trips() {
        let meta = DocumentMetadata {
            episode_id: "xyz".into(),
            podcast_title: "Deep Dive".into(),
            podcast_description: String::new(),
            podcast_url: "https://example.com".into(),
            length: None,
            database_record_date: Some(Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap()),
            is_new: false,
        };
        let json = serde_json::to_value(&meta).unwrap();
        let back: DocumentMetadata = serde_json::from_value(json).unwrap();
        assert_eq!(back, meta);
    }
}
