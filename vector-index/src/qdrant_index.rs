//! Thin adapter around `qdrant-client` to isolate API usage.
//!
//! This facade concentrates all Qdrant interactions behind a minimal API,
//! hiding away the verbose builder pattern and keeping the rest of the
//! application decoupled from `qdrant-client`.

use crate::config::{DistanceKind, IndexConfig};
use crate::document::{DocumentMetadata, IndexedDocument, ScoredMatch};
use crate::errors::IndexError;

use async_trait::async_trait;
use qdrant_client::qdrant::{
    Condition, CreateCollectionBuilder, CreateFieldIndexCollectionBuilder, Distance,
    FieldCondition, FieldType, Filter, Match, PointStruct, SearchPointsBuilder,
    UpsertPointsBuilder, Value as QValue, VectorParamsBuilder, condition::ConditionOneOf,
    r#match::MatchValue,
};
use qdrant_client::{Payload, Qdrant};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Payload field carrying the logical namespace of a point.
const NAMESPACE_FIELD: &str = "namespace";

/// Write/read contract the sync and answer pipelines work against.
#[async_trait]
pub trait DocumentIndex: Send + Sync {
    /// Inserts or replaces a single point.
    async fn upsert(
        &self,
        point_id: Uuid,
        vector: Vec<f32>,
        document: &IndexedDocument,
    ) -> Result<(), IndexError>;

    /// Similarity search returning the `top_k` closest documents, best first.
    async fn query(&self, vector: Vec<f32>, top_k: u64) -> Result<Vec<ScoredMatch>, IndexError>;
}

/// A facade over the Qdrant client to keep the rest of the code clean and stable.
///
/// This struct encapsulates:
/// - The underlying Qdrant client.
/// - The target collection name and namespace.
/// - The vector space (dimensionality and distance function).
pub struct QdrantIndex {
    client: Qdrant,
    collection: String,
    namespace: String,
    distance: DistanceKind,
    dim: usize,
}

impl QdrantIndex {
    /// Creates the facade and makes sure the target collection exists.
    ///
    /// Uses the modern builder-based API of `qdrant-client` and supports
    /// optional API key authentication.
    ///
    /// # Errors
    /// Returns `IndexError::Config` for invalid configuration and
    /// `IndexError::Qdrant` if the collection cannot be inspected or created.
    pub async fn connect(cfg: &IndexConfig) -> Result<Self, IndexError> {
        cfg.validate()?; // Early validation of config.

        let mut builder = Qdrant::from_url(&cfg.url);
        if let Some(key) = &cfg.api_key {
            builder = builder.api_key(key.clone());
        }
        let client = builder
            .build()
            .map_err(|e| IndexError::Qdrant(e.to_string()))?;

        let index = Self {
            client,
            collection: cfg.collection.clone(),
            namespace: cfg.namespace.clone(),
            distance: cfg.distance,
            dim: cfg.dim,
        };
        index.ensure_collection().await?;
        Ok(index)
    }

    /// Ensures that the collection exists in Qdrant.
    ///
    /// - If the collection already exists → no-op.
    /// - If missing → creates it with the configured vector space and puts a
    ///   keyword index on the namespace field so filtered queries stay fast.
    async fn ensure_collection(&self) -> Result<(), IndexError> {
        info!(
            "Ensuring collection '{}' with size={} distance={:?}",
            self.collection, self.dim, self.distance
        );

        // Try to fetch collection info first.
        match self.client.collection_info(&self.collection).await {
            Ok(_) => {
                debug!("Collection '{}' already exists", self.collection);
                return Ok(());
            }
            Err(err) => {
                warn!(
                    "Collection '{}' not found, will be created (error={})",
                    self.collection, err
                );
            }
        }

        let distance = match self.distance {
            DistanceKind::Cosine => Distance::Cosine,
            DistanceKind::Dot => Distance::Dot,
            DistanceKind::Euclid => Distance::Euclid,
        };

        // Create collection with vector configuration.
        self.client
            .create_collection(
                CreateCollectionBuilder::new(&self.collection)
                    .vectors_config(VectorParamsBuilder::new(self.dim as u64, distance)),
            )
            .await
            .map_err(|e| IndexError::Qdrant(e.to_string()))?;

        self.client
            .create_field_index(CreateFieldIndexCollectionBuilder::new(
                &self.collection,
                NAMESPACE_FIELD,
                FieldType::Keyword,
            ))
            .await
            .map_err(|e| IndexError::Qdrant(e.to_string()))?;

        info!("Collection '{}' created successfully", self.collection);
        Ok(())
    }
}

#[async_trait]
impl DocumentIndex for QdrantIndex {
    async fn upsert(
        &self,
        point_id: Uuid,
        vector: Vec<f32>,
        document: &IndexedDocument,
    ) -> Result<(), IndexError> {
        if vector.len() != self.dim {
            return Err(IndexError::VectorSizeMismatch {
                got: vector.len(),
                want: self.dim,
            });
        }

        let payload: Payload = doc_to_payload(&self.namespace, document)?
            .try_into()
            .map_err(|e| IndexError::Qdrant(format!("payload convert: {e}")))?;

        debug!(
            "Upserting point {} (episode_id={}) into '{}'",
            point_id, document.metadata.episode_id, self.collection
        );

        // `PointStruct::new` supports numeric and UUID/string IDs.
        let point = PointStruct::new(point_id.to_string(), vector, payload);

        self.client
            .upsert_points(UpsertPointsBuilder::new(&self.collection, vec![point]))
            .await
            .map_err(|e| IndexError::Qdrant(e.to_string()))?;

        Ok(())
    }

    async fn query(&self, vector: Vec<f32>, top_k: u64) -> Result<Vec<ScoredMatch>, IndexError> {
        if vector.len() != self.dim {
            return Err(IndexError::VectorSizeMismatch {
                got: vector.len(),
                want: self.dim,
            });
        }

        info!(
            "Searching '{}' namespace='{}' with top_k={}",
            self.collection, self.namespace, top_k
        );

        let builder = SearchPointsBuilder::new(&self.collection, vector, top_k)
            .with_payload(true)
            .filter(namespace_filter(&self.namespace));

        let res = self
            .client
            .search_points(builder)
            .await
            .map_err(|e| IndexError::Qdrant(e.to_string()))?;

        // Convert raw Qdrant payloads into ranked matches.
        let mut out = Vec::with_capacity(res.result.len());
        for hit in res.result.into_iter() {
            let payload_json = qpayload_to_json(hit.payload);
            match match_from_payload(hit.score, payload_json) {
                Ok(m) => out.push(m),
                Err(err) => warn!("Skipping hit with malformed payload: {err}"),
            }
        }

        debug!("Search completed: {} hits returned", out.len());
        Ok(out)
    }
}

/// Point payload as stored in Qdrant: namespace + summary text + flat metadata.
#[derive(Serialize)]
struct StoredPayload<'a> {
    namespace: &'a str,
    content: &'a str,
    #[serde(flatten)]
    metadata: &'a DocumentMetadata,
}

/// Mirror of [`StoredPayload`] for reading hits back.
#[derive(Deserialize)]
struct LoadedPayload {
    #[serde(default)]
    content: String,
    #[serde(flatten)]
    metadata: DocumentMetadata,
}

/// Flattens a document into the JSON payload stored with its point.
fn doc_to_payload(
    namespace: &str,
    doc: &IndexedDocument,
) -> Result<serde_json::Value, IndexError> {
    Ok(serde_json::to_value(StoredPayload {
        namespace,
        content: &doc.content,
        metadata: &doc.metadata,
    })?)
}

/// Rebuilds a [`ScoredMatch`] from a hit payload.
///
/// Fails when required metadata (the episode id) is missing, letting the
/// caller skip foreign or corrupt points instead of aborting the query.
fn match_from_payload(score: f32, payload: serde_json::Value) -> Result<ScoredMatch, IndexError> {
    let loaded: LoadedPayload = serde_json::from_value(payload)?;
    Ok(ScoredMatch {
        content: loaded.content,
        metadata: loaded.metadata,
        score,
    })
}

/// Builds the exact-match filter pinning a query to one namespace.
fn namespace_filter(namespace: &str) -> Filter {
    let condition = Condition {
        condition_one_of: Some(ConditionOneOf::Field(FieldCondition {
            key: NAMESPACE_FIELD.to_string(),
            r#match: Some(Match {
                match_value: Some(MatchValue::Keyword(namespace.to_string())),
            }),
            ..Default::default()
        })),
    };
    Filter {
        must: vec![condition],
        ..Default::default()
    }
}

/// Converts a Qdrant payload (`HashMap<String, qdrant::Value>`) into JSON.
///
/// Unsupported nested objects/arrays are mapped to `Null`.
fn qpayload_to_json(mut p: std::collections::HashMap<String, QValue>) -> serde_json::Value {
    use qdrant_client::qdrant::value::Kind as K;
    let mut m = serde_json::Map::new();
    for (k, v) in p.drain() {
        let j = match v.kind {
            Some(K::StringValue(s)) => serde_json::Value::String(s),
            Some(K::IntegerValue(i)) => serde_json::Value::Number(i.into()),
            Some(K::DoubleValue(f)) => serde_json::json!(f),
            Some(K::BoolValue(b)) => serde_json::Value::Bool(b),
            None => serde_json::Value::Null,
            // For unsupported nested types, fallback to Null for safety.
            _ => serde_json::Value::Null,
        };
        m.insert(k, j);
    }
    serde_json::Value::Object(m)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use qdrant_client::qdrant::value::Kind as K;
    use std::collections::HashMap;

    fn sample_doc() -> IndexedDocument {
        IndexedDocument {
            content: "The hosts discuss agent frameworks.".into(),
            metadata: DocumentMetadata {
                episode_id: "vid42".into(),
                podcast_title: "AI Weekly".into(),
                podcast_description: "News and analysis".into(),
                podcast_url: "https://youtu.be/vid42".into(),
                length: Some("41:05".into()),
                database_record_date: Some(Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap()),
                is_new: true,
            },
        }
    }

    #[test]
    fn payload_carries_namespace_content_and_flat_metadata() {
        let payload = doc_to_payload("summaries", &sample_doc()).unwrap();
        let obj = payload.as_object().unwrap();
        assert_eq!(obj["namespace"], "summaries");
        assert_eq!(obj["content"], "The hosts discuss agent frameworks.");
        assert_eq!(obj["episode_id"], "vid42");
        assert_eq!(obj["podcast_title"], "AI Weekly");
        assert_eq!(obj["is_new"], true);
        // Only scalars: nested values would not survive the payload round-trip.
        assert!(obj.values().all(|v| !v.is_array() && !v.is_object()));
    }

    #[test]
    fn payload_round_trips_through_match() {
        let doc = sample_doc();
        let payload = doc_to_payload("summaries", &doc).unwrap();
        let m = match_from_payload(0.87, payload).unwrap();
        assert_eq!(m.content, doc.content);
        assert_eq!(m.metadata, doc.metadata);
        assert!((m.score - 0.87).abs() < f32::EPSILON);
    }

    #[test]
    fn match_requires_episode_id() {
        let payload = serde_json::json!({
            "namespace": "summaries",
            "content": "orphan text",
        });
        assert!(match_from_payload(0.5, payload).is_err());
    }

    #[test]
    fn qdrant_payload_maps_to_scalar_json() {
        let mut p = HashMap::new();
        p.insert(
            "episode_id".to_string(),
            QValue {
                kind: Some(K::StringValue("vid42".into())),
            },
        );
        p.insert(
            "is_new".to_string(),
            QValue {
                kind: Some(K::BoolValue(false)),
            },
        );
        let json = qpayload_to_json(p);
        assert_eq!(json["episode_id"], "vid42");
        assert_eq!(json["is_new"], false);
    }

    #[test]
    fn namespace_filter_is_a_must_keyword_match() {
        let f = namespace_filter("summaries");
        assert_eq!(f.must.len(), 1);
        assert!(f.should.is_empty());
        let Some(ConditionOneOf::Field(fc)) = &f.must[0].condition_one_of else {
            panic!("expected a field condition");
        };
        assert_eq!(fc.key, NAMESPACE_FIELD);
        let m = fc.r#match.as_ref().unwrap();
        assert_eq!(
            m.match_value,
            Some(MatchValue::Keyword("summaries".into()))
        );
    }
}
