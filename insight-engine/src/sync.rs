//! Record store to vector index synchronization.

use crate::convert;
use crate::errors::EngineError;

use record_store::RecordStore;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use uuid::Uuid;
use vector_index::{
    DocumentIndex, EmbeddingsProvider, IndexedDocument, random_point_id, stable_point_id,
};

const DEFAULT_RETRY_ATTEMPTS: u32 = 3;
const DEFAULT_RETRY_DELAY_SECS: u64 = 2;

/// Overall batch verdict: `Success` as soon as one record lands. Partial
/// failure deliberately collapses into `Success`; downstream callers depend
/// on that boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    Success,
    Error,
}

/// Outcome of one synchronization pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub status: SyncStatus,
    pub message: String,
    /// Count of records that made it into the index.
    pub synced: usize,
}

/// Per-record retry settings: fixed delay, no backoff growth, no jitter.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: DEFAULT_RETRY_ATTEMPTS,
            delay: Duration::from_secs(DEFAULT_RETRY_DELAY_SECS),
        }
    }
}

impl RetryPolicy {
    /// Reads `SYNC_RETRY_ATTEMPTS` / `SYNC_RETRY_DELAY_SECS`, keeping the
    /// defaults when unset or unparsable.
    pub fn from_env() -> Self {
        let attempts = std::env::var("SYNC_RETRY_ATTEMPTS")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(DEFAULT_RETRY_ATTEMPTS);
        let delay_secs = std::env::var("SYNC_RETRY_DELAY_SECS")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(DEFAULT_RETRY_DELAY_SECS);
        Self {
            attempts,
            delay: Duration::from_secs(delay_secs),
        }
    }
}

/// Reads `SYNC_DEDUP_BY_ID` (`true` / `1` / `t`, case-insensitive).
pub fn dedup_from_env() -> bool {
    std::env::var("SYNC_DEDUP_BY_ID")
        .map(|s| matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "1" | "t"))
        .unwrap_or(false)
}

/// Mirrors the most recent store records into the vector index.
///
/// Collaborators are optional so a failed startup leaves the pipeline in a
/// degraded state that reports an error instead of panicking mid-request.
pub struct SyncPipeline {
    store: Option<Arc<dyn RecordStore>>,
    index: Option<Arc<dyn DocumentIndex>>,
    embedder: Option<Arc<dyn EmbeddingsProvider>>,
    retry: RetryPolicy,
    dedup_by_episode: bool,
}

impl SyncPipeline {
    /// Wires the pipeline with all collaborators present.
    pub fn new(
        store: Arc<dyn RecordStore>,
        index: Arc<dyn DocumentIndex>,
        embedder: Arc<dyn EmbeddingsProvider>,
        retry: RetryPolicy,
    ) -> Self {
        Self::with_collaborators(Some(store), Some(index), Some(embedder), retry)
    }

    /// Degraded wiring: any collaborator may be absent after a failed
    /// startup.
    pub fn with_collaborators(
        store: Option<Arc<dyn RecordStore>>,
        index: Option<Arc<dyn DocumentIndex>>,
        embedder: Option<Arc<dyn EmbeddingsProvider>>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            store,
            index,
            embedder,
            retry,
            dedup_by_episode: false,
        }
    }

    /// When enabled, re-syncing an episode overwrites its point (stable id
    /// per `episode_id`) instead of adding an independent snapshot entry.
    pub fn dedup_by_episode(mut self, enabled: bool) -> Self {
        self.dedup_by_episode = enabled;
        self
    }

    /// Pushes the `count` most recent records into the vector index.
    ///
    /// Records are processed independently: a malformed record is skipped
    /// and logged, a failing upsert is retried with a fixed pause and then
    /// counted as failed. Neither aborts the batch. The report's status is
    /// `Success` as long as at least one record landed.
    pub async fn sync_latest(&self, count: usize) -> SyncReport {
        let (Some(store), Some(index), Some(embedder)) =
            (&self.store, &self.index, &self.embedder)
        else {
            error!("Database connections not initialized");
            return SyncReport {
                status: SyncStatus::Error,
                message: "Database connections not initialized".to_string(),
                synced: 0,
            };
        };

        let records = match store.find_recent(count).await {
            Ok(records) => records,
            Err(err) => {
                error!("Failed to fetch recent records: {err}");
                return SyncReport {
                    status: SyncStatus::Error,
                    message: format!("Failed to fetch recent records: {err}"),
                    synced: 0,
                };
            }
        };

        if records.is_empty() {
            info!("No podcasts found to synchronize");
            return SyncReport {
                status: SyncStatus::Success,
                message: "No podcasts to synchronize".to_string(),
                synced: 0,
            };
        }

        let total = records.len();
        let mut synced = 0usize;
        for record in &records {
            let doc = match convert::prepare_document(record) {
                Ok(doc) => doc,
                Err(err) => {
                    warn!("Skipping record: {err}");
                    continue;
                }
            };
            if self
                .insert_with_retry(index.as_ref(), embedder.as_ref(), &doc)
                .await
            {
                synced += 1;
            }
        }

        let status = if synced > 0 {
            SyncStatus::Success
        } else {
            SyncStatus::Error
        };
        let message = format!("Synchronized {synced}/{total} podcasts");
        info!("{message}");
        SyncReport {
            status,
            message,
            synced,
        }
    }

    /// One record: embed + upsert with bounded retries and a fixed pause
    /// between attempts.
    async fn insert_with_retry(
        &self,
        index: &dyn DocumentIndex,
        embedder: &dyn EmbeddingsProvider,
        doc: &IndexedDocument,
    ) -> bool {
        let point_id = if self.dedup_by_episode {
            stable_point_id(&doc.metadata.episode_id)
        } else {
            random_point_id()
        };

        let attempts = self.retry.attempts.max(1);
        for attempt in 1..=attempts {
            match self.try_insert(index, embedder, point_id, doc).await {
                Ok(()) => {
                    info!(
                        "Successfully inserted podcast '{}' into the vector index",
                        doc.metadata.podcast_title
                    );
                    return true;
                }
                Err(err) => {
                    warn!("Attempt {attempt}/{attempts} failed: {err}");
                    if attempt < attempts {
                        tokio::time::sleep(self.retry.delay).await;
                    } else {
                        error!(
                            "Failed to insert episode '{}' after {attempts} attempts",
                            doc.metadata.episode_id
                        );
                    }
                }
            }
        }
        false
    }

    async fn try_insert(
        &self,
        index: &dyn DocumentIndex,
        embedder: &dyn EmbeddingsProvider,
        point_id: Uuid,
        doc: &IndexedDocument,
    ) -> Result<(), EngineError> {
        let vector = embedder.embed(&doc.content).await?;
        index.upsert(point_id, vector, doc).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use record_store::{PodcastRecord, StoreError};
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::{future::Future, pin::Pin};
    use vector_index::{IndexError, ScoredMatch};

    struct FakeEmbedder;

    impl EmbeddingsProvider for FakeEmbedder {
        fn embed<'a>(
            &'a self,
            _text: &'a str,
        ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, IndexError>> + Send + 'a>> {
            Box::pin(async { Ok(vec![0.5; 4]) })
        }
    }

    struct FakeStore {
        records: Vec<PodcastRecord>,
        fail: bool,
    }

    #[async_trait]
    impl RecordStore for FakeStore {
        async fn insert(&self, _record: &PodcastRecord) -> Result<String, StoreError> {
            unreachable!("sync never inserts into the store")
        }

        async fn find_recent(&self, limit: usize) -> Result<Vec<PodcastRecord>, StoreError> {
            if self.fail {
                return Err(StoreError::Config("store offline".into()));
            }
            Ok(self.records.iter().take(limit).cloned().collect())
        }
    }

    /// Index double that fails the first `failures_before_success[episode]`
    /// upserts of an episode, then accepts. `usize::MAX` = always fail.
    #[derive(Default)]
    struct FakeIndex {
        attempts: Mutex<HashMap<String, usize>>,
        stored: Mutex<Vec<(Uuid, String)>>,
        failures_before_success: HashMap<String, usize>,
    }

    impl FakeIndex {
        fn failing(mut self, episode: &str, failures: usize) -> Self {
            self.failures_before_success
                .insert(episode.to_string(), failures);
            self
        }

        fn attempts_for(&self, episode: &str) -> usize {
            self.attempts
                .lock()
                .unwrap()
                .get(episode)
                .copied()
                .unwrap_or(0)
        }

        fn stored_episodes(&self) -> Vec<String> {
            self.stored
                .lock()
                .unwrap()
                .iter()
                .map(|(_, ep)| ep.clone())
                .collect()
        }

        fn stored_point_ids(&self) -> Vec<Uuid> {
            self.stored.lock().unwrap().iter().map(|(id, _)| *id).collect()
        }
    }

    #[async_trait]
    impl DocumentIndex for FakeIndex {
        async fn upsert(
            &self,
            point_id: Uuid,
            _vector: Vec<f32>,
            document: &IndexedDocument,
        ) -> Result<(), IndexError> {
            let episode = document.metadata.episode_id.clone();
            let mut attempts = self.attempts.lock().unwrap();
            let n = attempts.entry(episode.clone()).or_insert(0);
            *n += 1;
            let budget = self
                .failures_before_success
                .get(&episode)
                .copied()
                .unwrap_or(0);
            if *n <= budget {
                return Err(IndexError::Qdrant("transient upsert failure".into()));
            }
            self.stored.lock().unwrap().push((point_id, episode));
            Ok(())
        }

        async fn query(
            &self,
            _vector: Vec<f32>,
            _top_k: u64,
        ) -> Result<Vec<ScoredMatch>, IndexError> {
            unreachable!("sync tests never query")
        }
    }

    fn record(episode: &str) -> PodcastRecord {
        PodcastRecord::new(
            episode,
            format!("Episode {episode}"),
            "desc",
            format!("https://youtu.be/{episode}"),
            format!("Summary for {episode}"),
        )
    }

    fn fast_retry() -> RetryPolicy {
        RetryPolicy {
            attempts: 3,
            delay: Duration::ZERO,
        }
    }

    fn pipeline(store: FakeStore, index: Arc<FakeIndex>) -> SyncPipeline {
        SyncPipeline::new(Arc::new(store), index, Arc::new(FakeEmbedder), fast_retry())
    }

    #[tokio::test]
    async fn missing_collaborator_reports_error_without_side_effects() {
        let index = Arc::new(FakeIndex::default());
        let p = SyncPipeline::with_collaborators(
            None,
            Some(index.clone()),
            Some(Arc::new(FakeEmbedder)),
            fast_retry(),
        );

        let report = p.sync_latest(5).await;

        assert_eq!(report.status, SyncStatus::Error);
        assert_eq!(report.message, "Database connections not initialized");
        assert_eq!(report.synced, 0);
        assert!(index.stored_episodes().is_empty());
    }

    #[tokio::test]
    async fn empty_store_is_success_with_nothing_to_do() {
        let p = pipeline(
            FakeStore {
                records: vec![],
                fail: false,
            },
            Arc::new(FakeIndex::default()),
        );

        let report = p.sync_latest(5).await;

        assert_eq!(report.status, SyncStatus::Success);
        assert_eq!(report.message, "No podcasts to synchronize");
        assert_eq!(report.synced, 0);
    }

    #[tokio::test]
    async fn store_failure_reports_error() {
        let p = pipeline(
            FakeStore {
                records: vec![],
                fail: true,
            },
            Arc::new(FakeIndex::default()),
        );

        let report = p.sync_latest(5).await;

        assert_eq!(report.status, SyncStatus::Error);
        assert!(report.message.contains("Failed to fetch recent records"));
        assert_eq!(report.synced, 0);
    }

    #[tokio::test]
    async fn full_batch_success_counts_every_record() {
        let index = Arc::new(FakeIndex::default());
        let p = pipeline(
            FakeStore {
                records: vec![record("a"), record("b"), record("c")],
                fail: false,
            },
            index.clone(),
        );

        let report = p.sync_latest(5).await;

        assert_eq!(report.status, SyncStatus::Success);
        assert_eq!(report.synced, 3);
        assert_eq!(report.message, "Synchronized 3/3 podcasts");
        assert_eq!(index.stored_episodes().len(), 3);
    }

    #[tokio::test]
    async fn requested_count_caps_the_batch() {
        let index = Arc::new(FakeIndex::default());
        let p = pipeline(
            FakeStore {
                records: vec![record("a"), record("b"), record("c")],
                fail: false,
            },
            index,
        );

        let report = p.sync_latest(2).await;

        assert_eq!(report.synced, 2);
        assert_eq!(report.message, "Synchronized 2/2 podcasts");
    }

    #[tokio::test]
    async fn exhausted_record_is_counted_failed_and_batch_continues() {
        let index = Arc::new(FakeIndex::default().failing("b", usize::MAX));
        let p = pipeline(
            FakeStore {
                records: vec![record("a"), record("b"), record("c")],
                fail: false,
            },
            index.clone(),
        );

        let report = p.sync_latest(5).await;

        assert_eq!(report.status, SyncStatus::Success);
        assert_eq!(report.synced, 2);
        assert_eq!(report.message, "Synchronized 2/3 podcasts");
        assert_eq!(index.attempts_for("b"), 3);
        assert_eq!(index.stored_episodes(), ["a", "c"]);
    }

    #[tokio::test]
    async fn zero_successes_collapse_to_error() {
        let index = Arc::new(
            FakeIndex::default()
                .failing("a", usize::MAX)
                .failing("b", usize::MAX),
        );
        let p = pipeline(
            FakeStore {
                records: vec![record("a"), record("b")],
                fail: false,
            },
            index,
        );

        let report = p.sync_latest(5).await;

        assert_eq!(report.status, SyncStatus::Error);
        assert_eq!(report.synced, 0);
        assert_eq!(report.message, "Synchronized 0/2 podcasts");
    }

    #[tokio::test]
    async fn transient_failure_recovers_within_the_attempt_budget() {
        let index = Arc::new(FakeIndex::default().failing("a", 2));
        let p = pipeline(
            FakeStore {
                records: vec![record("a")],
                fail: false,
            },
            index.clone(),
        );

        let report = p.sync_latest(1).await;

        assert_eq!(report.synced, 1);
        assert_eq!(index.attempts_for("a"), 3);
    }

    #[tokio::test]
    async fn malformed_record_is_skipped_without_upsert_attempts() {
        let mut bad = record("bad");
        bad.podcast_summary = String::new();

        let index = Arc::new(FakeIndex::default());
        let p = pipeline(
            FakeStore {
                records: vec![record("a"), bad, record("c")],
                fail: false,
            },
            index.clone(),
        );

        let report = p.sync_latest(5).await;

        assert_eq!(report.status, SyncStatus::Success);
        assert_eq!(report.synced, 2);
        assert_eq!(report.message, "Synchronized 2/3 podcasts");
        assert_eq!(index.attempts_for("bad"), 0);
    }

    #[tokio::test]
    async fn dedup_reuses_the_episode_point_id_across_passes() {
        let index = Arc::new(FakeIndex::default());
        let store = || FakeStore {
            records: vec![record("a")],
            fail: false,
        };

        let p = SyncPipeline::new(
            Arc::new(store()),
            index.clone(),
            Arc::new(FakeEmbedder),
            fast_retry(),
        )
        .dedup_by_episode(true);
        p.sync_latest(1).await;
        p.sync_latest(1).await;

        let ids = index.stored_point_ids();
        assert_eq!(ids.len(), 2);
        assert_eq!(ids[0], ids[1]);
    }

    #[tokio::test]
    async fn default_mode_appends_an_independent_snapshot_per_pass() {
        let index = Arc::new(FakeIndex::default());
        let p = pipeline(
            FakeStore {
                records: vec![record("a")],
                fail: false,
            },
            index.clone(),
        );

        p.sync_latest(1).await;
        p.sync_latest(1).await;

        let ids = index.stored_point_ids();
        assert_eq!(ids.len(), 2);
        assert_ne!(ids[0], ids[1]);
    }
}
