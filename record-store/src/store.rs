//! Record store trait and its MongoDB implementation.

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    Client, Collection, IndexModel,
    bson::doc,
    error::{ErrorKind, WriteFailure},
    options::IndexOptions,
};
use tracing::{debug, info};

use crate::{config::StoreConfig, errors::StoreError, record::PodcastRecord};

/// Primary record store for podcast summaries.
///
/// Implementations are injected into the pipelines; tests supply in-memory
/// fakes.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Inserts a record, returning the assigned row id as a string.
    ///
    /// # Errors
    /// Returns [`StoreError::DuplicateEpisode`] when a record with the same
    /// `episode_id` already exists.
    async fn insert(&self, record: &PodcastRecord) -> Result<String, StoreError>;

    /// Returns up to `limit` records ordered by `database_record_date`
    /// descending (most recent first). Ties keep the store's natural order.
    async fn find_recent(&self, limit: usize) -> Result<Vec<PodcastRecord>, StoreError>;
}

/// MongoDB-backed [`RecordStore`].
///
/// Construct with [`MongoRecordStore::connect`], which verifies connectivity
/// with a ping and bootstraps the indexes the store relies on.
pub struct MongoRecordStore {
    collection: Collection<PodcastRecord>,
}

impl MongoRecordStore {
    /// Connects to MongoDB, pings the target database, and ensures indexes.
    ///
    /// # Errors
    /// Returns [`StoreError::Mongo`] on connection or ping failure.
    pub async fn connect(cfg: &StoreConfig) -> Result<Self, StoreError> {
        cfg.validate()?;

        let client = Client::with_uri_str(&cfg.uri).await?;
        let database = client.database(&cfg.database);
        database.run_command(doc! { "ping": 1 }).await?;

        let collection = database.collection::<PodcastRecord>(&cfg.collection);
        let store = Self { collection };
        store.ensure_indexes().await?;

        info!(
            database = %cfg.database,
            collection = %cfg.collection,
            "record store connected"
        );

        Ok(store)
    }

    /// Creates the unique `episode_id` index and the recency sort index.
    ///
    /// Index creation is idempotent; re-running on an existing collection is a
    /// no-op.
    async fn ensure_indexes(&self) -> Result<(), StoreError> {
        let unique_episode = IndexModel::builder()
            .keys(doc! { "episode_id": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.collection.create_index(unique_episode).await?;

        let recency = IndexModel::builder()
            .keys(doc! { "database_record_date": -1 })
            .build();
        self.collection.create_index(recency).await?;

        debug!("record store indexes ensured");
        Ok(())
    }
}

#[async_trait]
impl RecordStore for MongoRecordStore {
    async fn insert(&self, record: &PodcastRecord) -> Result<String, StoreError> {
        match self.collection.insert_one(record).await {
            Ok(outcome) => {
                let id = outcome
                    .inserted_id
                    .as_object_id()
                    .map(|oid| oid.to_hex())
                    .unwrap_or_else(|| outcome.inserted_id.to_string());
                debug!(episode_id = %record.episode_id, row_id = %id, "record inserted");
                Ok(id)
            }
            Err(err) if is_duplicate_key(&err) => {
                Err(StoreError::DuplicateEpisode(record.episode_id.clone()))
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn find_recent(&self, limit: usize) -> Result<Vec<PodcastRecord>, StoreError> {
        let mut cursor = self
            .collection
            .find(doc! {})
            .sort(doc! { "database_record_date": -1 })
            .limit(limit as i64)
            .await?;

        let mut records = Vec::with_capacity(limit);
        while let Some(record) = cursor.try_next().await? {
            records.push(record);
        }

        debug!(requested = limit, found = records.len(), "recent records fetched");
        Ok(records)
    }
}

/// Detects the server's unique-key violation (code 11000) inside a driver error.
fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => write_error.code == 11000,
        _ => false,
    }
}
