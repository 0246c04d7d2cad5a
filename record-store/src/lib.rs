//! MongoDB-backed primary record store for podcast summaries.
//!
//! The store owns the durable copy of every summarized episode. Downstream,
//! the sync pipeline mirrors the most recent records into the vector index;
//! upstream, the discovery agent inserts newly summarized episodes.
//!
//! `episode_id` is enforced unique with a server-side index, so duplicate
//! discovery runs are rejected at insertion rather than silently stacking
//! copies.

pub mod config;
pub mod errors;
pub mod record;
pub mod store;

pub use config::StoreConfig;
pub use errors::StoreError;
pub use record::PodcastRecord;
pub use store::{MongoRecordStore, RecordStore};

// Row id type appearing in `PodcastRecord`; re-exported so dependents do not
// need a direct driver dependency.
pub use mongodb::bson::oid::ObjectId;
