//! Record to document conversion for indexing.

use crate::errors::EngineError;

use record_store::PodcastRecord;
use vector_index::{DocumentMetadata, IndexedDocument};

/// Turns a stored record into the document shape the index accepts.
///
/// The summary becomes the embedded content; the remaining fields travel as
/// metadata. The internal row id and the summary text itself never enter the
/// metadata. Records without an episode id or summary are data errors and
/// are reported as such rather than retried.
pub fn prepare_document(record: &PodcastRecord) -> Result<IndexedDocument, EngineError> {
    if record.episode_id.trim().is_empty() {
        return Err(EngineError::Conversion("record has no episode_id".into()));
    }
    if record.podcast_summary.trim().is_empty() {
        return Err(EngineError::Conversion(format!(
            "record '{}' has no podcast_summary",
            record.episode_id
        )));
    }

    Ok(IndexedDocument {
        content: record.podcast_summary.clone(),
        metadata: DocumentMetadata {
            episode_id: record.episode_id.clone(),
            podcast_title: record.podcast_title.clone(),
            podcast_description: record.podcast_description.clone(),
            podcast_url: record.podcast_url.clone(),
            length: record.length.clone(),
            database_record_date: Some(record.database_record_date),
            is_new: record.is_new,
        },
    })
}
