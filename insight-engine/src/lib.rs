//! Podcast insight pipelines: index synchronization + grounded answering.
//!
//! Two flows share this crate:
//! - [`SyncPipeline`] mirrors the most recent record store rows into the
//!   vector index, one record at a time with bounded retries.
//! - [`AnswerPipeline`] turns a free-text question into a cited answer:
//!   embed, query, score-filter, grounded prompt, one model call, sources
//!   footer.
//!
//! Collaborators (store, index, embedder, model) enter through trait objects
//! so tests substitute fakes and multiple instances can coexist in-process.

mod answer;
mod convert;
mod errors;
mod prompt;
mod sync;

pub use answer::{AnswerModel, AnswerOptions, AnswerPipeline, AnswerResult};
pub use convert::prepare_document;
pub use errors::EngineError;
pub use prompt::FALLBACK_MESSAGE;
pub use sync::{RetryPolicy, SyncPipeline, SyncReport, SyncStatus, dedup_from_env};
