//! Retrieval-augmented answering over indexed podcast summaries.

use crate::errors::EngineError;
use crate::prompt;

use async_trait::async_trait;
use llm_service::LlmServiceProfiles;
use std::sync::Arc;
use tracing::{debug, info};
use vector_index::{DocumentIndex, DocumentMetadata, EmbeddingsProvider, ScoredMatch};

/// Single-shot completion used for grounded answering.
#[async_trait]
pub trait AnswerModel: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, EngineError>;
}

#[async_trait]
impl AnswerModel for LlmServiceProfiles {
    async fn complete(&self, prompt: &str) -> Result<String, EngineError> {
        Ok(self.generate_answer(prompt, None).await?)
    }
}

/// Tuning knobs for [`AnswerPipeline::answer`].
#[derive(Debug, Clone, Copy)]
pub struct AnswerOptions {
    /// How many nearest documents to request from the index.
    pub top_k: u64,
    /// Minimum similarity score a match must reach to be used.
    pub min_score: f32,
}

impl Default for AnswerOptions {
    fn default() -> Self {
        Self {
            top_k: 5,
            min_score: 0.30,
        }
    }
}

/// The outcome of one answered question.
#[derive(Debug, Clone)]
pub struct AnswerResult {
    /// Model answer with the sources footer appended, or the fallback text.
    pub response: String,
    /// Metadata of every cited source, ranked order preserved. This is the
    /// machine-readable source list; the footer is its human-readable twin.
    pub metadata: Vec<DocumentMetadata>,
}

/// Question in, cited answer out.
///
/// Exactly one embedding call, one index query and at most one model call
/// per invocation. Provider failures propagate to the caller unchanged; the
/// no-match case is a success path with a fixed fallback text.
pub struct AnswerPipeline {
    index: Arc<dyn DocumentIndex>,
    embedder: Arc<dyn EmbeddingsProvider>,
    model: Arc<dyn AnswerModel>,
    opts: AnswerOptions,
}

impl AnswerPipeline {
    pub fn new(
        index: Arc<dyn DocumentIndex>,
        embedder: Arc<dyn EmbeddingsProvider>,
        model: Arc<dyn AnswerModel>,
        opts: AnswerOptions,
    ) -> Self {
        Self {
            index,
            embedder,
            model,
            opts,
        }
    }

    /// Answers `question` from indexed podcast summaries.
    ///
    /// The caller guarantees a non-empty question; the HTTP and CLI layers
    /// reject blank input before this point.
    ///
    /// # Errors
    /// Propagates embedding, index and model failures without retrying.
    pub async fn answer(&self, question: &str) -> Result<AnswerResult, EngineError> {
        info!("Answering question ({} chars)", question.len());

        let vector = self.embedder.embed(question).await?;
        let matches = self.index.query(vector, self.opts.top_k).await?;

        // Keep the index ranking; only drop weak matches.
        let retained: Vec<ScoredMatch> = matches
            .into_iter()
            .filter(|m| m.score >= self.opts.min_score)
            .collect();

        if retained.is_empty() {
            debug!("No match reached min_score={}", self.opts.min_score);
            return Ok(AnswerResult {
                response: prompt::FALLBACK_MESSAGE.to_string(),
                metadata: Vec::new(),
            });
        }

        let context = prompt::build_context(&retained);
        let final_prompt = prompt::grounded_prompt(&context, question, retained.len());

        debug!("Invoking model with {} sources", retained.len());
        let raw = self.model.complete(&final_prompt).await?;

        let response = prompt::append_sources(&raw, &retained);
        let metadata = retained.into_iter().map(|m| m.metadata).collect();

        Ok(AnswerResult { response, metadata })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::{future::Future, pin::Pin};
    use uuid::Uuid;
    use vector_index::{IndexError, IndexedDocument};

    struct FakeEmbedder;

    impl EmbeddingsProvider for FakeEmbedder {
        fn embed<'a>(
            &'a self,
            _text: &'a str,
        ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, IndexError>> + Send + 'a>> {
            Box::pin(async { Ok(vec![0.1, 0.2, 0.3]) })
        }
    }

    struct FakeIndex {
        matches: Vec<ScoredMatch>,
    }

    #[async_trait]
    impl DocumentIndex for FakeIndex {
        async fn upsert(
            &self,
            _point_id: Uuid,
            _vector: Vec<f32>,
            _document: &IndexedDocument,
        ) -> Result<(), IndexError> {
            unreachable!("answer tests never upsert")
        }

        async fn query(
            &self,
            _vector: Vec<f32>,
            _top_k: u64,
        ) -> Result<Vec<ScoredMatch>, IndexError> {
            Ok(self.matches.clone())
        }
    }

    struct FakeModel {
        calls: AtomicUsize,
        last_prompt: Mutex<Option<String>>,
    }

    impl FakeModel {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                last_prompt: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl AnswerModel for FakeModel {
        async fn complete(&self, prompt: &str) -> Result<String, EngineError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_prompt.lock().unwrap() = Some(prompt.to_string());
            Ok("Grounded answer referencing [First].".to_string())
        }
    }

    fn scored(title: &str, score: f32) -> ScoredMatch {
        ScoredMatch {
            content: format!("{title} summary"),
            metadata: DocumentMetadata {
                episode_id: format!("ep-{title}"),
                podcast_title: title.into(),
                podcast_description: String::new(),
                podcast_url: format!("https://youtu.be/{title}"),
                length: None,
                database_record_date: None,
                is_new: true,
            },
            score,
        }
    }

    fn pipeline(matches: Vec<ScoredMatch>, model: Arc<FakeModel>) -> AnswerPipeline {
        AnswerPipeline::new(
            Arc::new(FakeIndex { matches }),
            Arc::new(FakeEmbedder),
            model,
            AnswerOptions::default(),
        )
    }

    #[tokio::test]
    async fn weak_matches_never_reach_context_or_metadata() {
        let model = Arc::new(FakeModel::new());
        let p = pipeline(
            vec![
                scored("First", 0.52),
                scored("Second", 0.31),
                scored("Weak", 0.29),
                scored("Weaker", 0.10),
            ],
            model.clone(),
        );

        let result = p.answer("What are the latest benchmarks?").await.unwrap();

        assert_eq!(result.metadata.len(), 2);
        assert!(result.metadata.iter().all(|m| m.podcast_title != "Weak"));
        let prompt_sent = model.last_prompt.lock().unwrap().clone().unwrap();
        assert!(prompt_sent.contains("First summary"));
        assert!(!prompt_sent.contains("Weak summary"));
    }

    #[tokio::test]
    async fn retained_order_follows_index_ranking() {
        let model = Arc::new(FakeModel::new());
        let p = pipeline(
            vec![scored("First", 0.9), scored("Second", 0.6), scored("Third", 0.4)],
            model,
        );

        let result = p.answer("ordering?").await.unwrap();
        let titles: Vec<&str> = result
            .metadata
            .iter()
            .map(|m| m.podcast_title.as_str())
            .collect();
        assert_eq!(titles, ["First", "Second", "Third"]);
    }

    #[tokio::test]
    async fn empty_results_short_circuit_without_model_call() {
        let model = Arc::new(FakeModel::new());
        let p = pipeline(vec![scored("Weak", 0.2)], model.clone());

        let result = p.answer("anything new?").await.unwrap();

        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
        assert!(result.metadata.is_empty());
        assert_eq!(result.response, prompt::FALLBACK_MESSAGE);
    }

    #[tokio::test]
    async fn two_retained_sources_give_one_model_call_and_two_footer_lines() {
        let model = Arc::new(FakeModel::new());
        let p = pipeline(
            vec![
                scored("First", 0.52),
                scored("Second", 0.31),
                scored("A", 0.29),
                scored("B", 0.12),
                scored("C", 0.05),
            ],
            model.clone(),
        );

        let result = p
            .answer("What are the latest small language model benchmarks?")
            .await
            .unwrap();

        assert_eq!(model.calls.load(Ordering::SeqCst), 1);
        let prompt_sent = model.last_prompt.lock().unwrap().clone().unwrap();
        assert!(prompt_sent.contains("Below are 2 relevant podcast summaries"));

        let footer = result.response.split("**Sources:**").nth(1).unwrap();
        assert_eq!(footer.matches("- ").count(), 2);
        assert!(footer.contains("- First (https://youtu.be/First)"));
        assert!(footer.contains("- Second (https://youtu.be/Second)"));
        assert_eq!(result.metadata.len(), 2);
    }

    #[tokio::test]
    async fn model_failure_propagates() {
        struct FailingModel;

        #[async_trait]
        impl AnswerModel for FailingModel {
            async fn complete(&self, _prompt: &str) -> Result<String, EngineError> {
                Err(EngineError::Conversion("boom".into()))
            }
        }

        let p = AnswerPipeline::new(
            Arc::new(FakeIndex {
                matches: vec![scored("First", 0.9)],
            }),
            Arc::new(FakeEmbedder),
            Arc::new(FailingModel),
            AnswerOptions::default(),
        );

        assert!(p.answer("q").await.is_err());
    }
}
