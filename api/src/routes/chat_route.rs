//! POST /api/v1/chat — answers podcast questions with retrieval context.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::Response,
};
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info, warn};
use vector_index::DocumentMetadata;

use crate::{
    core::{app_state::AppState, http::response_envelope::ApiResponse},
    error_handler::{AppError, AppResult},
};

/// Success payload for one answered question.
#[derive(Serialize)]
pub struct ChatData {
    /// Final model answer, markdown with a sources footer.
    pub response: String,
    /// Metadata of every source that informed the answer.
    pub metadata: Vec<DocumentMetadata>,
    /// Wall-clock time spent answering, e.g. "1.27s".
    pub processing_time: String,
}

/// Handler: POST /api/v1/chat
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:8000/api/v1/chat \
///   -H 'content-type: application/json' \
///   -d '{"message":"What did recent episodes say about open models?"}'
/// ```
pub async fn chat(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> AppResult<Response> {
    let started = Instant::now();

    let Json(body) = payload.map_err(|_| {
        warn!("Invalid request: Content-Type is not JSON");
        AppError::BadRequest("Request must be JSON".into())
    })?;

    let question = validate_message(&body)?;

    info!("Processing query: {}", preview(question));
    let answered = state.pipeline.answer(question).await.map_err(|e| {
        error!("Error processing request: {e}");
        AppError::Internal(e.to_string())
    })?;

    let elapsed = started.elapsed().as_secs_f64();
    info!("Query processed in {elapsed:.2}s");

    let data = ChatData {
        response: answered.response,
        metadata: answered.metadata,
        processing_time: format!("{elapsed:.2}s"),
    };
    Ok(ApiResponse::success(data).into_response_with_status(StatusCode::OK))
}

/// Extracts and validates the question, with the exact client-facing
/// messages for each failure mode.
fn validate_message(body: &Value) -> Result<&str, AppError> {
    let Some(message) = body.get("message") else {
        warn!("Invalid request: Missing 'message' field");
        return Err(AppError::BadRequest(
            "Request must include 'message' field".into(),
        ));
    };

    match message.as_str() {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => {
            warn!("Invalid request: 'message' must be a non-empty string");
            Err(AppError::BadRequest(
                "'message' must be a non-empty string".into(),
            ))
        }
    }
}

/// First 50 characters of the question for the request log.
fn preview(question: &str) -> String {
    let mut chars = question.chars();
    let head: String = chars.by_ref().take(50).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_message_field_names_the_field() {
        let err = validate_message(&json!({ "question": "hi" })).unwrap_err();
        assert_eq!(err.to_string(), "Request must include 'message' field");
    }

    #[test]
    fn non_string_message_is_rejected() {
        let err = validate_message(&json!({ "message": 5 })).unwrap_err();
        assert_eq!(err.to_string(), "'message' must be a non-empty string");
    }

    #[test]
    fn blank_message_is_rejected() {
        let err = validate_message(&json!({ "message": "   " })).unwrap_err();
        assert_eq!(err.to_string(), "'message' must be a non-empty string");
    }

    #[test]
    fn valid_message_passes_through_untrimmed() {
        let body = json!({ "message": " why transformers? " });
        assert_eq!(validate_message(&body).unwrap(), " why transformers? ");
    }

    #[test]
    fn non_object_body_reads_as_missing_field() {
        let err = validate_message(&json!(["message"])).unwrap_err();
        assert_eq!(err.to_string(), "Request must include 'message' field");
    }

    #[test]
    fn preview_truncates_long_questions() {
        let long = "x".repeat(60);
        let short = "what is new?";

        assert_eq!(preview(&long), format!("{}...", "x".repeat(50)));
        assert_eq!(preview(short), short);
    }
}
