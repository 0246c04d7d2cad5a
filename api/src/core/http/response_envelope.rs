use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Universal response envelope for both success and error (simplified).
#[derive(Serialize)]
pub struct ApiResponse<T>
where
    T: Serialize,
{
    /// "success" or "error".
    pub status: &'static str,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    /// Human-friendly message, populated on errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Failure detail, only exposed when diagnostics are enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T>
where
    T: Serialize,
{
    /// Build a success envelope.
    pub fn success(data: T) -> Self {
        Self {
            status: "success",
            data: Some(data),
            message: None,
            error: None,
        }
    }

    /// Build an error envelope.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error",
            data: None,
            message: Some(message.into()),
            error: None,
        }
    }

    /// Attach a failure detail to an error envelope.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.error = Some(detail.into());
        self
    }

    /// Convert to axum Response.
    pub fn into_response_with_status(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    #[test]
    fn success_envelope_carries_only_status_and_data() {
        let body = ApiResponse::success(json!({ "answer": 42 }));
        let encoded: Value = serde_json::to_value(&body).unwrap();

        assert_eq!(encoded, json!({ "status": "success", "data": { "answer": 42 } }));
    }

    #[test]
    fn error_envelope_carries_only_status_and_message() {
        let body = ApiResponse::<()>::error("nope");
        let encoded: Value = serde_json::to_value(&body).unwrap();

        assert_eq!(encoded, json!({ "status": "error", "message": "nope" }));
    }

    #[test]
    fn detail_appears_when_attached() {
        let body = ApiResponse::<()>::error("nope").with_detail("stack trace");
        let encoded: Value = serde_json::to_value(&body).unwrap();

        assert_eq!(encoded["error"], "stack trace");
    }
}
