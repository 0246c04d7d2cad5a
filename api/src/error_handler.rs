use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::core::http::response_envelope::ApiResponse;

/// Public application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // --- Boot / config ---
    #[error("missing or invalid configuration: {0}")]
    Config(String),

    // --- IO / network / server ---
    #[error("failed to bind listener")]
    Bind(#[source] std::io::Error),

    #[error("server error")]
    Server(#[source] std::io::Error),

    // --- Request handling ---
    #[error("{0}")]
    BadRequest(String),

    /// Pipeline failure. The payload holds the internal detail; clients see
    /// a fixed message.
    #[error("Internal server error")]
    Internal(String),
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,

            AppError::Config(_)
            | AppError::Bind(_)
            | AppError::Server(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let mut body = ApiResponse::<()>::error(self.to_string());
        if let AppError::Internal(detail) = self {
            if diagnostics_enabled() {
                body = body.with_detail(detail);
            }
        }
        body.into_response_with_status(status)
    }
}

/// Handy result alias used across handlers.
pub type AppResult<T> = Result<T, AppError>;

/// Internal detail leaves the process only when the deployment opts in.
fn diagnostics_enabled() -> bool {
    std::env::var("ENVIRONMENT").is_ok_and(|v| v.eq_ignore_ascii_case("development"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_request_maps_to_400() {
        let err = AppError::BadRequest("Request must be JSON".into());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Request must be JSON");
    }

    #[test]
    fn internal_hides_its_detail_in_the_message() {
        let err = AppError::Internal("qdrant timed out".into());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Internal server error");
    }
}
