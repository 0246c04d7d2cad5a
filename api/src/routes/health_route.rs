//! GET /api/v1/health — liveness probe.

use axum::Json;
use serde::Serialize;

use crate::API_VERSION;

/// Liveness body. Flat, so probes can match on `status` directly.
#[derive(Serialize)]
pub struct HealthBody {
    pub status: &'static str,
    pub version: &'static str,
    pub service: &'static str,
}

/// Handler: GET /api/v1/health
pub async fn health() -> Json<HealthBody> {
    Json(HealthBody {
        status: "ok",
        version: API_VERSION,
        service: "podsight",
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    #[tokio::test]
    async fn body_reports_the_service_and_version() {
        let Json(body) = health().await;
        let encoded: Value = serde_json::to_value(&body).unwrap();

        assert_eq!(
            encoded,
            json!({ "status": "ok", "version": "v1", "service": "podsight" })
        );
    }
}
