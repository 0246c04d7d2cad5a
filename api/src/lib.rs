//! HTTP surface for the podcast insight service.

use std::{env, sync::Arc};

mod core;
mod error_handler;
mod routes;

pub use crate::core::app_state::AppState;
pub use error_handler::{AppError, AppResult};

use axum::{
    Router,
    http::StatusCode,
    response::Response,
    routing::{get, post},
};
use tokio::signal;
use tracing::info;

use crate::core::http::response_envelope::ApiResponse;
use crate::routes::{chat_route::chat, health_route::health};

/// API namespace version, part of every route path.
pub const API_VERSION: &str = "v1";

/// Bind address used when `API_ADDRESS` is not set.
const DEFAULT_ADDRESS: &str = "0.0.0.0:8000";

/// Builds the router with all routes and shared state.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route(&format!("/api/{API_VERSION}/chat"), post(chat))
        .route(&format!("/api/{API_VERSION}/health"), get(health))
        .fallback(not_found)
        .with_state(state)
}

/// Starts the server and blocks until shutdown.
///
/// # Errors
/// Fails when configuration is incomplete, the address cannot be bound, or
/// the server loop errors out.
pub async fn start() -> Result<(), AppError> {
    let address = env::var("API_ADDRESS").unwrap_or_else(|_| DEFAULT_ADDRESS.into());

    let state = Arc::new(AppState::from_env().await?);
    let app = app(state);

    // Bind to address
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .map_err(AppError::Bind)?;
    info!("Listening on {address}");

    // Start server with graceful shutdown on Ctrl+C
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    Ok(())
}

/// Unknown routes answer with the standard error envelope.
async fn not_found() -> Response {
    ApiResponse::<()>::error("The requested resource was not found")
        .into_response_with_status(StatusCode::NOT_FOUND)
}

/// Returns a future that resolves when Ctrl+C is pressed.
async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        // Keep serving rather than shutting down on a broken signal hook.
        std::future::pending::<()>().await;
    }
}
