/// Health check endpoint
///
/// Reports whether the server is up and whether its store answers.
///
/// # Endpoint
///
/// ```text
/// GET /health
/// ```
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "storage": "connected"
/// }
/// ```

use crate::app::AppState;
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// "healthy" or "degraded"
    pub status: String,

    /// Application version
    pub version: String,

    /// "connected" or "disconnected"
    pub storage: String,
}

/// Health check handler
///
/// Always answers 200; a failing store only downgrades the status.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let (status, storage) = match state.store.health_check().await {
        Ok(()) => ("healthy", "connected"),
        Err(e) => {
            tracing::warn!(backend = state.store.backend_name(), error = %e, "Store health check failed");
            ("degraded", "disconnected")
        }
    };

    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        storage: storage.to_string(),
    })
}
