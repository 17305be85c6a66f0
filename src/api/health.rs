/// Health check endpoints
///
/// Supports two types of probes:
/// - Liveness: Is the process up and answering?
/// - Readiness: Can the dataset be loaded so queries will succeed?

use crate::context::AppContext;
use axum::{extract::State, http::StatusCode, response::Json, routing::get, Router};
use serde_json::json;

/// Build health check routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/health", get(health_basic))
        .route("/health/ready", get(readiness_probe))
}

/// Basic health check
pub async fn health_basic() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Readiness probe
///
/// Returns 200 with the record count when the dataset parses, 503 otherwise.
pub async fn readiness_probe(
    State(ctx): State<AppContext>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    match ctx.store.load().await {
        Ok(records) => Ok(Json(json!({
            "status": "ready",
            "version": env!("CARGO_PKG_VERSION"),
            "records": records.len()
        }))),
        Err(e) => {
            tracing::warn!(error = %e, "readiness_probe_failed: dataset check failed");
            Err(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}
