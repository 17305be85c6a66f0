/// HTTP server setup and routing
use crate::{
    context::AppContext,
    error::{DirectoryError, DirectoryResult},
    metrics,
    rate_limit::rate_limit_middleware,
};
use axum::{
    handler::HandlerWithoutStateExt,
    http::{header, Method, StatusCode},
    middleware,
    response::Json,
    routing::get,
    Router,
};
use serde_json::json;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::info;

/// Build the main application router
pub fn build_router(ctx: AppContext) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers([header::CONTENT_TYPE]);

    // Browser UI; anything it doesn't have falls through to the JSON 404
    let static_files = ServeDir::new(&ctx.config.storage.static_directory)
        .not_found_service(not_found.into_service());

    Router::new()
        .route("/metrics", get(metrics_handler))
        .merge(crate::api::routes())
        .with_state(ctx.clone())
        .fallback_service(static_files)
        .layer(middleware::from_fn(metrics::track_http_metrics))
        .layer(middleware::from_fn_with_state(
            ctx.rate_limiter.clone(),
            rate_limit_middleware,
        ))
        .layer(cors)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
}

/// Prometheus scrape endpoint
async fn metrics_handler() -> String {
    metrics::render_metrics()
}

/// 404 handler
async fn not_found() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "Endpoint not found"
        })),
    )
}

/// Start the HTTP server
pub async fn serve(ctx: AppContext) -> DirectoryResult<()> {
    let addr = ctx.bind_address();

    info!("Profile directory listening on {}", addr);
    info!("   Dataset: {}", ctx.store.path().display());
    info!("   Static UI: {}", ctx.config.storage.static_directory.display());

    let app = build_router(ctx);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| DirectoryError::Internal(format!("Failed to bind to {}: {}", addr, e)))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| DirectoryError::Internal(format!("Server error: {}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{api::profiles::ProfilesResponse, config::ServerConfig, error::ErrorResponse};
    use axum::{
        body::{to_bytes, Body},
        http::Request,
    };
    use serde_json::Value;
    use tempfile::{tempdir, TempDir};
    use tower::ServiceExt;

    async fn context_with(dataset: Option<&str>) -> (TempDir, AppContext) {
        let dir = tempdir().unwrap();
        let mut config = ServerConfig::default();
        config.storage.data_directory = dir.path().to_path_buf();
        config.storage.dataset_path = dir.path().join("profiles.json");
        config.storage.static_directory = dir.path().join("static");
        config.rate_limit.enabled = false;

        if let Some(contents) = dataset {
            std::fs::write(&config.storage.dataset_path, contents).unwrap();
        }

        let ctx = AppContext::new(config).await.unwrap();
        (dir, ctx)
    }

    async fn send_get(ctx: AppContext, uri: &str) -> (StatusCode, Vec<u8>) {
        let response = build_router(ctx)
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    fn usernames(body: &[u8]) -> Vec<String> {
        let response: ProfilesResponse = serde_json::from_slice(body).unwrap();
        response
            .data
            .values
            .into_iter()
            .map(|v| v["actor"]["username"].as_str().unwrap_or_default().to_string())
            .collect()
    }

    const DATASET: &str = r#"[
        {"id": 1, "invitesAvailable": 5, "actor": {"username": "alice", "name": "Alice", "score": 10}},
        {"id": 2, "invitesAvailable": 5, "actor": {"username": "bob", "name": "Bob", "score": 20}},
        {"id": 3, "invitesAvailable": 9, "actor": null}
    ]"#;

    #[tokio::test]
    async fn test_search_without_term_returns_top_ranked() {
        let (_dir, ctx) = context_with(Some(DATASET)).await;

        let (status, body) = send_get(ctx, "/api/profiles").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(usernames(&body), vec!["alice", "bob"]);
    }

    #[tokio::test]
    async fn test_search_with_term_filters() {
        let (_dir, ctx) = context_with(Some(DATASET)).await;

        let (status, body) = send_get(ctx, "/api/profiles?username=ALI").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(usernames(&body), vec!["alice"]);
    }

    #[tokio::test]
    async fn test_empty_username_param_is_empty_search() {
        let (_dir, ctx) = context_with(Some(DATASET)).await;

        let (_, body) = send_get(ctx, "/api/profiles?username=").await;
        assert_eq!(usernames(&body), vec!["alice", "bob"]);
    }

    #[tokio::test]
    async fn test_repeated_username_param_uses_first() {
        let (_dir, ctx) = context_with(Some(DATASET)).await;

        let (status, body) = send_get(ctx, "/api/profiles?username=ali&username=bob").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(usernames(&body), vec!["alice"]);
    }

    #[tokio::test]
    async fn test_records_are_returned_as_stored() {
        let stored = json!({
            "id": 4,
            "extra": "kept",
            "invitesAvailable": 1,
            "actor": { "avatar": null, "name": "Dana", "profileId": "7", "username": "dana" },
            "inviterActor": { "username": "root" }
        });
        let dataset = serde_json::to_string(&vec![stored.clone()]).unwrap();

        for uri in ["/api/profiles", "/api/profiles?username=dan", "/api/profiles/leaderboard"] {
            let (_dir, ctx) = context_with(Some(&dataset)).await;
            let (status, body) = send_get(ctx, uri).await;
            assert_eq!(status, StatusCode::OK);

            let value: Value = serde_json::from_slice(&body).unwrap();
            assert_eq!(value["data"]["values"], json!([stored.clone()]));
        }
    }

    #[tokio::test]
    async fn test_leaderboard_breaks_ties_on_score() {
        let (_dir, ctx) = context_with(Some(DATASET)).await;

        let (status, body) = send_get(ctx, "/api/profiles/leaderboard").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(usernames(&body), vec!["bob", "alice"]);
    }

    #[tokio::test]
    async fn test_missing_dataset_returns_generic_error() {
        let (_dir, ctx) = context_with(None).await;

        let (status, body) = send_get(ctx, "/api/profiles?username=alice").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

        let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.error, crate::error::FETCH_FAILED_MESSAGE);
    }

    #[tokio::test]
    async fn test_malformed_dataset_returns_generic_error() {
        let (_dir, ctx) = context_with(Some("{not json")).await;

        let (status, body) = send_get(ctx, "/api/profiles/leaderboard").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

        let value: Value = serde_json::from_slice(&body).unwrap();
        assert!(value.get("data").is_none());
        assert_eq!(value["error"], "Failed to fetch profiles");
    }

    #[tokio::test]
    async fn test_readiness_tracks_dataset() {
        let (_dir, ctx) = context_with(None).await;
        let (status, _) = send_get(ctx, "/health/ready").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

        let (_dir, ctx) = context_with(Some(DATASET)).await;
        let (status, body) = send_get(ctx, "/health/ready").await;
        assert_eq!(status, StatusCode::OK);

        let value: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["records"], 3);
    }

    #[tokio::test]
    async fn test_unknown_path_is_json_not_found() {
        let (_dir, ctx) = context_with(Some(DATASET)).await;

        let (status, body) = send_get(ctx, "/api/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let value: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["error"], "Endpoint not found");
    }

    #[tokio::test]
    async fn test_static_ui_is_served() {
        let (dir, ctx) = context_with(Some(DATASET)).await;
        std::fs::create_dir_all(dir.path().join("static")).unwrap();
        std::fs::write(dir.path().join("static").join("index.html"), "<html>ok</html>").unwrap();

        let (status, body) = send_get(ctx, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"<html>ok</html>");
    }

    #[tokio::test]
    async fn test_metrics_endpoint_renders_text() {
        let (_dir, ctx) = context_with(Some(DATASET)).await;
        let (_, _) = send_get(ctx.clone(), "/api/profiles").await;

        let (status, body) = send_get(ctx, "/metrics").await;
        assert_eq!(status, StatusCode::OK);
        assert!(String::from_utf8_lossy(&body).contains("dataset_loads_total"));
    }
}
