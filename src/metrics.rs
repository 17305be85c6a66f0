/// Metrics and telemetry for the profile directory
///
/// Provides Prometheus-compatible metrics for monitoring:
/// - HTTP request counts and latencies
/// - Dataset loads
/// - Ingestion pages and checkpoints

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter, register_int_counter_vec, Encoder,
    HistogramVec, IntCounter, IntCounterVec, TextEncoder,
};
use std::time::Instant;

lazy_static! {
    // ========== HTTP Metrics ==========

    /// Total HTTP requests by method, path, and status
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "http_requests_total",
        "Total number of HTTP requests",
        &["method", "path", "status"]
    )
    .unwrap();

    /// HTTP request duration in seconds
    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "http_request_duration_seconds",
        "HTTP request latencies in seconds",
        &["method", "path"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]
    )
    .unwrap();

    // ========== Dataset Metrics ==========

    /// Dataset file loads by outcome
    pub static ref DATASET_LOADS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "dataset_loads_total",
        "Total number of dataset file loads",
        &["status"]
    )
    .unwrap();

    // ========== Ingestion Metrics ==========

    /// Directory pages fetched from the remote API
    pub static ref INGEST_PAGES_TOTAL: IntCounter = register_int_counter!(
        "ingest_pages_total",
        "Total number of directory pages fetched"
    )
    .unwrap();

    /// Snapshots written during ingestion
    pub static ref INGEST_CHECKPOINTS_TOTAL: IntCounter = register_int_counter!(
        "ingest_checkpoints_total",
        "Total number of dataset checkpoints written"
    )
    .unwrap();
}

/// Render metrics in Prometheus text format
pub fn render_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::warn!("Failed to encode metrics: {}", e);
    }
    String::from_utf8_lossy(&buffer).into_owned()
}

/// Record an HTTP request
pub fn record_http_request(method: &str, path: &str, status: u16, duration: f64) {
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[method, path, &status.to_string()])
        .inc();
    HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&[method, path])
        .observe(duration);
}

/// Record a dataset load
pub fn record_dataset_load(success: bool) {
    DATASET_LOADS_TOTAL
        .with_label_values(&[if success { "success" } else { "failure" }])
        .inc();
}

/// Record a fetched ingestion page
pub fn record_ingest_page() {
    INGEST_PAGES_TOTAL.inc();
}

/// Record a written checkpoint
pub fn record_ingest_checkpoint() {
    INGEST_CHECKPOINTS_TOTAL.inc();
}

/// Middleware timing every request
pub async fn track_http_metrics(request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    // Matched route template keeps label cardinality bounded
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());
    let start = Instant::now();

    let response = next.run(request).await;

    record_http_request(
        &method,
        &path,
        response.status().as_u16(),
        start.elapsed().as_secs_f64(),
    );

    response
}
