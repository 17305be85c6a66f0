/// Profile Directory
///
/// Serves an invite leaderboard and profile search over a flat-file snapshot of
/// a remote profile directory, plus the ingestion run that downloads it.

pub mod api;
pub mod config;
pub mod context;
pub mod dataset_store;
pub mod directory;
pub mod error;
pub mod ingest;
pub mod metrics;
pub mod rate_limit;
pub mod server;

/// Install the tracing subscriber shared by both binaries
///
/// `filter` is an `EnvFilter` directive string, normally `config.logging.level`.
pub fn init_tracing(filter: &str) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    tracing_subscriber::registry()
        .with(EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();
}
