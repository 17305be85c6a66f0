/// Application context and dependency injection
use crate::{
    config::ServerConfig,
    dataset_store::DatasetStore,
    error::DirectoryResult,
    rate_limit::RateLimiter,
};
use std::sync::Arc;

/// Application context holding all shared services
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<ServerConfig>,
    pub store: DatasetStore,
    pub rate_limiter: RateLimiter,
}

impl AppContext {
    /// Create a new application context from configuration
    pub async fn new(config: ServerConfig) -> DirectoryResult<Self> {
        config.validate()?;

        let store = DatasetStore::new(config.storage.dataset_path.clone());
        if tokio::fs::metadata(store.path()).await.is_err() {
            // Not fatal: every request reports the load failure until ingestion runs
            tracing::warn!(
                "Dataset {} not found; run the ingest tool to download it",
                store.path().display()
            );
        }

        let rate_limiter = RateLimiter::new(&config.rate_limit);

        Ok(Self {
            config: Arc::new(config),
            store,
            rate_limiter,
        })
    }

    /// Address the HTTP server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.config.service.hostname, self.config.service.port)
    }
}
