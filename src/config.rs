/// Configuration management for the profile directory
use crate::error::{DirectoryError, DirectoryResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Main server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub service: ServiceConfig,
    pub storage: StorageConfig,
    pub ingestion: IngestionConfig,
    pub rate_limit: RateLimitSettings,
    pub logging: LoggingConfig,
}

/// Service-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub hostname: String,
    pub port: u16,
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_directory: PathBuf,
    /// Flat JSON file holding the latest snapshot
    pub dataset_path: PathBuf,
    /// Directory the browser UI is served from
    pub static_directory: PathBuf,
}

/// Remote directory ingestion configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestionConfig {
    pub base_url: String,
    pub page_size: usize,
    /// Number of records to download before stopping
    pub total: usize,
    /// Write a snapshot after at least this many new records
    pub checkpoint_every: usize,
    pub timeout_secs: u64,
}

/// Rate limiting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitSettings {
    pub enabled: bool,
    pub requests_per_second: u32,
    pub burst_size: u32,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directives handed to the tracing subscriber (`RUST_LOG`)
    pub level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        let data_directory = PathBuf::from("./data");
        Self {
            service: ServiceConfig {
                hostname: "localhost".to_string(),
                port: 3000,
            },
            storage: StorageConfig {
                dataset_path: data_directory.join("profiles.json"),
                data_directory,
                static_directory: PathBuf::from("./static"),
            },
            ingestion: IngestionConfig {
                base_url: "https://api.ethos.network".to_string(),
                page_size: 100,
                total: 3790,
                checkpoint_every: 1000,
                timeout_secs: 30,
            },
            rate_limit: RateLimitSettings {
                enabled: true,
                requests_per_second: 50,
                burst_size: 100,
            },
            logging: LoggingConfig {
                level: "profile_directory=info,ingest=info,tower_http=debug".to_string(),
            },
        }
    }
}

/// Read a numeric variable, falling back to the default when unset
fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> DirectoryResult<T> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| DirectoryError::Validation(format!("Invalid value for {}: {}", name, raw))),
        Err(_) => Ok(default),
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> DirectoryResult<Self> {
        dotenv::dotenv().ok();
        let defaults = Self::default();

        let hostname =
            env::var("DIRECTORY_HOSTNAME").unwrap_or_else(|_| defaults.service.hostname.clone());
        let port = parse_var("DIRECTORY_PORT", defaults.service.port)?;

        let data_directory: PathBuf = env::var("DIRECTORY_DATA_DIRECTORY")
            .map(PathBuf::from)
            .unwrap_or(defaults.storage.data_directory);
        let dataset_path = env::var("DIRECTORY_DATASET_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| data_directory.join("profiles.json"));
        let static_directory = env::var("DIRECTORY_STATIC_DIRECTORY")
            .map(PathBuf::from)
            .unwrap_or(defaults.storage.static_directory);

        let base_url = env::var("DIRECTORY_INGEST_BASE_URL")
            .unwrap_or(defaults.ingestion.base_url)
            .trim_end_matches('/')
            .to_string();
        let page_size = parse_var("DIRECTORY_INGEST_PAGE_SIZE", defaults.ingestion.page_size)?;
        let total = parse_var("DIRECTORY_INGEST_TOTAL", defaults.ingestion.total)?;
        let checkpoint_every = parse_var(
            "DIRECTORY_INGEST_CHECKPOINT_EVERY",
            defaults.ingestion.checkpoint_every,
        )?;
        let timeout_secs =
            parse_var("DIRECTORY_INGEST_TIMEOUT_SECS", defaults.ingestion.timeout_secs)?;

        let rate_limit_enabled = env::var("DIRECTORY_RATE_LIMITS_ENABLED")
            .unwrap_or_else(|_| "true".to_string())
            .parse()
            .unwrap_or(true);
        let requests_per_second = parse_var(
            "DIRECTORY_RATE_LIMIT_REQUESTS_PER_SECOND",
            defaults.rate_limit.requests_per_second,
        )?;
        let burst_size =
            parse_var("DIRECTORY_RATE_LIMIT_BURST", defaults.rate_limit.burst_size)?;

        let log_level = env::var("RUST_LOG").unwrap_or(defaults.logging.level);

        Ok(ServerConfig {
            service: ServiceConfig { hostname, port },
            storage: StorageConfig {
                data_directory,
                dataset_path,
                static_directory,
            },
            ingestion: IngestionConfig {
                base_url,
                page_size,
                total,
                checkpoint_every,
                timeout_secs,
            },
            rate_limit: RateLimitSettings {
                enabled: rate_limit_enabled,
                requests_per_second,
                burst_size,
            },
            logging: LoggingConfig { level: log_level },
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> DirectoryResult<()> {
        if self.service.hostname.is_empty() {
            return Err(DirectoryError::Validation("Hostname cannot be empty".to_string()));
        }

        if self.ingestion.page_size == 0 {
            return Err(DirectoryError::Validation(
                "Ingestion page size must be positive".to_string(),
            ));
        }

        if self.ingestion.total == 0 {
            return Err(DirectoryError::Validation(
                "Ingestion total must be positive".to_string(),
            ));
        }

        if self.ingestion.checkpoint_every == 0 {
            return Err(DirectoryError::Validation(
                "Checkpoint interval must be positive".to_string(),
            ));
        }

        if let Err(e) = tracing_subscriber::EnvFilter::try_new(&self.logging.level) {
            return Err(DirectoryError::Validation(format!(
                "Invalid log level '{}': {}",
                self.logging.level, e
            )));
        }

        Ok(())
    }
}
