/// Remote directory API client
use crate::{
    config::IngestionConfig,
    error::{DirectoryError, DirectoryResult},
};
use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE},
    Client, StatusCode,
};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Path of the paginated directory listing
const DIRECTORY_PATH: &str = "/api/v1/profiles/directory";

/// One page of the remote directory
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DirectoryPage {
    /// Raw records; shape checks happen at query time, not here
    #[serde(default)]
    pub values: Vec<Value>,
    /// Total size of the directory as reported by the API
    #[serde(default)]
    pub total: Option<usize>,
}

/// Directory API response envelope
#[derive(Debug, Deserialize)]
struct DirectoryResponse {
    #[serde(default)]
    ok: Option<bool>,
    data: DirectoryPage,
}

/// Turn a directory API reply into a page.
///
/// A non-success status, a body that is not the expected envelope, and an
/// explicit `ok: false` are all upstream failures.
pub fn parse_directory_response(status: StatusCode, body: &str) -> DirectoryResult<DirectoryPage> {
    if !status.is_success() {
        return Err(DirectoryError::Upstream(format!(
            "Failed to fetch profiles: directory returned {}",
            status
        )));
    }

    let response: DirectoryResponse = serde_json::from_str(body).map_err(|e| {
        DirectoryError::Upstream(format!("Failed to parse directory response: {}", e))
    })?;

    if response.ok == Some(false) {
        return Err(DirectoryError::Upstream(
            "Directory reported ok=false".to_string(),
        ));
    }

    Ok(response.data)
}

/// Anything that can hand out directory pages
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch `limit` records starting at `offset`
    async fn fetch_page(&self, offset: usize, limit: usize) -> DirectoryResult<DirectoryPage>;
}

/// HTTP client for the remote directory API
pub struct DirectoryClient {
    http_client: Client,
    base_url: String,
}

impl DirectoryClient {
    /// Create a new directory client
    pub fn new(config: &IngestionConfig) -> DirectoryResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert("x-ethos-service", HeaderValue::from_static("web"));

        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| DirectoryError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn page_url(&self) -> String {
        format!("{}{}", self.base_url, DIRECTORY_PATH)
    }
}

#[async_trait]
impl PageSource for DirectoryClient {
    async fn fetch_page(&self, offset: usize, limit: usize) -> DirectoryResult<DirectoryPage> {
        let url = self.page_url();
        debug!("Fetching directory page: {} (offset={}, limit={})", url, offset, limit);

        let response = self
            .http_client
            .get(&url)
            .query(&[("limit", limit), ("offset", offset)])
            .send()
            .await
            .map_err(|e| DirectoryError::Upstream(format!("Failed to fetch profiles: {}", e)))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            DirectoryError::Upstream(format!("Failed to read directory response: {}", e))
        })?;

        parse_directory_response(status, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerConfig;

    #[test]
    fn test_page_url_ignores_trailing_slash() {
        let mut config = ServerConfig::default().ingestion;
        config.base_url = "https://directory.example.com/".to_string();

        let client = DirectoryClient::new(&config).unwrap();
        assert_eq!(
            client.page_url(),
            "https://directory.example.com/api/v1/profiles/directory"
        );
    }

    #[test]
    fn test_directory_response_parsing() {
        let body = r#"{
            "ok": true,
            "data": {
                "values": [{"id": 1}, {"id": 2}],
                "limit": 100,
                "offset": 0,
                "total": 3790
            }
        }"#;

        let page = parse_directory_response(StatusCode::OK, body).unwrap();
        assert_eq!(page.values.len(), 2);
        assert_eq!(page.total, Some(3790));
    }

    #[test]
    fn test_directory_response_without_metadata() {
        let page = parse_directory_response(StatusCode::OK, r#"{"data": {"values": []}}"#).unwrap();
        assert!(page.values.is_empty());
        assert_eq!(page.total, None);
    }

    #[test]
    fn test_error_status_is_upstream_failure() {
        let body = r#"{"ok": true, "data": {"values": [{"id": 1}]}}"#;

        for status in [StatusCode::SERVICE_UNAVAILABLE, StatusCode::NOT_FOUND] {
            let err = parse_directory_response(status, body).unwrap_err();
            assert!(matches!(err, DirectoryError::Upstream(_)));
            assert!(err.to_string().contains(status.as_str()));
        }
    }

    #[test]
    fn test_ok_false_is_upstream_failure() {
        let body = r#"{"ok": false, "data": {"values": []}}"#;
        let err = parse_directory_response(StatusCode::OK, body).unwrap_err();
        assert!(matches!(err, DirectoryError::Upstream(_)));
    }

    #[test]
    fn test_unexpected_body_is_upstream_failure() {
        for body in ["<html>busy</html>", r#"{"ok": true}"#, ""] {
            let err = parse_directory_response(StatusCode::OK, body).unwrap_err();
            assert!(matches!(err, DirectoryError::Upstream(_)));
        }
    }
}
