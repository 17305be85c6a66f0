/// Unified error types for the profile directory
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Message returned to clients whenever the dataset cannot be served
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch profiles";

/// Main error type for the directory service and ingestion tool
#[derive(Error, Debug)]
pub enum DirectoryError {
    /// Dataset file missing, unreadable or not a JSON array
    #[error("Dataset load error: {0}")]
    DatasetLoad(String),

    /// Remote directory API errors (non-2xx, transport, bad payload)
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// Configuration and request validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Rate limiting errors
    #[error("Rate limit exceeded")]
    RateLimitExceeded { retry_after: std::time::Duration },

    /// Internal server errors
    #[error("Internal error: {0}")]
    Internal(String),

    /// JSON errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Error payload returned by every endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl DirectoryError {
    /// Status code this error maps to
    pub fn status_code(&self) -> StatusCode {
        match self {
            DirectoryError::Validation(_) => StatusCode::BAD_REQUEST,
            DirectoryError::RateLimitExceeded { .. } => StatusCode::TOO_MANY_REQUESTS,
            DirectoryError::Upstream(_) => StatusCode::BAD_GATEWAY,
            DirectoryError::DatasetLoad(_)
            | DirectoryError::Internal(_)
            | DirectoryError::Json(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Convert DirectoryError to HTTP response
impl IntoResponse for DirectoryError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            DirectoryError::Validation(_) => self.to_string(),
            DirectoryError::RateLimitExceeded { .. } => "Rate limit exceeded".to_string(),
            // Don't leak details
            _ => {
                tracing::error!(error = %self, "request failed");
                FETCH_FAILED_MESSAGE.to_string()
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

/// Result type alias for directory operations
pub type DirectoryResult<T> = Result<T, DirectoryError>;
