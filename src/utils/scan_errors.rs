// Error types for scanning and the clipboard watcher

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// =============================================================================
// ERROR TYPES
// =============================================================================

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Dependency unavailable: {0}")]
    DependencyUnavailable(String),

    #[error("Scan timed out after {0} ms")]
    Timeout(u64),

    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Internal server error")]
    Internal,
}

#[derive(Error, Debug)]
pub enum WatcherError {
    /// Reading the external text source failed for one poll
    #[error("Failed to read text source: {0}")]
    SourceRead(String),

    #[error("Watcher task failed: {0}")]
    TaskFailed(#[from] tokio::task::JoinError),
}

#[derive(Error, Debug)]
pub enum DomainListError {
    #[error("Failed to parse public suffix list: {0}")]
    Parse(String),
}

// =============================================================================
// HTTP RESPONSES
// =============================================================================

impl ScanError {
    fn status_code(&self) -> StatusCode {
        match self {
            ScanError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ScanError::DependencyUnavailable(_) | ScanError::Transport(_) => {
                StatusCode::BAD_GATEWAY
            },
            ScanError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            ScanError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ScanError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = Json(json!({
            "error": self.to_string(),
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}
