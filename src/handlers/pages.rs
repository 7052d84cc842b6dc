// Index page and health check

use axum::{extract::State, response::Html, Json};
use serde_json::{json, Value};
use tracing::error;

use crate::{app::AppState, utils::scan_errors::ScanError};

const SERVICE_NAME: &str = "phish-scanner";

/// GET /
pub async fn index(State(state): State<AppState>) -> Result<Html<String>, ScanError> {
    let data = json!({
        "title": "Phishing URL Scanner",
        "version": env!("CARGO_PKG_VERSION"),
        "blacklist_configured": state.blacklist_configured,
    });

    state
        .templates
        .render("index", &data)
        .map(Html)
        .map_err(|e| {
            error!("Failed to render index page: {}", e);
            ScanError::Internal
        })
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "blacklist_configured": state.blacklist_configured,
    }))
}
