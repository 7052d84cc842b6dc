// Scan entry point
// POST /scan {url} -> flat scan record, or {is_valid: false, error}

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use tracing::{debug, warn};

use crate::{
    app::AppState,
    models::scan::{ScanReport, ScanRequest},
    utils::scan_errors::ScanError,
};

/// Invalid URLs are answered with 200 and a rejection record; only an
/// unreadable request body is an error
pub async fn scan_url(
    State(state): State<AppState>,
    payload: Result<Json<ScanRequest>, JsonRejection>,
) -> Result<Json<ScanReport>, ScanError> {
    let Json(request) = payload.map_err(|rejection| {
        warn!("Rejected scan request body: {}", rejection.body_text());
        ScanError::BadRequest(rejection.body_text())
    })?;

    debug!("Scan requested for {:?}", request.url);
    let outcome = state.scanner.scan_url(&request.url).await;

    Ok(Json(outcome.into()))
}
