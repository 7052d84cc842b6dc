// HTTP surface: scan entry point, index page, health

pub mod pages;
pub mod scan;

use crate::app::AppState;
use axum::{
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.server.cors_allowed_origins);

    Router::new()
        .route("/", get(pages::index))
        .route("/health", get(pages::health))
        .route("/scan", post(scan::scan_url))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// "*" anywhere in the list allows any origin
fn cors_layer(origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return base.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            },
        })
        .collect();

    base.allow_origin(allowed)
}
