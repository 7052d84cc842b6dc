// Library exports for the phishing scanner
// This file exposes modules and functions for library consumers

pub mod app;
pub mod app_config;
pub mod config;
pub mod handlers;
pub mod models;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use app::{AppState, AppStateError};
pub use app_config::{AppConfig, ConfigError, DEFAULT_LOG_FILTER};
pub use config::{HeuristicConfig, ScoreWeights};
pub use models::scan::{
    BlacklistVerdict, Finding, FindingCategory, RiskLevel, ScanOutcome, ScanReport, ScanResult,
};
pub use services::{
    BlacklistLookup, ReportSink, SafeBrowsingClient, ScanOrchestrator, Scanner, TextSource,
    UrlWatcher,
};
pub use utils::{ScanError, WatcherError};

// Re-export the router builder
pub use handlers::build_router;

/// Install the fmt subscriber used by both binaries.
/// Falls back to the default filter if `filter` has no valid directives.
pub fn init_tracing(filter: &str) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_new(filter)
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
