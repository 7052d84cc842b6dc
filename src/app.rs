// Application state shared across handlers
use handlebars::Handlebars;
use std::sync::Arc;

use crate::{
    app_config::AppConfig,
    services::{scanner::ScanOrchestrator, BlacklistLookup, SafeBrowsingClient},
    utils::scan_errors::DomainListError,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub scanner: Arc<ScanOrchestrator>,
    pub templates: Arc<Handlebars<'static>>,
    pub blacklist_configured: bool,
}

impl AppState {
    /// Build state with the Safe Browsing client from `config`
    pub fn from_config(config: AppConfig) -> Result<Self, AppStateError> {
        let client = SafeBrowsingClient::new(config.safe_browsing.clone());
        let blacklist_configured = client.is_configured();
        Self::with_blacklist(config, Arc::new(client), blacklist_configured)
    }

    pub fn with_blacklist(
        config: AppConfig,
        blacklist: Arc<dyn BlacklistLookup>,
        blacklist_configured: bool,
    ) -> Result<Self, AppStateError> {
        let scanner = ScanOrchestrator::with_blacklist(&config.scanner, blacklist)?;

        let mut templates = Handlebars::new();
        templates
            .register_template_string("index", include_str!("../templates/index.html"))
            .map_err(|e| AppStateError::Template(e.to_string()))?;

        Ok(Self {
            config: Arc::new(config),
            scanner: Arc::new(scanner),
            templates: Arc::new(templates),
            blacklist_configured,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppStateError {
    #[error(transparent)]
    DomainList(#[from] DomainListError),

    #[error("Template registration failed: {0}")]
    Template(String),
}
