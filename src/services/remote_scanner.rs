// Scanner backed by a running scan service (POST /scan)

use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

use crate::app_config::WatcherConfig;
use crate::models::scan::ScanReport;
use crate::services::scanner::Scanner;
use crate::utils::scan_errors::ScanError;

pub struct RemoteScanner {
    http_client: reqwest::Client,
    api_url: String,
}

impl RemoteScanner {
    pub fn new(api_url: impl Into<String>, timeout: Duration) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("phish-scanner-watcher/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_default();

        Self {
            http_client,
            api_url: api_url.into(),
        }
    }

    pub fn from_config(config: &WatcherConfig) -> Self {
        Self::new(
            config.scan_api_url.clone(),
            Duration::from_millis(config.scan_timeout_ms),
        )
    }
}

#[async_trait]
impl Scanner for RemoteScanner {
    async fn scan(&self, url: &str) -> Result<ScanReport, ScanError> {
        debug!("Submitting {} to {}", url, self.api_url);

        let response = self
            .http_client
            .post(&self.api_url)
            .json(&json!({ "url": url }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScanError::DependencyUnavailable(format!(
                "Scan service returned HTTP {}",
                status.as_u16()
            )));
        }

        Ok(response.json::<ScanReport>().await?)
    }
}
