// Blacklist client backed by the Google Safe Browsing v4 Lookup API
// Every failure path degrades to BlacklistVerdict::Unknown, never to a match

use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

use crate::app_config::SafeBrowsingConfig;
use crate::models::scan::BlacklistVerdict;
use crate::utils::scan_errors::ScanError;

const THREAT_TYPES: [&str; 4] = [
    "MALWARE",
    "SOCIAL_ENGINEERING",
    "UNWANTED_SOFTWARE",
    "POTENTIALLY_HARMFUL_APPLICATION",
];
const PLATFORM_TYPES: [&str; 1] = ["ANY_PLATFORM"];
const THREAT_ENTRY_TYPES: [&str; 1] = ["URL"];

/// External reputation lookup for one exact URL
#[async_trait]
pub trait BlacklistLookup: Send + Sync {
    async fn lookup(&self, url: &str) -> BlacklistVerdict;
}

// =============================================================================
// REQUEST PAYLOAD
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ThreatMatchRequest<'a> {
    client: ClientInfo<'a>,
    threat_info: ThreatInfo<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ClientInfo<'a> {
    client_id: &'a str,
    client_version: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ThreatInfo<'a> {
    threat_types: &'static [&'static str],
    platform_types: &'static [&'static str],
    threat_entry_types: &'static [&'static str],
    threat_entries: Vec<ThreatEntry<'a>>,
}

#[derive(Debug, Serialize)]
struct ThreatEntry<'a> {
    url: &'a str,
}

// =============================================================================
// SAFE BROWSING CLIENT
// =============================================================================

pub struct SafeBrowsingClient {
    http_client: reqwest::Client,
    config: SafeBrowsingConfig,
}

impl SafeBrowsingClient {
    pub fn new(config: SafeBrowsingConfig) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(format!("{}/{}", config.client_id, config.client_version))
            .build()
            .unwrap_or_default();

        Self {
            http_client,
            config,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.config
            .api_key
            .as_deref()
            .is_some_and(|key| !key.trim().is_empty())
    }

    async fn query(&self, api_key: &str, url: &str) -> Result<BlacklistVerdict, ScanError> {
        let payload = ThreatMatchRequest {
            client: ClientInfo {
                client_id: &self.config.client_id,
                client_version: &self.config.client_version,
            },
            threat_info: ThreatInfo {
                threat_types: &THREAT_TYPES,
                platform_types: &PLATFORM_TYPES,
                threat_entry_types: &THREAT_ENTRY_TYPES,
                threat_entries: vec![ThreatEntry { url }],
            },
        };

        let response = self
            .http_client
            .post(&self.config.api_url)
            .query(&[("key", api_key)])
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScanError::DependencyUnavailable(format!(
                "Safe Browsing returned HTTP {}",
                status.as_u16()
            )));
        }

        let body = response.text().await?;
        parse_verdict(&body)
    }
}

/// `{}` or an empty `matches` array means not listed
fn parse_verdict(body: &str) -> Result<BlacklistVerdict, ScanError> {
    if body.trim().is_empty() {
        return Ok(BlacklistVerdict::NoMatch);
    }

    let payload: serde_json::Value = serde_json::from_str(body).map_err(|e| {
        ScanError::DependencyUnavailable(format!("Unreadable Safe Browsing response: {}", e))
    })?;

    let has_matches = payload
        .get("matches")
        .and_then(|m| m.as_array())
        .is_some_and(|m| !m.is_empty());

    if has_matches {
        Ok(BlacklistVerdict::Match(payload))
    } else {
        Ok(BlacklistVerdict::NoMatch)
    }
}

#[async_trait]
impl BlacklistLookup for SafeBrowsingClient {
    async fn lookup(&self, url: &str) -> BlacklistVerdict {
        let api_key = match self.config.api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => key,
            _ => return BlacklistVerdict::Unknown("API key not configured".to_string()),
        };

        // reqwest enforces the same bound; this also covers slow body reads
        match tokio::time::timeout(
            Duration::from_millis(self.config.timeout_ms),
            self.query(api_key, url),
        )
        .await
        {
            Ok(Ok(verdict)) => {
                debug!("Safe Browsing verdict for {}: match={}", url, verdict.is_match());
                verdict
            },
            Ok(Err(e)) => {
                warn!("Safe Browsing lookup failed: {}", e);
                BlacklistVerdict::Unknown(e.to_string())
            },
            Err(_) => {
                warn!("Safe Browsing lookup timed out after {} ms", self.config.timeout_ms);
                BlacklistVerdict::Unknown("Blacklist lookup timed out".to_string())
            },
        }
    }
}
