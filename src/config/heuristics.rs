// Heuristic configuration: keyword lists, suspicious suffixes and score weights
// Loaded once at startup and passed into the rule set and the aggregator

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

use crate::models::scan::FindingCategory;

#[derive(Error, Debug)]
pub enum HeuristicConfigError {
    #[error("Failed to read heuristics file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid heuristics file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Point contribution of each finding category plus the blacklist hit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub no_https: u32,
    pub suspicious_tld: u32,
    pub ip_address: u32,
    /// Applied once per matched keyword
    pub phishing_keyword: u32,
    pub long_subdomain: u32,
    pub special_chars: u32,
    pub blacklist_match: u32,
}

impl ScoreWeights {
    pub fn for_category(&self, category: FindingCategory) -> u32 {
        match category {
            FindingCategory::NoHttps => self.no_https,
            FindingCategory::SuspiciousTld => self.suspicious_tld,
            FindingCategory::IpAddress => self.ip_address,
            FindingCategory::PhishingKeyword => self.phishing_keyword,
            FindingCategory::LongSubdomain => self.long_subdomain,
            FindingCategory::SpecialChars => self.special_chars,
        }
    }
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            no_https: 20,
            suspicious_tld: 25,
            ip_address: 30,
            phishing_keyword: 15,
            long_subdomain: 10,
            special_chars: 15,
            blacklist_match: 40,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeuristicConfig {
    /// Matched as lowercase substrings of the whole URL
    pub suspicious_tlds: Vec<String>,
    /// Matched as lowercase substrings of the registrable domain
    pub phishing_keywords: Vec<String>,
    /// Subdomains strictly longer than this many characters are flagged
    pub long_subdomain_threshold: usize,
    #[serde(default)]
    pub weights: ScoreWeights,
}

impl Default for HeuristicConfig {
    fn default() -> Self {
        let suspicious_tlds = [".xyz", ".tk", ".pw", ".cc", ".top", ".work", ".site"];
        let phishing_keywords = [
            "login", "signin", "account", "verify", "security", "bank", "paypal", "amazon",
            "ebay", "password", "confirm", "update", "secure", "alert",
        ];

        Self {
            suspicious_tlds: suspicious_tlds.iter().map(|s| s.to_string()).collect(),
            phishing_keywords: phishing_keywords.iter().map(|s| s.to_string()).collect(),
            long_subdomain_threshold: 20,
            weights: ScoreWeights::default(),
        }
    }
}

impl HeuristicConfig {
    /// Parse a heuristics JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, HeuristicConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| HeuristicConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let mut config: HeuristicConfig =
            serde_json::from_str(&content).map_err(|source| HeuristicConfigError::Parse {
                path: path.display().to_string(),
                source,
            })?;
        config.normalize();
        Ok(config)
    }

    /// Load from an optional path, falling back to the built-in lists
    pub fn load_or_default(path: Option<&str>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };

        match Self::from_file(path) {
            Ok(config) => {
                info!(
                    "Loaded {} keywords and {} suspicious TLDs from {}",
                    config.phishing_keywords.len(),
                    config.suspicious_tlds.len(),
                    path
                );
                config
            },
            Err(e) => {
                warn!("{}, using built-in heuristics", e);
                Self::default()
            },
        }
    }

    // Rules compare against lowercased text
    fn normalize(&mut self) {
        for tld in &mut self.suspicious_tlds {
            *tld = tld.trim().to_lowercase();
        }
        for keyword in &mut self.phishing_keywords {
            *keyword = keyword.trim().to_lowercase();
        }
        self.suspicious_tlds.retain(|s| !s.is_empty());
        self.phishing_keywords.retain(|s| !s.is_empty());
    }
}
