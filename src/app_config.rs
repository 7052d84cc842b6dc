// Centralized configuration management for the phishing scanner
// Load ALL env vars ONCE at startup, then pass the result down explicitly

use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

use crate::utils::url_validator::DEFAULT_MAX_URL_LENGTH;

/// Default tracing filter when RUST_LOG is unset
pub const DEFAULT_LOG_FILTER: &str = "phish_scanner=debug,tower_http=info";

pub const DEFAULT_SAFE_BROWSING_URL: &str =
    "https://safebrowsing.googleapis.com/v4/threatMatches:find";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub safe_browsing: SafeBrowsingConfig,
    pub scanner: ScannerConfig,
    pub watcher: WatcherConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind_address: String,
    pub environment: Environment,
    /// Tracing filter directives handed to `init_tracing`
    pub log_filter: String,
    pub cors_allowed_origins: Vec<String>,
}

/// Environment type
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Environment {
    Development,
    Test,
    Staging,
    Production,
}

impl From<String> for Environment {
    fn from(s: String) -> Self {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Environment::Development,
            "test" => Environment::Test,
            "staging" | "stage" => Environment::Staging,
            "production" | "prod" => Environment::Production,
            _ => Environment::Development,
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Staging => write!(f, "staging"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Blacklist service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SafeBrowsingConfig {
    /// Unset means every lookup degrades to Unknown
    pub api_key: Option<String>,
    pub api_url: String,
    pub client_id: String,
    pub client_version: String,
    pub timeout_ms: u64,
}

impl Default for SafeBrowsingConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: DEFAULT_SAFE_BROWSING_URL.to_string(),
            client_id: "urlscanner".to_string(),
            client_version: "1.0.0".to_string(),
            timeout_ms: 3000,
        }
    }
}

/// Scoring engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScannerConfig {
    pub heuristics_path: Option<String>,
    pub include_private_suffixes: bool,
    pub max_url_length: usize,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            heuristics_path: None,
            include_private_suffixes: false,
            max_url_length: DEFAULT_MAX_URL_LENGTH,
        }
    }
}

/// Where the watcher sends URLs for scoring
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum ScanMode {
    /// In-process orchestrator
    Local,
    /// POST to a running scan endpoint
    Remote,
}

impl std::str::FromStr for ScanMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" => Ok(ScanMode::Local),
            "remote" => Ok(ScanMode::Remote),
            other => Err(ConfigError::InvalidValue(
                "WATCHER_SCAN_MODE".to_string(),
                format!("expected 'local' or 'remote', got '{}'", other),
            )),
        }
    }
}

/// Clipboard watcher configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatcherConfig {
    pub poll_interval_ms: u64,
    pub scan_mode: ScanMode,
    pub scan_api_url: String,
    pub scan_timeout_ms: u64,
    pub clipboard_command: String,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 1000,
            scan_mode: ScanMode::Local,
            scan_api_url: "http://localhost:5000/scan".to_string(),
            scan_timeout_ms: 10_000,
            clipboard_command: default_clipboard_command().to_string(),
        }
    }
}

/// Platform clipboard reader used when none is configured
pub fn default_clipboard_command() -> &'static str {
    if cfg!(target_os = "macos") {
        "pbpaste"
    } else if cfg!(target_os = "windows") {
        "powershell -NoProfile -Command Get-Clipboard"
    } else {
        "xclip -selection clipboard -o"
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Helper function to get optional env var with default
        let get_or_default = |key: &str, default: &str| -> String {
            env::var(key).unwrap_or_else(|_| default.to_string())
        };

        // Helper function to get an env var that may be unset or blank
        let get_optional = |key: &str| -> Option<String> {
            env::var(key).ok().filter(|v| !v.trim().is_empty())
        };

        let parse_u64_or_default = |key: &str, default: &str| -> Result<u64, ConfigError> {
            get_or_default(key, default).trim().parse().map_err(|_| {
                ConfigError::InvalidValue(key.to_string(), "not a valid u64".to_string())
            })
        };

        let parse_bool_or_default = |key: &str, default: &str| -> bool {
            get_or_default(key, default).to_lowercase() == "true"
        };

        let bind_address = get_or_default("BIND_ADDRESS", "0.0.0.0:5000");
        let environment = Environment::from(get_or_default("ENVIRONMENT", "development"));
        let log_filter = get_or_default("RUST_LOG", DEFAULT_LOG_FILTER);
        let cors_allowed_origins: Vec<String> = get_or_default("CORS_ALLOWED_ORIGINS", "*")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let server = ServerConfig {
            bind_address,
            environment,
            log_filter,
            cors_allowed_origins,
        };

        let safe_browsing = SafeBrowsingConfig {
            api_key: get_optional("GOOGLE_SAFE_BROWSING_API_KEY"),
            api_url: get_or_default("SAFE_BROWSING_API_URL", DEFAULT_SAFE_BROWSING_URL),
            client_id: get_or_default("SAFE_BROWSING_CLIENT_ID", "urlscanner"),
            client_version: get_or_default("SAFE_BROWSING_CLIENT_VERSION", "1.0.0"),
            timeout_ms: parse_u64_or_default("SAFE_BROWSING_TIMEOUT_MS", "3000")?,
        };

        let max_url_length = parse_u64_or_default("MAX_URL_LENGTH", "2048")? as usize;
        if max_url_length == 0 {
            return Err(ConfigError::InvalidValue(
                "MAX_URL_LENGTH".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        let scanner = ScannerConfig {
            heuristics_path: get_optional("HEURISTICS_CONFIG_PATH"),
            include_private_suffixes: parse_bool_or_default("PSL_INCLUDE_PRIVATE", "false"),
            max_url_length,
        };

        let poll_interval_ms = parse_u64_or_default("WATCHER_POLL_INTERVAL_MS", "1000")?;
        if poll_interval_ms == 0 {
            return Err(ConfigError::InvalidValue(
                "WATCHER_POLL_INTERVAL_MS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        let watcher = WatcherConfig {
            poll_interval_ms,
            scan_mode: get_or_default("WATCHER_SCAN_MODE", "local").parse()?,
            scan_api_url: get_or_default("WATCHER_SCAN_API_URL", "http://localhost:5000/scan"),
            scan_timeout_ms: parse_u64_or_default("WATCHER_SCAN_TIMEOUT_MS", "10000")?,
            clipboard_command: get_optional("WATCHER_CLIPBOARD_COMMAND")
                .unwrap_or_else(|| default_clipboard_command().to_string()),
        };

        Ok(Self {
            server,
            safe_browsing,
            scanner,
            watcher,
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                bind_address: "0.0.0.0:5000".to_string(),
                environment: Environment::Development,
                log_filter: DEFAULT_LOG_FILTER.to_string(),
                cors_allowed_origins: vec!["*".to_string()],
            },
            safe_browsing: SafeBrowsingConfig::default(),
            scanner: ScannerConfig::default(),
            watcher: WatcherConfig::default(),
        }
    }
}
