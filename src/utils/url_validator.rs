// URL validation
// A candidate is valid only when it parses as an absolute URL with a scheme, a "//" authority and a host

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Default upper bound on candidate length, before any regex work runs
pub const DEFAULT_MAX_URL_LENGTH: usize = 2048;

// =============================================================================
// ERROR TYPES
// =============================================================================

#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationError {
    #[error("Invalid URL format")]
    Empty,

    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Invalid URL format: missing host")]
    MissingHost,

    #[error("Invalid URL format: missing network location")]
    MissingAuthority,

    #[error("URL too long (max {max}, current {current})")]
    TooLong { max: usize, current: usize },
}

// =============================================================================
// CANDIDATE URL
// =============================================================================

/// Raw input plus the validation verdict. Immutable once produced.
#[derive(Debug, Clone)]
pub struct CandidateUrl {
    raw: String,
    parsed: Result<Url, ValidationError>,
}

impl CandidateUrl {
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn is_valid(&self) -> bool {
        self.parsed.is_ok()
    }

    /// Parsed URL, present only for valid candidates
    pub fn url(&self) -> Option<&Url> {
        self.parsed.as_ref().ok()
    }

    pub fn error(&self) -> Option<&ValidationError> {
        self.parsed.as_ref().err()
    }
}

// =============================================================================
// URL VALIDATOR
// =============================================================================

#[derive(Debug, Clone)]
pub struct UrlValidator {
    max_length: usize,
}

impl Default for UrlValidator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_URL_LENGTH)
    }
}

impl UrlValidator {
    pub fn new(max_length: usize) -> Self {
        Self { max_length }
    }

    /// Validate without touching the network or filesystem
    pub fn validate(&self, input: &str) -> CandidateUrl {
        let raw = input.trim().to_string();
        let parsed = self.parse(&raw);
        CandidateUrl { raw, parsed }
    }

    pub fn is_valid(&self, input: &str) -> bool {
        self.validate(input).is_valid()
    }

    fn parse(&self, raw: &str) -> Result<Url, ValidationError> {
        if raw.is_empty() {
            return Err(ValidationError::Empty);
        }

        if raw.len() > self.max_length {
            return Err(ValidationError::TooLong {
                max: self.max_length,
                current: raw.len(),
            });
        }

        let url = Url::parse(raw).map_err(|e| ValidationError::InvalidFormat(e.to_string()))?;

        match url.host_str() {
            Some(host) if !host.is_empty() => {},
            _ => return Err(ValidationError::MissingHost),
        }

        // The url crate repairs "http:host" and "http:\\host"; the typed text must carry "//"
        let has_authority = raw
            .get(url.scheme().len() + 1..)
            .is_some_and(|rest| rest.starts_with("//"));
        if !has_authority {
            return Err(ValidationError::MissingAuthority);
        }

        Ok(url)
    }
}
