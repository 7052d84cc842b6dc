// Scan data model
// Findings, blacklist verdicts, risk tiers and the records handed back to callers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// FINDINGS
// =============================================================================

/// Closed set of heuristic categories. Each category maps to one weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingCategory {
    NoHttps,
    SuspiciousTld,
    IpAddress,
    PhishingKeyword,
    LongSubdomain,
    SpecialChars,
}

impl FindingCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            FindingCategory::NoHttps => "no_https",
            FindingCategory::SuspiciousTld => "suspicious_tld",
            FindingCategory::IpAddress => "ip_address",
            FindingCategory::PhishingKeyword => "phishing_keyword",
            FindingCategory::LongSubdomain => "long_subdomain",
            FindingCategory::SpecialChars => "special_chars",
        }
    }
}

impl fmt::Display for FindingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One triggered heuristic rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub category: FindingCategory,
    pub description: String,
}

impl Finding {
    pub fn new(category: FindingCategory, description: impl Into<String>) -> Self {
        Self {
            category,
            description: description.into(),
        }
    }
}

// =============================================================================
// BLACKLIST VERDICT
// =============================================================================

/// Outcome of the external reputation lookup.
///
/// `Unknown` covers every degraded path (no credentials, transport failure,
/// non-success status, timeout) and never counts as a match.
#[derive(Debug, Clone, PartialEq)]
pub enum BlacklistVerdict {
    /// Listed; carries the raw match payload returned by the service
    Match(serde_json::Value),
    NoMatch,
    Unknown(String),
}

impl BlacklistVerdict {
    pub fn is_match(&self) -> bool {
        matches!(self, BlacklistVerdict::Match(_))
    }

    /// Diagnostic payload exposed as `blacklist_data`
    pub fn diagnostic(&self) -> Option<serde_json::Value> {
        match self {
            BlacklistVerdict::Match(payload) => Some(payload.clone()),
            BlacklistVerdict::NoMatch => None,
            BlacklistVerdict::Unknown(reason) => Some(serde_json::Value::String(reason.clone())),
        }
    }
}

// =============================================================================
// RISK LEVEL
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Safe,       // 0-30
    Suspicious, // 31-60
    Phishing,   // 61-100
}

impl RiskLevel {
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=30 => RiskLevel::Safe,
            31..=60 => RiskLevel::Suspicious,
            _ => RiskLevel::Phishing,
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Safe => write!(f, "Safe"),
            RiskLevel::Suspicious => write!(f, "Suspicious"),
            RiskLevel::Phishing => write!(f, "Phishing"),
        }
    }
}

// =============================================================================
// SCAN RESULT
// =============================================================================

/// Fully populated result of a completed scan. Never mutated after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanResult {
    pub url: String,
    pub is_valid: bool,
    pub scan_time: DateTime<Utc>,
    pub findings: Vec<Finding>,
    pub blacklist_verdict: BlacklistVerdict,
    pub heuristic_score: u32,
    pub phishing_score: u8,
    pub risk_level: RiskLevel,
}

impl ScanResult {
    pub fn reasons(&self) -> Vec<String> {
        self.findings.iter().map(|f| f.description.clone()).collect()
    }
}

/// Two-outcome scan state machine
#[derive(Debug, Clone, PartialEq)]
pub enum ScanOutcome {
    /// URL validation failed; no further stage ran
    Rejected { error: String },
    Completed(ScanResult),
}

impl ScanOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, ScanOutcome::Completed(_))
    }
}

// =============================================================================
// WIRE RECORDS
// =============================================================================

/// Request body for `POST /scan`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanRequest {
    #[serde(default)]
    pub url: String,
}

/// Flat record for a completed scan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanRecord {
    pub is_valid: bool,
    pub url: String,
    pub scan_time: DateTime<Utc>,
    pub risk_level: RiskLevel,
    pub phishing_score: u8,
    pub heuristic_score: u32,
    pub blacklist_match: bool,
    pub reasons: Vec<String>,
    pub blacklist_data: Option<serde_json::Value>,
}

/// Flat record for a rejected scan: `{is_valid: false, error}` only
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanRejection {
    pub is_valid: bool,
    pub error: String,
}

/// What callers of the scan entry point receive, local or remote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScanReport {
    Completed(ScanRecord),
    Rejected(ScanRejection),
}

impl ScanReport {
    pub fn is_valid(&self) -> bool {
        match self {
            ScanReport::Completed(record) => record.is_valid,
            ScanReport::Rejected(_) => false,
        }
    }
}

impl From<ScanResult> for ScanRecord {
    fn from(result: ScanResult) -> Self {
        let reasons = result.reasons();
        Self {
            is_valid: result.is_valid,
            blacklist_match: result.blacklist_verdict.is_match(),
            blacklist_data: result.blacklist_verdict.diagnostic(),
            url: result.url,
            scan_time: result.scan_time,
            risk_level: result.risk_level,
            phishing_score: result.phishing_score,
            heuristic_score: result.heuristic_score,
            reasons,
        }
    }
}

impl From<ScanOutcome> for ScanReport {
    fn from(outcome: ScanOutcome) -> Self {
        match outcome {
            ScanOutcome::Completed(result) => ScanReport::Completed(result.into()),
            ScanOutcome::Rejected { error } => ScanReport::Rejected(ScanRejection {
                is_valid: false,
                error,
            }),
        }
    }
}
