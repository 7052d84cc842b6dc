// Score aggregation and risk classification
// Pure functions of (findings, verdict): no clock, no I/O, no randomness

use serde::{Deserialize, Serialize};

use crate::config::heuristics::ScoreWeights;
use crate::models::scan::{BlacklistVerdict, Finding, RiskLevel};

pub const MAX_PHISHING_SCORE: u8 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    /// Number of findings; diagnostic only
    pub heuristic_score: u32,
    /// Weighted sum clamped to 0..=100
    pub phishing_score: u8,
}

pub struct ScoreAggregator {
    weights: ScoreWeights,
}

impl ScoreAggregator {
    pub fn new(weights: ScoreWeights) -> Self {
        Self { weights }
    }

    pub fn aggregate(&self, findings: &[Finding], verdict: &BlacklistVerdict) -> Score {
        let heuristic_total = findings.iter().fold(0u32, |acc, finding| {
            acc.saturating_add(self.weights.for_category(finding.category))
        });

        let blacklist_points = if verdict.is_match() {
            self.weights.blacklist_match
        } else {
            0
        };

        let total = heuristic_total.saturating_add(blacklist_points);

        Score {
            heuristic_score: findings.len() as u32,
            phishing_score: total.min(MAX_PHISHING_SCORE as u32) as u8,
        }
    }
}

impl Default for ScoreAggregator {
    fn default() -> Self {
        Self::new(ScoreWeights::default())
    }
}

pub fn classify_risk(phishing_score: u8) -> RiskLevel {
    RiskLevel::from_score(phishing_score)
}
