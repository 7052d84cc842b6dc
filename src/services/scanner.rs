// Scan orchestration
// validate -> decompose -> {heuristics || blacklist} -> aggregate -> classify

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::app_config::{SafeBrowsingConfig, ScannerConfig};
use crate::config::heuristics::HeuristicConfig;
use crate::models::scan::{ScanOutcome, ScanReport, ScanResult};
use crate::services::heuristics::{HeuristicRuleSet, RuleInput};
use crate::services::safe_browsing::{BlacklistLookup, SafeBrowsingClient};
use crate::services::scoring::{classify_risk, ScoreAggregator};
use crate::utils::domain_parts::DomainDecomposer;
use crate::utils::scan_errors::{DomainListError, ScanError};
use crate::utils::url_validator::UrlValidator;

/// Anything that turns a URL into a scan report: the in-process orchestrator
/// or a remote scan endpoint
#[async_trait]
pub trait Scanner: Send + Sync {
    async fn scan(&self, url: &str) -> Result<ScanReport, ScanError>;
}

pub struct ScanOrchestrator {
    validator: UrlValidator,
    decomposer: DomainDecomposer,
    rules: HeuristicRuleSet,
    aggregator: ScoreAggregator,
    blacklist: Arc<dyn BlacklistLookup>,
}

impl ScanOrchestrator {
    pub fn new(
        validator: UrlValidator,
        decomposer: DomainDecomposer,
        heuristics: HeuristicConfig,
        blacklist: Arc<dyn BlacklistLookup>,
    ) -> Self {
        let aggregator = ScoreAggregator::new(heuristics.weights.clone());
        Self {
            validator,
            decomposer,
            rules: HeuristicRuleSet::new(heuristics),
            aggregator,
            blacklist,
        }
    }

    /// Wire the orchestrator with the Safe Browsing client
    pub fn from_config(
        scanner: &ScannerConfig,
        safe_browsing: &SafeBrowsingConfig,
    ) -> Result<Self, DomainListError> {
        let blacklist = Arc::new(SafeBrowsingClient::new(safe_browsing.clone()));
        Self::with_blacklist(scanner, blacklist)
    }

    pub fn with_blacklist(
        scanner: &ScannerConfig,
        blacklist: Arc<dyn BlacklistLookup>,
    ) -> Result<Self, DomainListError> {
        let decomposer = DomainDecomposer::bundled(scanner.include_private_suffixes)?;
        let heuristics = HeuristicConfig::load_or_default(scanner.heuristics_path.as_deref());

        Ok(Self::new(
            UrlValidator::new(scanner.max_url_length),
            decomposer,
            heuristics,
            blacklist,
        ))
    }

    /// One atomic scan. Invalid input is rejected before any other stage runs.
    #[instrument(skip(self))]
    pub async fn scan_url(&self, input: &str) -> ScanOutcome {
        let candidate = self.validator.validate(input);

        let Some(url) = candidate.url() else {
            let error = candidate
                .error()
                .map(|e| e.to_string())
                .unwrap_or_else(|| "Invalid URL format".to_string());
            debug!("Rejected scan input: {}", error);
            return ScanOutcome::Rejected { error };
        };

        let domain = self.decomposer.decompose_as_typed(candidate.raw(), url);
        let rule_input = RuleInput {
            url_text: candidate.raw(),
            url,
            domain: &domain,
        };

        // Independent stages; both must finish before aggregation
        let (verdict, findings) = tokio::join!(
            self.blacklist.lookup(candidate.raw()),
            async { self.rules.evaluate(&rule_input) },
        );

        let score = self.aggregator.aggregate(&findings, &verdict);
        let risk_level = classify_risk(score.phishing_score);

        info!(
            "Scanned {} -> {} (score {}, {} findings, blacklist match: {})",
            candidate.raw(),
            risk_level,
            score.phishing_score,
            findings.len(),
            verdict.is_match()
        );

        ScanOutcome::Completed(ScanResult {
            url: candidate.raw().to_string(),
            is_valid: true,
            scan_time: Utc::now(),
            findings,
            blacklist_verdict: verdict,
            heuristic_score: score.heuristic_score,
            phishing_score: score.phishing_score,
            risk_level,
        })
    }
}

#[async_trait]
impl Scanner for ScanOrchestrator {
    async fn scan(&self, url: &str) -> Result<ScanReport, ScanError> {
        Ok(self.scan_url(url).await.into())
    }
}
