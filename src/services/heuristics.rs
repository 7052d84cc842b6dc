// Heuristic rule set
// Independent lexical/structural predicates over a URL and its domain parts

use lazy_static::lazy_static;
use regex::Regex;
use url::Url;

use crate::config::heuristics::HeuristicConfig;
use crate::models::scan::{Finding, FindingCategory};
use crate::utils::domain_parts::DomainParts;

lazy_static! {
    /// Dotted quad anywhere in the URL text
    static ref IPV4_PATTERN: Regex =
        Regex::new(r"\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}").expect("Invalid IPv4 pattern regex");

    /// Anything a plain LDH hostname would not contain
    static ref SPECIAL_CHAR_PATTERN: Regex =
        Regex::new(r"[^A-Za-z0-9.\-]").expect("Invalid special character regex");
}

/// Everything a rule may look at. Borrowed, never mutated.
#[derive(Debug, Clone, Copy)]
pub struct RuleInput<'a> {
    pub url_text: &'a str,
    pub url: &'a Url,
    pub domain: &'a DomainParts,
}

pub struct HeuristicRuleSet {
    config: HeuristicConfig,
}

impl HeuristicRuleSet {
    pub fn new(config: HeuristicConfig) -> Self {
        Self { config }
    }

    /// Run every rule in fixed order. Order only affects reporting, not scoring.
    pub fn evaluate(&self, input: &RuleInput<'_>) -> Vec<Finding> {
        let mut findings = Vec::new();

        findings.extend(self.check_https(input));
        findings.extend(self.check_suspicious_tld(input));
        findings.extend(self.check_ip_address(input));
        findings.extend(self.check_phishing_keywords(input));
        findings.extend(self.check_long_subdomain(input));
        findings.extend(self.check_special_chars(input));

        findings
    }

    fn check_https(&self, input: &RuleInput<'_>) -> Option<Finding> {
        (input.url.scheme() != "https")
            .then(|| Finding::new(FindingCategory::NoHttps, "URL doesn't use HTTPS"))
    }

    fn check_suspicious_tld(&self, input: &RuleInput<'_>) -> Option<Finding> {
        let url_lower = input.url_text.to_lowercase();
        self.config
            .suspicious_tlds
            .iter()
            .any(|tld| url_lower.contains(tld.as_str()))
            .then(|| Finding::new(FindingCategory::SuspiciousTld, "Suspicious TLD detected"))
    }

    fn check_ip_address(&self, input: &RuleInput<'_>) -> Option<Finding> {
        IPV4_PATTERN.is_match(input.url_text).then(|| {
            Finding::new(
                FindingCategory::IpAddress,
                "URL contains IP address instead of domain",
            )
        })
    }

    // One finding per matched keyword
    fn check_phishing_keywords(&self, input: &RuleInput<'_>) -> Vec<Finding> {
        let domain_lower = input.domain.registrable_domain.to_lowercase();
        self.config
            .phishing_keywords
            .iter()
            .filter(|keyword| domain_lower.contains(keyword.as_str()))
            .map(|keyword| {
                Finding::new(
                    FindingCategory::PhishingKeyword,
                    format!("Suspicious keyword '{}' found in domain", keyword),
                )
            })
            .collect()
    }

    fn check_long_subdomain(&self, input: &RuleInput<'_>) -> Option<Finding> {
        (input.domain.subdomain.chars().count() > self.config.long_subdomain_threshold).then(
            || Finding::new(FindingCategory::LongSubdomain, "Suspiciously long subdomain"),
        )
    }

    fn check_special_chars(&self, input: &RuleInput<'_>) -> Option<Finding> {
        SPECIAL_CHAR_PATTERN
            .is_match(&input.domain.domain_text())
            .then(|| {
                Finding::new(
                    FindingCategory::SpecialChars,
                    "Domain contains special characters",
                )
            })
    }
}

impl Default for HeuristicRuleSet {
    fn default() -> Self {
        Self::new(HeuristicConfig::default())
    }
}
