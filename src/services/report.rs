// Console reporting for watcher-triggered scans

use std::fmt::Write;

use crate::models::scan::ScanReport;
use crate::services::watcher::ReportSink;
use crate::utils::scan_errors::ScanError;

/// Human-readable summary: risk level, score and the ordered risk factors
pub fn render_summary(report: &ScanReport) -> String {
    let mut out = String::new();

    match report {
        ScanReport::Completed(record) => {
            let _ = writeln!(out, "Scan Results:");
            let _ = writeln!(out, "Risk Level: {}", record.risk_level);
            let _ = writeln!(out, "Phishing Score: {}/100", record.phishing_score);
            if !record.reasons.is_empty() {
                let _ = writeln!(out, "Risk Factors:");
                for reason in &record.reasons {
                    let _ = writeln!(out, "- {}", reason);
                }
            }
        },
        ScanReport::Rejected(rejection) => {
            let _ = writeln!(out, "Invalid URL or scanning error: {}", rejection.error);
        },
    }

    out
}

/// Prints summaries to stdout for the interactive watcher
#[derive(Debug, Default)]
pub struct ConsoleReporter;

impl ReportSink for ConsoleReporter {
    fn report(&self, url: &str, report: &ScanReport) {
        println!("\nURL detected: {}\n{}", url, render_summary(report));
    }

    fn report_error(&self, url: &str, error: &ScanError) {
        println!("\nURL detected: {}\nInvalid URL or scanning error: {}\n", url, error);
    }
}
