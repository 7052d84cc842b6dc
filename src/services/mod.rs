// Services module for the phishing scanner
// Scoring pipeline stages plus the clipboard watcher

pub mod heuristics;
pub mod remote_scanner;
pub mod report;
pub mod safe_browsing;
pub mod scanner;
pub mod scoring;
pub mod text_source;
pub mod watcher;

// Re-export commonly used services
pub use heuristics::{HeuristicRuleSet, RuleInput};
pub use remote_scanner::RemoteScanner;
pub use report::{render_summary, ConsoleReporter};
pub use safe_browsing::{BlacklistLookup, SafeBrowsingClient};
pub use scanner::{ScanOrchestrator, Scanner};
pub use scoring::{classify_risk, Score, ScoreAggregator, MAX_PHISHING_SCORE};
pub use text_source::CommandTextSource;
pub use watcher::{ReportSink, RunningWatcher, TextSource, UrlWatcher, WatcherStats};
