// Watcher loop behaviour under paused tokio time

mod common;

use async_trait::async_trait;
use chrono::Utc;
use common::{test_scanner, StaticBlacklist};
use phish_scanner::{
    models::scan::ScanRecord,
    utils::UrlValidator,
    BlacklistVerdict, ReportSink, RiskLevel, ScanError, ScanReport, Scanner, TextSource,
    UrlWatcher, WatcherError,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

const POLL: Duration = Duration::from_millis(100);

// =============================================================================
// TEST DOUBLES
// =============================================================================

/// Replays a script of reads, then repeats the last entry forever
struct ScriptedSource {
    script: Vec<Result<String, String>>,
    reads: AtomicUsize,
}

impl ScriptedSource {
    fn new(script: Vec<Result<&str, &str>>) -> Arc<Self> {
        Arc::new(Self {
            script: script
                .into_iter()
                .map(|r| r.map(str::to_string).map_err(str::to_string))
                .collect(),
            reads: AtomicUsize::new(0),
        })
    }

    fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextSource for ScriptedSource {
    async fn read_text(&self) -> Result<String, WatcherError> {
        let n = self.reads.fetch_add(1, Ordering::SeqCst);
        let entry = &self.script[n.min(self.script.len() - 1)];
        entry.clone().map_err(WatcherError::SourceRead)
    }
}

/// Every read returns a URL never seen before
struct ChangingSource {
    reads: AtomicUsize,
}

#[async_trait]
impl TextSource for ChangingSource {
    async fn read_text(&self) -> Result<String, WatcherError> {
        let n = self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(format!("https://example{}.com", n))
    }
}

#[derive(Default)]
struct CountingScanner {
    scanned: Mutex<Vec<String>>,
    delay: Option<Duration>,
}

impl CountingScanner {
    fn scanned(&self) -> Vec<String> {
        self.scanned.lock().unwrap().clone()
    }
}

#[async_trait]
impl Scanner for CountingScanner {
    async fn scan(&self, url: &str) -> Result<ScanReport, ScanError> {
        self.scanned.lock().unwrap().push(url.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        Ok(ScanReport::Completed(ScanRecord {
            is_valid: true,
            url: url.to_string(),
            scan_time: Utc::now(),
            risk_level: RiskLevel::Safe,
            phishing_score: 0,
            heuristic_score: 0,
            blacklist_match: false,
            reasons: Vec::new(),
            blacklist_data: None,
        }))
    }
}

#[derive(Default)]
struct RecordingSink {
    reports: Mutex<Vec<(String, ScanReport)>>,
    errors: Mutex<Vec<(String, String)>>,
}

impl ReportSink for RecordingSink {
    fn report(&self, url: &str, report: &ScanReport) {
        self.reports
            .lock()
            .unwrap()
            .push((url.to_string(), report.clone()));
    }

    fn report_error(&self, url: &str, error: &ScanError) {
        self.errors
            .lock()
            .unwrap()
            .push((url.to_string(), error.to_string()));
    }
}

fn watcher(
    source: Arc<dyn TextSource>,
    scanner: Arc<dyn Scanner>,
    sink: Arc<RecordingSink>,
) -> UrlWatcher {
    UrlWatcher::new(source, scanner, sink, UrlValidator::default()).with_poll_interval(POLL)
}

// =============================================================================
// TESTS
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_unchanged_text_is_scanned_once() {
    let source = ScriptedSource::new(vec![Ok("https://example.com")]);
    let scanner = Arc::new(CountingScanner::default());
    let sink = Arc::new(RecordingSink::default());

    let running = watcher(source.clone(), scanner.clone(), sink.clone()).start();
    tokio::time::sleep(POLL * 10).await;
    let stats = running.stop().await.unwrap();

    assert!(source.reads() >= 2, "source polled {} times", source.reads());
    assert_eq!(scanner.scanned(), vec!["https://example.com"]);
    assert_eq!(stats.scans_started, 1);
    assert_eq!(sink.reports.lock().unwrap().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_no_scans_after_stop() {
    let source = Arc::new(ChangingSource {
        reads: AtomicUsize::new(0),
    });
    let scanner = Arc::new(CountingScanner::default());
    let sink = Arc::new(RecordingSink::default());

    let running = watcher(source.clone(), scanner.clone(), sink.clone()).start();
    tokio::time::sleep(POLL * 3 + POLL / 2).await;
    running.stop().await.unwrap();

    let scans_at_stop = scanner.scanned().len();
    let reads_at_stop = source.reads.load(Ordering::SeqCst);
    assert!(scans_at_stop >= 3);

    // Source keeps changing but nothing polls it any more
    tokio::time::sleep(POLL * 10).await;
    assert_eq!(scanner.scanned().len(), scans_at_stop);
    assert_eq!(source.reads.load(Ordering::SeqCst), reads_at_stop);
}

#[tokio::test(start_paused = true)]
async fn test_read_failures_do_not_stop_the_loop() {
    let source = ScriptedSource::new(vec![
        Err("clipboard locked"),
        Err("clipboard locked"),
        Ok("https://example.com/after-failures"),
    ]);
    let scanner = Arc::new(CountingScanner::default());
    let sink = Arc::new(RecordingSink::default());

    let running = watcher(source, scanner.clone(), sink).start();
    tokio::time::sleep(POLL * 6).await;
    let stats = running.stop().await.unwrap();

    assert_eq!(stats.read_failures, 2);
    assert_eq!(scanner.scanned(), vec!["https://example.com/after-failures"]);
}

#[tokio::test(start_paused = true)]
async fn test_non_url_text_is_remembered_but_not_scanned() {
    let source = ScriptedSource::new(vec![
        Ok("hello"),
        Ok("hello"),
        Ok("https://a.example.com"),
        Ok("just some notes"),
        Ok("https://a.example.com"),
        Ok("just some notes"),
    ]);
    let scanner = Arc::new(CountingScanner::default());
    let sink = Arc::new(RecordingSink::default());

    let running = watcher(source, scanner.clone(), sink).start();
    tokio::time::sleep(POLL * 10).await;
    running.stop().await.unwrap();

    // The URL re-appears after other text, so it counts as new content
    assert_eq!(
        scanner.scanned(),
        vec!["https://a.example.com", "https://a.example.com"]
    );
}

#[tokio::test(start_paused = true)]
async fn test_slow_scan_times_out_and_sampling_continues() {
    let source = Arc::new(ChangingSource {
        reads: AtomicUsize::new(0),
    });
    let scanner = Arc::new(CountingScanner {
        delay: Some(Duration::from_secs(60)),
        ..CountingScanner::default()
    });
    let sink = Arc::new(RecordingSink::default());

    let running = watcher(source.clone(), scanner.clone(), sink.clone())
        .with_scan_timeout(Duration::from_millis(250))
        .start();
    tokio::time::sleep(POLL * 5).await;
    running.stop().await.unwrap();

    // Sampling was not blocked by the hung scans
    assert!(source.reads.load(Ordering::SeqCst) >= 4);

    let errors = sink.errors.lock().unwrap();
    assert!(!errors.is_empty());
    assert!(errors
        .iter()
        .all(|(_, e)| e == "Scan timed out after 250 ms"));
    assert!(sink.reports.lock().unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_watcher_with_local_orchestrator() {
    let source = ScriptedSource::new(vec![Ok("  http://secure-login.paypal-verify.tk/account\n")]);
    let scanner = Arc::new(test_scanner(StaticBlacklist::new(BlacklistVerdict::NoMatch)));
    let sink = Arc::new(RecordingSink::default());

    let running = watcher(source, scanner, sink.clone()).start();
    tokio::time::sleep(POLL * 3).await;
    running.stop().await.unwrap();

    let reports = sink.reports.lock().unwrap();
    assert_eq!(reports.len(), 1);
    let (url, report) = &reports[0];
    assert_eq!(url, "http://secure-login.paypal-verify.tk/account");
    match report {
        ScanReport::Completed(record) => {
            assert_eq!(record.risk_level, RiskLevel::Phishing);
            assert_eq!(record.phishing_score, 75);
        },
        ScanReport::Rejected(_) => panic!("expected a completed report"),
    }
}
