// Watcher loop
// Polls an external text source and scans new URL-shaped content.
// Idle -> Running -> Stopped, enforced by consuming transitions.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::app_config::WatcherConfig;
use crate::models::scan::ScanReport;
use crate::services::scanner::Scanner;
use crate::utils::scan_errors::{ScanError, WatcherError};
use crate::utils::url_validator::UrlValidator;

/// Zero-argument read of the current external text (e.g. the clipboard)
#[async_trait]
pub trait TextSource: Send + Sync {
    async fn read_text(&self) -> Result<String, WatcherError>;
}

/// Receives the outcome of every watcher-triggered scan
pub trait ReportSink: Send + Sync {
    fn report(&self, url: &str, report: &ScanReport);
    fn report_error(&self, url: &str, error: &ScanError);
}

/// Counters returned once the loop has exited
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WatcherStats {
    pub polls: u64,
    pub read_failures: u64,
    pub scans_started: u64,
}

/// Owned exclusively by the loop task
#[derive(Debug, Default)]
struct WatcherState {
    last_observed_text: String,
    stats: WatcherStats,
}

impl WatcherState {
    /// Records `text` and reports whether it differs from the previous sample
    fn observe(&mut self, text: &str) -> bool {
        if self.last_observed_text == text {
            return false;
        }
        self.last_observed_text = text.to_string();
        true
    }
}

// =============================================================================
// IDLE
// =============================================================================

pub struct UrlWatcher {
    source: Arc<dyn TextSource>,
    scanner: Arc<dyn Scanner>,
    sink: Arc<dyn ReportSink>,
    validator: UrlValidator,
    poll_interval: Duration,
    scan_timeout: Duration,
}

impl UrlWatcher {
    pub fn new(
        source: Arc<dyn TextSource>,
        scanner: Arc<dyn Scanner>,
        sink: Arc<dyn ReportSink>,
        validator: UrlValidator,
    ) -> Self {
        let defaults = WatcherConfig::default();
        Self {
            source,
            scanner,
            sink,
            validator,
            poll_interval: Duration::from_millis(defaults.poll_interval_ms),
            scan_timeout: Duration::from_millis(defaults.scan_timeout_ms),
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn with_scan_timeout(mut self, scan_timeout: Duration) -> Self {
        self.scan_timeout = scan_timeout;
        self
    }

    pub fn with_config(self, config: &WatcherConfig) -> Self {
        self.with_poll_interval(Duration::from_millis(config.poll_interval_ms))
            .with_scan_timeout(Duration::from_millis(config.scan_timeout_ms))
    }

    /// Spawn the polling task. The first sample is taken immediately.
    pub fn start(self) -> RunningWatcher {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        info!(
            "Starting URL watcher (poll every {} ms)",
            self.poll_interval.as_millis()
        );
        let handle = tokio::spawn(self.run(shutdown_rx));

        RunningWatcher {
            shutdown_tx,
            handle,
        }
    }

    async fn run(self, mut shutdown: watch::Receiver<bool>) -> WatcherStats {
        let mut state = WatcherState::default();
        let mut in_flight: JoinSet<()> = JoinSet::new();
        let mut ticker = interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                // Fires on stop() and when the handle is dropped
                _ = shutdown.changed() => break,
                Some(joined) = in_flight.join_next(), if !in_flight.is_empty() => {
                    if let Err(e) = joined {
                        error!("Scan task failed: {}", e);
                    }
                },
                _ = ticker.tick() => self.poll(&mut state, &mut in_flight).await,
            }
        }

        // Let scans already started finish and report
        while let Some(joined) = in_flight.join_next().await {
            if let Err(e) = joined {
                error!("Scan task failed: {}", e);
            }
        }

        info!(
            "URL watcher stopped after {} polls, {} scans, {} read failures",
            state.stats.polls, state.stats.scans_started, state.stats.read_failures
        );
        state.stats
    }

    async fn poll(&self, state: &mut WatcherState, in_flight: &mut JoinSet<()>) {
        state.stats.polls += 1;

        let text = match self.source.read_text().await {
            Ok(text) => text,
            Err(e) => {
                state.stats.read_failures += 1;
                warn!("{}", e);
                return;
            },
        };

        // Updated regardless of validity so unchanged non-URL text is not re-tested
        if !state.observe(&text) {
            return;
        }

        let candidate = self.validator.validate(&text);
        if !candidate.is_valid() {
            debug!("Ignoring non-URL text ({} chars)", text.chars().count());
            return;
        }

        let url = candidate.raw().to_string();
        info!("New URL detected: {}", url);
        state.stats.scans_started += 1;

        let scanner = self.scanner.clone();
        let sink = self.sink.clone();
        let scan_timeout = self.scan_timeout;
        in_flight.spawn(async move {
            match tokio::time::timeout(scan_timeout, scanner.scan(&url)).await {
                Ok(Ok(report)) => sink.report(&url, &report),
                Ok(Err(e)) => {
                    warn!("Scan of {} failed: {}", url, e);
                    sink.report_error(&url, &e);
                },
                Err(_) => {
                    let e = ScanError::Timeout(scan_timeout.as_millis() as u64);
                    warn!("Scan of {} failed: {}", url, e);
                    sink.report_error(&url, &e);
                },
            }
        });
    }
}

// =============================================================================
// RUNNING
// =============================================================================

pub struct RunningWatcher {
    shutdown_tx: watch::Sender<bool>,
    handle: JoinHandle<WatcherStats>,
}

impl RunningWatcher {
    /// Signal shutdown and wait for the loop and its in-flight scans to exit.
    /// No scan starts after this returns.
    pub async fn stop(self) -> Result<WatcherStats, WatcherError> {
        // Receiver only goes away if the task already ended
        let _ = self.shutdown_tx.send(true);
        Ok(self.handle.await?)
    }
}
