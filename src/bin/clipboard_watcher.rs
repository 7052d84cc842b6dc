// Clipboard watcher: scans every new URL copied to the clipboard until Ctrl-C

use anyhow::Context;
use std::sync::Arc;
use tracing::info;

use phish_scanner::{
    app_config::ScanMode,
    init_tracing,
    services::{CommandTextSource, ConsoleReporter, RemoteScanner},
    utils::UrlValidator,
    AppConfig, ScanOrchestrator, Scanner, UrlWatcher,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let config = AppConfig::from_env().context("Invalid configuration")?;
    init_tracing(&config.server.log_filter);

    let scanner: Arc<dyn Scanner> = match config.watcher.scan_mode {
        ScanMode::Local => Arc::new(
            ScanOrchestrator::from_config(&config.scanner, &config.safe_browsing)
                .context("Failed to initialize scanner")?,
        ),
        ScanMode::Remote => {
            info!("Delegating scans to {}", config.watcher.scan_api_url);
            Arc::new(RemoteScanner::from_config(&config.watcher))
        },
    };

    let source = CommandTextSource::from_command_line(&config.watcher.clipboard_command)
        .context("Invalid WATCHER_CLIPBOARD_COMMAND")?;

    let watcher = UrlWatcher::new(
        Arc::new(source),
        scanner,
        Arc::new(ConsoleReporter),
        UrlValidator::new(config.scanner.max_url_length),
    )
    .with_config(&config.watcher);

    let running = watcher.start();
    println!("Clipboard monitor started. Press Ctrl+C to stop.");

    tokio::signal::ctrl_c()
        .await
        .context("Unable to listen for Ctrl-C")?;

    let stats = running.stop().await?;
    println!("Clipboard monitor stopped.");
    info!("Watcher finished: {:?}", stats);

    Ok(())
}
