use anyhow::Context;
use tracing::{info, warn};

use phish_scanner::{build_router, init_tracing, AppConfig, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables before the config reads them
    dotenv::dotenv().ok();

    let config = AppConfig::from_env().context("Invalid configuration")?;
    init_tracing(&config.server.log_filter);
    let bind_address = config.server.bind_address.clone();

    info!(
        "Starting phishing URL scanner on {} ({})",
        bind_address, config.server.environment
    );

    let state = AppState::from_config(config).context("Failed to initialize scanner")?;
    if !state.blacklist_configured {
        info!("GOOGLE_SAFE_BROWSING_API_KEY not set; blacklist verdicts will be Unknown");
    }

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            warn!("Unable to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        },
    }
}
