//! roundcast Server - headless poller and predictor
//!
//! Polls the result feed, keeps the rolling history, issues a prediction for
//! every next round and pushes status as structured JSON lines to stdout.
//!
//! # Usage
//! ```sh
//! MODE=live FEED_URL=https://host/api/get_history cargo run --bin server
//! ```
//!
//! # Environment Variables
//! - `MODE` - `mock` (simulated feed, default) or `live`
//! - `OBSERVABILITY_ENABLED` - Enable status reporting (default: true)
//! - `OBSERVABILITY_INTERVAL` - Seconds between status lines (default: 30)

use anyhow::Result;
use roundcast::application::system::Application;
use roundcast::config::Config;
use tracing::{Level, info};
use tracing_subscriber::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let stdout_layer = tracing_subscriber::fmt::layer().with_target(false).pretty();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stdout_layer)
        .init();

    info!("roundcast Server {} starting...", env!("CARGO_PKG_VERSION"));
    info!("Status: Push-based (JSON to stdout)");

    let config = Config::from_env()?;
    info!(
        "Configuration loaded: Mode={}, Profile={}, Storage={}, HistoryCap={}",
        config.mode, config.engine.profile, config.storage.backend, config.engine.history_cap
    );

    let app = Application::build(config).await?;
    let handle = app.start().await?;

    info!("Server running. Press Ctrl+C to shutdown.");

    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received. Exiting...");

    handle.shutdown().await
}
