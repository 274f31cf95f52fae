//! reachable-monitor binary
//!
//! Usage: reachable-monitor [CONFIG_PATH]

use reachable_monitor::{Config, LogFormat, Monitor};
use std::env;
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let explicit = env::args().nth(1).map(PathBuf::from);

    // Configuration first: it decides the log format.
    let config = Config::load(explicit.as_deref())?;

    match config.logging.format.unwrap_or_default() {
        LogFormat::Text => common::logging::init(config.log_level()),
        LogFormat::Json => common::logging::init_json(config.log_level()),
    }

    tracing::info!(hosts = ?config.hosts, interval = ?config.checker.interval, "reachable-monitor starting");

    let monitor = Monitor::from_config(&config)?;
    monitor
        .run(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            }
        })
        .await?;

    Ok(())
}
