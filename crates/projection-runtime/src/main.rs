//! # Projection Runtime
//!
//! Replays a JSON-lines event log against fixture contracts, keeping the
//! snapshot cache up to date, then logs the fold counters.
//!
//! ## Startup Sequence
//!
//! 1. Load configuration from the environment
//! 2. Initialize logging and metrics
//! 3. Install the Ctrl+C handler (flips the shutdown signal)
//! 4. Replay until the log ends or shutdown is requested
//! 5. Log the Prometheus counters

use anyhow::{Context, Result};
use projection_runtime::{replay, RuntimeConfig};
use projection_telemetry::{init_telemetry, render_metrics};
use tokio::sync::watch;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let config = RuntimeConfig::from_env().context("loading configuration")?;
    init_telemetry(&config.telemetry)?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Ctrl+C received, shutting down");
            let _ = shutdown_tx.send(true);
        }
    });

    info!(
        event_log = %config.event_log.display(),
        fixture = %config.fixture.display(),
        snapshot = %config.snapshot_path.display(),
        "Starting token projection replay"
    );
    let report = replay(&config, shutdown_rx).await?;

    info!(
        token = report.identity_label.as_deref().unwrap_or("unknown"),
        events = report.stats.total(),
        holders = report.state.holders.len(),
        "Projection up to date"
    );

    match render_metrics() {
        Ok(text) => info!(metrics = %text, "Final metrics"),
        Err(e) => warn!(error = %e, "Failed to render metrics"),
    }
    Ok(())
}
