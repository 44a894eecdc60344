//! # Replay Runtime
//!
//! Wires the fixture contracts, the file store and the event log into a
//! [`TokenSyncService`] and folds the log to the end.

use crate::adapters::{ContractFixture, JsonFileSnapshotStore, JsonLinesEventSource};
use crate::config::{read_json, RuntimeConfig};
use anyhow::{Context, Result};
use projection_telemetry::{metric_inc, EVENTS_APPLIED, EVENTS_PASSED_THROUGH, EVENTS_SKIPPED};
use std::sync::Arc;
use tokio::sync::watch;
use token_projection::{ApplicationState, FoldOutcome, FoldStats, TokenContract, TokenSyncService};
use tracing::info;

/// What a replay produced.
#[derive(Debug, Clone)]
pub struct ReplayReport {
    /// Folded event counters.
    pub stats: FoldStats,
    /// Final state.
    pub state: Arc<ApplicationState>,
    /// Token symbol, if it could be read.
    pub identity_label: Option<String>,
}

/// Replay the configured event log until it ends or `shutdown` fires.
pub async fn replay(
    config: &RuntimeConfig,
    shutdown: watch::Receiver<bool>,
) -> Result<ReplayReport> {
    let fixture: ContractFixture = read_json(&config.fixture)?;
    let (manager, token) = fixture.into_contracts();
    let store = Arc::new(JsonFileSnapshotStore::new(&config.snapshot_path));

    let mut source = JsonLinesEventSource::open(&config.event_log)
        .await
        .with_context(|| format!("opening event log {}", config.event_log.display()))?;

    let mut service = TokenSyncService::start(
        config.sync.clone(),
        manager,
        move |_| token as Arc<dyn TokenContract>,
        store,
        shutdown,
    )
    .await
    .context("bootstrapping token sync")?;

    let stats = service
        .run_with(&mut source, record_outcome)
        .await
        .context("folding events")?;

    let state = service.state();
    info!(
        applied = stats.applied,
        passed_through = stats.passed_through,
        skipped = stats.skipped,
        undecodable_lines = source.skipped(),
        holders = state.holders.len(),
        version = state.version,
        "Replay finished"
    );

    Ok(ReplayReport {
        stats,
        state,
        identity_label: service.identity_label().map(str::to_string),
    })
}

fn record_outcome(outcome: FoldOutcome) {
    match outcome {
        FoldOutcome::Applied => metric_inc!(EVENTS_APPLIED),
        FoldOutcome::PassedThrough => metric_inc!(EVENTS_PASSED_THROUGH),
        FoldOutcome::Skipped => metric_inc!(EVENTS_SKIPPED),
    }
}
