//! Prometheus counters for the event fold.
//!
//! All metrics follow the naming convention: `tp_<area>_<metric>_total`

use lazy_static::lazy_static;
use prometheus::{Encoder, IntCounter, Registry, TextEncoder};

use crate::TelemetryError;

lazy_static! {
    /// Private registry; exposed only through [`render_metrics`].
    static ref REGISTRY: Registry = Registry::new();

    /// Events that produced a new snapshot
    pub static ref EVENTS_APPLIED: IntCounter = IntCounter::new(
        "tp_fold_events_applied_total",
        "Events folded into a new state snapshot"
    ).expect("metric creation failed");

    /// Events that left the state as it was without an error
    pub static ref EVENTS_PASSED_THROUGH: IntCounter = IntCounter::new(
        "tp_fold_events_passed_through_total",
        "Events that changed nothing (unrelated contract or event, or a repeated sync status)"
    ).expect("metric creation failed");

    /// Events left unapplied after a failed read or malformed payload
    pub static ref EVENTS_SKIPPED: IntCounter = IntCounter::new(
        "tp_fold_events_skipped_total",
        "Events whose merge was skipped, keeping the previous state"
    ).expect("metric creation failed");

    /// Snapshots written to the cache
    pub static ref SNAPSHOTS_PERSISTED: IntCounter = IntCounter::new(
        "tp_store_snapshots_persisted_total",
        "State snapshots written to the snapshot cache"
    ).expect("metric creation failed");
}

/// Register every counter. Safe to call more than once.
pub fn register_metrics() -> Result<(), TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(EVENTS_APPLIED.clone()),
        Box::new(EVENTS_PASSED_THROUGH.clone()),
        Box::new(EVENTS_SKIPPED.clone()),
        Box::new(SNAPSHOTS_PERSISTED.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }
    Ok(())
}

/// Encode all metrics as Prometheus text format.
pub fn render_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}
