//! # JSON File Snapshot Store
//!
//! Keeps the latest snapshot in one JSON file. Writes go to a sibling
//! temporary file first and are renamed into place, so a crash never leaves
//! a half-written cache behind.

use async_trait::async_trait;
use projection_telemetry::{metric_inc, SNAPSHOTS_PERSISTED};
use std::io::ErrorKind;
use std::path::PathBuf;
use token_projection::{ApplicationState, SnapshotError, SnapshotStore};
use tracing::debug;

/// Snapshot cache backed by a JSON file.
pub struct JsonFileSnapshotStore {
    path: PathBuf,
}

impl JsonFileSnapshotStore {
    /// Store at `path`; the file need not exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl SnapshotStore for JsonFileSnapshotStore {
    async fn load(&self) -> Result<Option<ApplicationState>, SnapshotError> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let state = serde_json::from_slice(&raw)?;
        debug!(path = %self.path.display(), "Loaded cached snapshot");
        Ok(Some(state))
    }

    async fn save(&self, state: &ApplicationState) -> Result<(), SnapshotError> {
        let encoded = serde_json::to_vec_pretty(state)?;
        let temp = self.temp_path();
        tokio::fs::write(&temp, encoded).await?;
        tokio::fs::rename(&temp, &self.path).await?;
        metric_inc!(SNAPSHOTS_PERSISTED);
        Ok(())
    }
}
