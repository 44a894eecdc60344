//! # Runtime Configuration
//!
//! Everything the binary needs, read from the environment.
//!
//! | Variable | Required | Description |
//! |----------|----------|-------------|
//! | `TP_EVENT_LOG` | yes | JSON-lines file of event envelopes |
//! | `TP_FIXTURE` | yes | Contract fixture JSON |
//! | `TP_SNAPSHOT_PATH` | no | Snapshot cache (default `token-projection-snapshot.json`) |
//! | `TP_SYNC_CONFIG` | no | JSON file holding a `TokenSyncConfig` |

use projection_telemetry::TelemetryConfig;
use std::path::{Path, PathBuf};
use thiserror::Error;
use token_projection::{SyncConfigError, TokenSyncConfig};

/// Default snapshot cache location.
pub const DEFAULT_SNAPSHOT_PATH: &str = "token-projection-snapshot.json";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required variable is not set.
    #[error("environment variable {0} is required")]
    Missing(&'static str),

    /// A referenced file could not be read.
    #[error("could not read {path}: {source}")]
    Read {
        /// File path
        path: PathBuf,
        /// I/O failure
        #[source]
        source: std::io::Error,
    },

    /// A referenced file is not valid JSON for its type.
    #[error("could not parse {path}: {source}")]
    Parse {
        /// File path
        path: PathBuf,
        /// Decode failure
        #[source]
        source: serde_json::Error,
    },

    /// Values parsed but were rejected.
    #[error("invalid sync configuration: {0}")]
    Invalid(#[source] SyncConfigError),
}

/// Complete runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Event log to replay.
    pub event_log: PathBuf,
    /// Contract fixture.
    pub fixture: PathBuf,
    /// Snapshot cache file.
    pub snapshot_path: PathBuf,
    /// Engine configuration.
    pub sync: TokenSyncConfig,
    /// Logging configuration.
    pub telemetry: TelemetryConfig,
}

impl RuntimeConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok(), TelemetryConfig::from_env())
    }

    /// Load using `lookup` for variables.
    pub fn from_lookup<F>(lookup: F, telemetry: TelemetryConfig) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let event_log = lookup("TP_EVENT_LOG").ok_or(ConfigError::Missing("TP_EVENT_LOG"))?;
        let fixture = lookup("TP_FIXTURE").ok_or(ConfigError::Missing("TP_FIXTURE"))?;
        let snapshot_path =
            lookup("TP_SNAPSHOT_PATH").unwrap_or_else(|| DEFAULT_SNAPSHOT_PATH.to_string());

        let sync = match lookup("TP_SYNC_CONFIG") {
            Some(path) => read_json::<TokenSyncConfig>(Path::new(&path))?,
            None => TokenSyncConfig::default(),
        };
        sync.validate().map_err(ConfigError::Invalid)?;

        Ok(Self {
            event_log: event_log.into(),
            fixture: fixture.into(),
            snapshot_path: snapshot_path.into(),
            sync,
            telemetry,
        })
    }
}

/// Read and decode a JSON file.
pub fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
