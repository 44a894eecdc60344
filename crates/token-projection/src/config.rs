//! # Projection Configuration
//!
//! Retry behaviour and failure policy for the sync engine.

use crate::domain::SyncConfigError;
use crate::retry::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// What the reducer does when a vesting lookup fails after all retries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VestingFailurePolicy {
    /// Surface the failure to the caller; the fold loop stops.
    #[default]
    Propagate,
    /// Log the failure and leave the state untouched, like balance refreshes.
    SkipAndLog,
}

/// Sync engine configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenSyncConfig {
    /// Backoff for resolving the token address at startup.
    pub bootstrap_retry: RetryPolicy,

    /// Backoff for `getVesting` lookups.
    pub vesting_retry: RetryPolicy,

    /// Behaviour once `vesting_retry` is exhausted.
    pub vesting_failure_policy: VestingFailurePolicy,
}

impl Default for TokenSyncConfig {
    fn default() -> Self {
        Self {
            bootstrap_retry: RetryPolicy::default(),
            vesting_retry: RetryPolicy::default(),
            vesting_failure_policy: VestingFailurePolicy::Propagate,
        }
    }
}

impl TokenSyncConfig {
    /// Create a config for testing (millisecond backoff).
    pub fn for_testing() -> Self {
        Self {
            bootstrap_retry: RetryPolicy::new(Duration::from_millis(1), 2, 3),
            vesting_retry: RetryPolicy::new(Duration::from_millis(1), 2, 3),
            vesting_failure_policy: VestingFailurePolicy::Propagate,
        }
    }

    /// Validate every retry policy.
    pub fn validate(&self) -> Result<(), SyncConfigError> {
        for (policy, retry) in [
            ("bootstrap_retry", &self.bootstrap_retry),
            ("vesting_retry", &self.vesting_retry),
        ] {
            retry
                .validate()
                .map_err(|source| SyncConfigError::RetryPolicy { policy, source })?;
        }
        Ok(())
    }
}
