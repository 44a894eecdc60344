//! Dependencies shared by bootstrap and every reduction.

use crate::algorithms::WatchedContracts;
use crate::config::{TokenSyncConfig, VestingFailurePolicy};
use crate::domain::Address;
use crate::ports::{TokenContract, TokenManagerContract};
use crate::retry::RetryScheduler;
use std::sync::Arc;
use tokio::sync::watch;

/// Contract clients, watched addresses and retry behaviour for one token.
///
/// Built once the token address is known and passed by reference to the
/// reducer, so handlers never reach for globals.
#[derive(Clone)]
pub struct SyncContext {
    /// Addresses whose events are folded.
    pub contracts: WatchedContracts,
    /// Client for the watched token.
    pub token: Arc<dyn TokenContract>,
    /// Client for the token manager.
    pub manager: Arc<dyn TokenManagerContract>,
    /// Backoff around `getVesting`.
    pub vesting_retry: RetryScheduler,
    /// What to do once `vesting_retry` gives up.
    pub vesting_failure_policy: VestingFailurePolicy,
}

impl SyncContext {
    /// Assemble a context for `token_address`.
    pub fn new(
        token_address: Address,
        token: Arc<dyn TokenContract>,
        manager: Arc<dyn TokenManagerContract>,
        config: &TokenSyncConfig,
        shutdown: Option<watch::Receiver<bool>>,
    ) -> Self {
        let vesting_retry = match shutdown {
            Some(rx) => RetryScheduler::with_shutdown(config.vesting_retry.clone(), rx),
            None => RetryScheduler::new(config.vesting_retry.clone()),
        };
        Self {
            contracts: WatchedContracts {
                token: token_address,
                manager: manager.address(),
            },
            token,
            manager,
            vesting_retry,
            vesting_failure_policy: config.vesting_failure_policy,
        }
    }
}
