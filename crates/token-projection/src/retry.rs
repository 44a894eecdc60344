//! # Retry Scheduler
//!
//! Exponential backoff around a fallible async operation.
//!
//! ```text
//! attempt 1 ──fail──→ sleep(d) ──→ attempt 2 ──fail──→ sleep(d·g) ──→ ...
//!     │                                │
//!     └─ok─→ value                     └─ok─→ value
//!
//! after 1 + max_attempts failures ──→ RetryError::Exhausted { last }
//! shutdown while sleeping         ──→ RetryError::Cancelled
//! ```
//!
//! The loop carries `(attempt, delay)` explicitly; sleeping is a tokio timer,
//! so other tasks keep running while a retry waits.

use crate::domain::{RetryError, RetryPolicyError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, warn};

/// Backoff parameters. Missing fields take their defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Delay before the first retry, in milliseconds.
    pub initial_delay_ms: u64,
    /// Multiplier applied to the delay after every retry.
    pub growth_factor: u32,
    /// Retries allowed after the first attempt.
    pub max_attempts: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            initial_delay_ms: 1_000,
            growth_factor: 3,
            max_attempts: 3,
        }
    }
}

impl RetryPolicy {
    /// Create a policy.
    pub fn new(initial_delay: Duration, growth_factor: u32, max_attempts: u32) -> Self {
        Self {
            initial_delay_ms: u64::try_from(initial_delay.as_millis()).unwrap_or(u64::MAX),
            growth_factor,
            max_attempts,
        }
    }

    /// Delay before the first retry.
    pub fn initial_delay(&self) -> Duration {
        Duration::from_millis(self.initial_delay_ms)
    }

    /// Reject policies whose delays would not strictly increase.
    pub fn validate(&self) -> Result<(), RetryPolicyError> {
        if self.initial_delay_ms == 0 {
            return Err(RetryPolicyError::ZeroInitialDelay);
        }
        if self.growth_factor < 2 {
            return Err(RetryPolicyError::NonIncreasingGrowth(self.growth_factor));
        }
        Ok(())
    }
}

/// Runs operations under a [`RetryPolicy`], optionally aborting on shutdown.
#[derive(Clone, Debug)]
pub struct RetryScheduler {
    policy: RetryPolicy,
    shutdown: Option<watch::Receiver<bool>>,
}

impl RetryScheduler {
    /// Scheduler without a shutdown signal.
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            policy,
            shutdown: None,
        }
    }

    /// Scheduler that aborts pending sleeps once `shutdown` turns `true`.
    pub fn with_shutdown(policy: RetryPolicy, shutdown: watch::Receiver<bool>) -> Self {
        Self {
            policy,
            shutdown: Some(shutdown),
        }
    }

    /// Invoke `operation` until it succeeds or the policy is exhausted.
    pub async fn run<T, E, F, Fut>(&self, label: &str, mut operation: F) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: fmt::Display,
    {
        let mut shutdown = self.shutdown.clone();
        let mut attempt: u32 = 0;
        let mut delay = self.policy.initial_delay();

        loop {
            attempt += 1;
            let err = match operation().await {
                Ok(value) => {
                    if attempt > 1 {
                        debug!(operation = label, attempt, "Succeeded after retry");
                    }
                    return Ok(value);
                }
                Err(err) => err,
            };

            if attempt > self.policy.max_attempts {
                return Err(RetryError::Exhausted {
                    attempts: attempt,
                    last: err,
                });
            }

            warn!(
                operation = label,
                attempt,
                max_attempts = self.policy.max_attempts,
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                error = %err,
                "Operation failed, retrying"
            );

            if !sleep_unless_shutdown(delay, shutdown.as_mut()).await {
                debug!(operation = label, attempt, "Retry cancelled by shutdown");
                return Err(RetryError::Cancelled { attempts: attempt });
            }
            delay = delay.saturating_mul(self.policy.growth_factor);
        }
    }
}

/// Run `operation` under `policy` without a shutdown signal.
pub async fn run_with_retry<T, E, F, Fut>(
    policy: &RetryPolicy,
    operation: F,
) -> Result<T, RetryError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: fmt::Display,
{
    RetryScheduler::new(policy.clone())
        .run("operation", operation)
        .await
}

/// Returns `false` when shutdown fired before `delay` elapsed.
async fn sleep_unless_shutdown(
    delay: Duration,
    shutdown: Option<&mut watch::Receiver<bool>>,
) -> bool {
    let Some(rx) = shutdown else {
        tokio::time::sleep(delay).await;
        return true;
    };

    if *rx.borrow() {
        return false;
    }

    tokio::select! {
        _ = tokio::time::sleep(delay) => true,
        _ = shutdown_requested(rx) => false,
    }
}

/// Resolves once shutdown is requested; never if the sender is gone.
pub(crate) async fn shutdown_requested(rx: &mut watch::Receiver<bool>) {
    // A dropped sender can never request shutdown.
    let closed = rx.wait_for(|stop| *stop).await.is_err();
    if closed {
        std::future::pending::<()>().await;
    }
}
