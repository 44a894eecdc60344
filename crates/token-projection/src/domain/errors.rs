//! # Domain Errors
//!
//! Error types for the token projection.
//!
//! The taxonomy mirrors how each failure is treated:
//! - `ContractError`: one failed read against a contract.
//! - `RetryError`: outcome of a retried operation that never succeeded.
//! - `EventError`: an inbound envelope that could not be decoded.
//! - `SnapshotError`: cache persistence failures.
//! - `RetryPolicyError` / `SyncConfigError`: configuration rejected at startup.
//! - `SyncError`: everything that can stop bootstrap or the fold loop.

use super::value_objects::{Address, AddressParseError};
use thiserror::Error;

/// A single read-only contract call failed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("contract call {method} failed: {reason}")]
pub struct ContractError {
    /// Contract method that was called.
    pub method: &'static str,
    /// Transport or revert reason.
    pub reason: String,
}

impl ContractError {
    /// Create a new contract error.
    pub fn new(method: &'static str, reason: impl Into<String>) -> Self {
        Self {
            method,
            reason: reason.into(),
        }
    }
}

/// A retried operation gave up.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RetryError<E> {
    /// Every attempt failed; carries the last failure.
    #[error("gave up after {attempts} attempts: {last}")]
    Exhausted {
        /// Total attempts made (initial + retries)
        attempts: u32,
        /// Error from the final attempt
        last: E,
    },

    /// Shutdown was signalled while waiting for the next attempt.
    #[error("retry cancelled after {attempts} attempts")]
    Cancelled {
        /// Attempts made before cancellation
        attempts: u32,
    },
}

impl<E> RetryError<E> {
    /// Number of attempts made before giving up.
    pub fn attempts(&self) -> u32 {
        match self {
            Self::Exhausted { attempts, .. } | Self::Cancelled { attempts } => *attempts,
        }
    }
}

/// An inbound event envelope could not be decoded into a typed event.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EventError {
    /// A token or manager event arrived without an emitting address.
    #[error("event {event} has no emitting address")]
    MissingEmitter {
        /// Event name
        event: String,
    },

    /// A required argument is missing from `returnValues`.
    #[error("event {event} is missing argument {arg}")]
    MissingArgument {
        /// Event name
        event: String,
        /// Argument name
        arg: &'static str,
    },

    /// An address argument did not parse.
    #[error("event {event} argument {arg}: {source}")]
    InvalidAddress {
        /// Event name
        event: String,
        /// Argument name
        arg: &'static str,
        /// Parse failure
        #[source]
        source: AddressParseError,
    },

    /// A numeric argument did not parse.
    #[error("event {event} argument {arg} is not an unsigned integer: {value}")]
    InvalidNumber {
        /// Event name
        event: String,
        /// Argument name
        arg: &'static str,
        /// Raw value
        value: String,
    },
}

/// Snapshot persistence failed.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Filesystem failure.
    #[error("snapshot I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Encoding or decoding failure.
    #[error("snapshot encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// A retry policy whose delays would not strictly increase.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RetryPolicyError {
    /// `initial_delay_ms` is zero.
    #[error("initial_delay_ms must be greater than zero")]
    ZeroInitialDelay,

    /// `growth_factor` below 2.
    #[error("growth_factor must be at least 2, got {0}")]
    NonIncreasingGrowth(u32),
}

/// Engine configuration rejected at startup.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SyncConfigError {
    /// One of the retry policies is invalid.
    #[error("{policy}: {source}")]
    RetryPolicy {
        /// Config field holding the policy
        policy: &'static str,
        /// What is wrong with it
        #[source]
        source: RetryPolicyError,
    },
}

/// Errors that stop bootstrap or the fold loop.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The token manager never returned its token address.
    #[error("could not resolve token address: {0}")]
    TokenAddressUnavailable(RetryError<ContractError>),

    /// The per-account cap could not be read; bootstrap cannot proceed.
    #[error("could not load maxAccountTokens: {0}")]
    MaxAccountTokensUnavailable(ContractError),

    /// A vesting lookup failed after retries.
    #[error("could not load vesting {vesting_id} for {receiver}: {source}")]
    VestingUnavailable {
        /// Vesting receiver
        receiver: Address,
        /// Vesting id
        vesting_id: u64,
        /// Retry failure
        #[source]
        source: RetryError<ContractError>,
    },

    /// Configuration rejected at startup.
    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] SyncConfigError),
}
