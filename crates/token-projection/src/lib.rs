//! # Token Projection
//!
//! Event-sourced read model of a delegable governance token and its token
//! manager.
//!
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! Contract events only say *that* something changed. The projection reacts
//! by re-reading the affected addresses from the contracts and folding the
//! reads into an immutable [`ApplicationState`] snapshot, so consumers can
//! render holders, balances, delegations and vestings without querying the
//! chain themselves.
//!
//! ## Guarantees
//!
//! | Property | Mechanism |
//! |----------|-----------|
//! | One holder per address | [`Address`] is 20 bytes; holders are upserted |
//! | Values are fresh reads | Reducer replaces, never accumulates |
//! | Failed reads are harmless | Reducer returns the input `Arc` |
//! | Bounded retries | [`RetryScheduler`]: `1 + max_attempts` calls at most |
//! | Clean shutdown | Retry sleeps and the fold loop observe a `watch` flag |
//!
//! ## Module Structure
//!
//! ```text
//! token-projection/
//! ├── domain/          # Address, ApplicationState, records, errors
//! ├── algorithms/      # Event normalization
//! ├── ports/           # Read API (inbound) + contracts, store, feed (outbound)
//! ├── adapters/        # In-memory store/feed, scriptable contract mocks
//! ├── application/     # Bootstrap, reducer, TokenSyncService
//! ├── events.rs        # Envelope wire format and typed events
//! ├── retry.rs         # Exponential backoff
//! └── config.rs        # TokenSyncConfig
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod algorithms;
pub mod application;
pub mod config;
pub mod domain;
pub mod events;
pub mod ports;
pub mod retry;

// Re-exports
pub use adapters::{
    ChannelEventSource, InMemorySnapshotStore, MockTokenContract, MockTokenManager,
    VecEventSource,
};
pub use algorithms::{normalize, WatchedContracts};
pub use application::{
    BootstrapOutcome, FoldOutcome, FoldStats, ProjectionReader, Reduction, SyncContext,
    TokenSyncService,
};
pub use config::{TokenSyncConfig, VestingFailurePolicy};
pub use domain::{
    AccountReads, Address, AddressParseError, ApplicationState, ContractError, EventError,
    Holder, RawVesting, RetryError, RetryPolicyError, SnapshotError, SyncConfigError, SyncError,
    TokenSettings, VestingRecord, U256,
};
pub use events::{EventEnvelope, ManagerEvent, SyncEvent, SyncStatus, TokenEvent};
pub use ports::{
    EventSource, HolderRow, SnapshotStore, TokenContract, TokenManagerContract,
    TokenProjectionApi,
};
pub use retry::{run_with_retry, RetryPolicy, RetryScheduler};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
