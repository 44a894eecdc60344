//! # Application Module
//!
//! Bootstrap, the reducer and the service driving them.

pub mod bootstrap;
pub mod context;
pub mod reducer;
pub mod service;

pub use bootstrap::{initial_state, resolve_token_address, BootstrapOutcome};
pub use context::SyncContext;
pub use reducer::{apply, reduce, FoldOutcome, Reduction};
pub use service::{FoldStats, ProjectionReader, TokenSyncService};
