//! # Adapters
//!
//! File- and fixture-backed implementations of the outbound ports.

pub mod file_store;
pub mod fixture;
pub mod jsonl_source;

pub use file_store::JsonFileSnapshotStore;
pub use fixture::{ContractFixture, FixtureAccount, FixtureToken, FixtureTokenManager};
pub use jsonl_source::JsonLinesEventSource;
