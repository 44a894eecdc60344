//! # Adapters
//!
//! In-memory implementations of the outbound ports.

pub mod memory;
pub mod mock_contracts;

pub use memory::{ChannelEventSource, InMemorySnapshotStore, VecEventSource};
pub use mock_contracts::{MockAccount, MockTokenContract, MockTokenManager};
