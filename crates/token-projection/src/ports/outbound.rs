//! # Outbound Ports
//!
//! Traits for the external collaborators: the two contracts the engine reads
//! from, the snapshot cache, and the event feed.

use crate::domain::{Address, ApplicationState, ContractError, RawVesting, SnapshotError, U256};
use crate::events::EventEnvelope;
use async_trait::async_trait;

/// Read-only calls against the delegable token.
#[async_trait]
pub trait TokenContract: Send + Sync {
    /// `name()`
    async fn name(&self) -> Result<String, ContractError>;

    /// `symbol()`
    async fn symbol(&self) -> Result<String, ContractError>;

    /// `decimals()`
    async fn decimals(&self) -> Result<u8, ContractError>;

    /// `totalSupply()`
    async fn total_supply(&self) -> Result<U256, ContractError>;

    /// `transfersEnabled()`
    async fn transfers_enabled(&self) -> Result<bool, ContractError>;

    /// `delegationEnabled()`
    async fn delegation_enabled(&self) -> Result<bool, ContractError>;

    /// `shares(owner)`: governance weight.
    async fn shares(&self, owner: Address) -> Result<U256, ContractError>;

    /// `delegableBalance(owner)`: spendable part of the balance.
    async fn delegable_balance(&self, owner: Address) -> Result<U256, ContractError>;

    /// `delegatedTo(owner)`: amount delegated to `owner`.
    async fn delegated_to(&self, owner: Address) -> Result<U256, ContractError>;
}

/// Read-only calls against the token manager.
#[async_trait]
pub trait TokenManagerContract: Send + Sync {
    /// Address of the token manager contract itself.
    fn address(&self) -> Address;

    /// `token()`: the managed token.
    async fn token(&self) -> Result<Address, ContractError>;

    /// `maxAccountTokens()`: per-account cap, zero for unlimited.
    async fn max_account_tokens(&self) -> Result<U256, ContractError>;

    /// `getVesting(receiver, vestingId)`
    async fn get_vesting(
        &self,
        receiver: Address,
        vesting_id: u64,
    ) -> Result<RawVesting, ContractError>;
}

/// Snapshot cache used for rehydration.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Load the cached state, if any.
    async fn load(&self) -> Result<Option<ApplicationState>, SnapshotError>;

    /// Persist a state snapshot.
    async fn save(&self, state: &ApplicationState) -> Result<(), SnapshotError>;
}

/// Ordered feed of event envelopes.
#[async_trait]
pub trait EventSource: Send {
    /// Next envelope in arrival order; `None` once the feed is closed.
    async fn next_event(&mut self) -> Option<EventEnvelope>;
}
