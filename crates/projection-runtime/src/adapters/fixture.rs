//! # Fixture Contracts
//!
//! Read-only token and token manager served from a JSON snapshot of contract
//! state. Used to replay an event log without a chain connection.
//!
//! ```json
//! {
//!   "managerAddress": "0x…",
//!   "tokenAddress": "0x…",
//!   "maxAccountTokens": "0x0",
//!   "token": { "name": "…", "symbol": "…", "decimals": 18, "totalSupply": "0x3e8",
//!              "transfersEnabled": true, "delegationEnabled": true },
//!   "accounts": { "0x…": { "shares": "0x64", "balance": "0x64", "delegated": "0x0" } },
//!   "vestings": { "0x…": { "0": { "amount": "0x64", "start": 1700000000, "cliff": …,
//!                                 "vesting": …, "revokable": true } } }
//! }
//! ```
//!
//! Amounts are `0x` hex quantities; vesting dates are unix seconds, exactly as
//! the token manager returns them.

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use token_projection::{
    Address, ContractError, RawVesting, TokenContract, TokenManagerContract, TokenSettings, U256,
};

/// Reads for one address.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct FixtureAccount {
    /// `shares(address)`
    #[serde(default)]
    pub shares: U256,
    /// `delegableBalance(address)`
    #[serde(default)]
    pub balance: U256,
    /// `delegatedTo(address)`
    #[serde(default)]
    pub delegated: U256,
}

/// Contract state captured in a fixture file.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractFixture {
    /// Token manager address.
    pub manager_address: Address,
    /// Token returned by `token()`.
    pub token_address: Address,
    /// `maxAccountTokens()`
    #[serde(default)]
    pub max_account_tokens: U256,
    /// Token metadata.
    #[serde(default)]
    pub token: TokenSettings,
    /// Per-address reads; missing addresses read as zero.
    #[serde(default)]
    pub accounts: BTreeMap<Address, FixtureAccount>,
    /// Vestings by receiver and id.
    #[serde(default)]
    pub vestings: BTreeMap<Address, BTreeMap<u64, RawVesting>>,
}

impl ContractFixture {
    /// Split into the two contract clients.
    pub fn into_contracts(self) -> (Arc<FixtureTokenManager>, Arc<FixtureToken>) {
        let fixture = Arc::new(self);
        (
            Arc::new(FixtureTokenManager {
                fixture: Arc::clone(&fixture),
            }),
            Arc::new(FixtureToken { fixture }),
        )
    }
}

/// Token manager backed by a fixture.
pub struct FixtureTokenManager {
    fixture: Arc<ContractFixture>,
}

#[async_trait]
impl TokenManagerContract for FixtureTokenManager {
    fn address(&self) -> Address {
        self.fixture.manager_address
    }

    async fn token(&self) -> Result<Address, ContractError> {
        Ok(self.fixture.token_address)
    }

    async fn max_account_tokens(&self) -> Result<U256, ContractError> {
        Ok(self.fixture.max_account_tokens)
    }

    async fn get_vesting(
        &self,
        receiver: Address,
        vesting_id: u64,
    ) -> Result<RawVesting, ContractError> {
        self.fixture
            .vestings
            .get(&receiver)
            .and_then(|by_id| by_id.get(&vesting_id))
            .cloned()
            .ok_or_else(|| ContractError::new("getVesting", "TM_NO_VESTING"))
    }
}

/// Token backed by a fixture.
pub struct FixtureToken {
    fixture: Arc<ContractFixture>,
}

impl FixtureToken {
    fn account(&self, owner: &Address) -> FixtureAccount {
        self.fixture.accounts.get(owner).copied().unwrap_or_default()
    }
}

#[async_trait]
impl TokenContract for FixtureToken {
    async fn name(&self) -> Result<String, ContractError> {
        Ok(self.fixture.token.name.clone())
    }

    async fn symbol(&self) -> Result<String, ContractError> {
        Ok(self.fixture.token.symbol.clone())
    }

    async fn decimals(&self) -> Result<u8, ContractError> {
        Ok(self.fixture.token.decimals)
    }

    async fn total_supply(&self) -> Result<U256, ContractError> {
        Ok(self.fixture.token.total_supply)
    }

    async fn transfers_enabled(&self) -> Result<bool, ContractError> {
        Ok(self.fixture.token.transfers_enabled)
    }

    async fn delegation_enabled(&self) -> Result<bool, ContractError> {
        Ok(self.fixture.token.delegation_enabled)
    }

    async fn shares(&self, owner: Address) -> Result<U256, ContractError> {
        Ok(self.account(&owner).shares)
    }

    async fn delegable_balance(&self, owner: Address) -> Result<U256, ContractError> {
        Ok(self.account(&owner).balance)
    }

    async fn delegated_to(&self, owner: Address) -> Result<U256, ContractError> {
        Ok(self.account(&owner).delegated)
    }
}
