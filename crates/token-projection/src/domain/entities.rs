//! # Domain Entities
//!
//! The projected application state and the records it is made of.
//!
//! Every entity is keyed by a normalized [`Address`] (and, for vestings, an id).
//! Entities are created the first time a key is observed and replaced by key
//! afterwards; nothing is ever removed.

use super::value_objects::{seconds_to_millis, Address, U256};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A holder of governance shares.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holder {
    /// Holder address.
    pub address: Address,
    /// Shares as last read from the token.
    pub shares: U256,
}

/// A vesting schedule with dates in epoch milliseconds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VestingRecord {
    /// Vesting id, unique per receiver.
    pub id: u64,
    /// Total amount under vesting.
    pub amount: U256,
    /// Vesting start (ms).
    pub start: u64,
    /// Cliff date (ms); nothing is released before it.
    pub cliff: u64,
    /// Full vesting date (ms).
    pub vesting: u64,
    /// Whether the manager may revoke the unvested part.
    pub revokable: bool,
}

impl VestingRecord {
    /// Amount released at `now_ms` under linear vesting.
    ///
    /// Display helper only; the contract remains the authority on what is
    /// actually transferable.
    #[must_use]
    pub fn vested_amount(&self, now_ms: u64) -> U256 {
        if now_ms < self.cliff {
            return U256::zero();
        }
        if now_ms >= self.vesting || self.vesting <= self.start {
            return self.amount;
        }

        let elapsed = U256::from(now_ms.saturating_sub(self.start));
        let duration = U256::from(self.vesting - self.start);
        self.amount.saturating_mul(elapsed) / duration
    }
}

/// Vesting exactly as the token manager returns it (dates in seconds).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawVesting {
    /// Total amount under vesting.
    pub amount: U256,
    /// Vesting start (s).
    pub start: u64,
    /// Cliff date (s).
    pub cliff: u64,
    /// Full vesting date (s).
    pub vesting: u64,
    /// Revocation right.
    pub revokable: bool,
}

impl RawVesting {
    /// Ingest a contract vesting: the only place seconds become milliseconds.
    #[must_use]
    pub fn into_record(self, id: u64) -> VestingRecord {
        VestingRecord {
            id,
            amount: self.amount,
            start: seconds_to_millis(self.start),
            cliff: seconds_to_millis(self.cliff),
            vesting: seconds_to_millis(self.vesting),
            revokable: self.revokable,
        }
    }
}

/// Freshly read values for one address.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccountReads {
    /// Address the reads belong to.
    pub address: Address,
    /// `shares(address)`
    pub shares: U256,
    /// `delegableBalance(address)`
    pub balance: U256,
    /// `delegatedTo(address)`
    pub delegated: U256,
}

/// Static token settings loaded once at bootstrap.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenSettings {
    /// `name()`
    pub name: String,
    /// `symbol()`
    pub symbol: String,
    /// `decimals()`
    pub decimals: u8,
    /// `totalSupply()`
    pub total_supply: U256,
    /// `transfersEnabled()`
    pub transfers_enabled: bool,
    /// `delegationEnabled()`
    pub delegation_enabled: bool,
}

/// The projected application state.
///
/// Shared as `Arc<ApplicationState>`; reductions clone, edit, and re-wrap.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationState {
    /// Bumped on every reduction that produced a new snapshot.
    #[serde(default)]
    pub version: u64,
    /// True between the sync-start and sync-end pseudo-events.
    #[serde(default)]
    pub is_syncing: bool,
    /// Watched token contract.
    #[serde(default)]
    pub token_address: Option<Address>,
    /// Token symbol, if it could be read.
    #[serde(default)]
    pub token_symbol: Option<String>,
    /// Token name.
    #[serde(default)]
    pub token_name: Option<String>,
    /// Token decimals.
    #[serde(default)]
    pub token_decimals: Option<u8>,
    /// Total supply, refreshed on every transfer.
    #[serde(default)]
    pub token_supply: Option<U256>,
    /// Whether token transfers are enabled.
    #[serde(default)]
    pub token_transfers_enabled: Option<bool>,
    /// Whether delegation is enabled.
    #[serde(default)]
    pub token_delegation_enabled: Option<bool>,
    /// Per-account cap; zero means unlimited.
    #[serde(default)]
    pub max_account_tokens: U256,
    /// One entry per address that has been seen holding shares.
    #[serde(default)]
    pub holders: Vec<Holder>,
    /// Delegable balance per address.
    #[serde(default)]
    pub balances: BTreeMap<Address, U256>,
    /// Delegated-to amount per address.
    #[serde(default)]
    pub delegations: BTreeMap<Address, U256>,
    /// Vestings per receiver, ordered by first observation.
    #[serde(default)]
    pub vestings: BTreeMap<Address, Vec<VestingRecord>>,
}

impl ApplicationState {
    /// Look up a holder by address.
    #[must_use]
    pub fn holder(&self, address: &Address) -> Option<&Holder> {
        self.holders.iter().find(|h| h.address == *address)
    }

    /// Current delegable balance, zero when never read.
    #[must_use]
    pub fn balance_of(&self, address: &Address) -> U256 {
        self.balances.get(address).copied().unwrap_or_default()
    }

    /// Current delegated-to amount, zero when never read.
    #[must_use]
    pub fn delegated_to(&self, address: &Address) -> U256 {
        self.delegations.get(address).copied().unwrap_or_default()
    }

    /// Vestings of an address (empty when none).
    #[must_use]
    pub fn vestings_of(&self, address: &Address) -> &[VestingRecord] {
        self.vestings.get(address).map(Vec::as_slice).unwrap_or(&[])
    }

    /// True when every token setting is present.
    #[must_use]
    pub fn has_loaded_token_settings(&self) -> bool {
        self.token_name.is_some()
            && self.token_symbol.is_some()
            && self.token_decimals.is_some()
            && self.token_supply.is_some()
            && self.token_transfers_enabled.is_some()
            && self.token_delegation_enabled.is_some()
    }

    /// Copy settings into the state.
    pub fn apply_token_settings(&mut self, settings: TokenSettings) {
        self.token_name = Some(settings.name);
        self.token_symbol = Some(settings.symbol);
        self.token_decimals = Some(settings.decimals);
        self.token_supply = Some(settings.total_supply);
        self.token_transfers_enabled = Some(settings.transfers_enabled);
        self.token_delegation_enabled = Some(settings.delegation_enabled);
    }

    /// Upsert a holder's shares: replace when present, append otherwise.
    pub fn upsert_holder(&mut self, address: Address, shares: U256) {
        match self.holders.iter_mut().find(|h| h.address == address) {
            Some(holder) => holder.shares = shares,
            None => self.holders.push(Holder { address, shares }),
        }
    }

    /// Merge fresh reads: last read wins for shares, balance and delegation.
    pub fn merge_account_reads(&mut self, reads: &[AccountReads]) {
        for read in reads {
            self.upsert_holder(read.address, read.shares);
            self.balances.insert(read.address, read.balance);
            self.delegations.insert(read.address, read.delegated);
        }
    }

    /// Upsert a vesting by id for a receiver.
    pub fn upsert_vesting(&mut self, receiver: Address, record: VestingRecord) {
        let list = self.vestings.entry(receiver).or_default();
        match list.iter_mut().find(|v| v.id == record.id) {
            Some(existing) => *existing = record,
            None => list.push(record),
        }
    }
}
