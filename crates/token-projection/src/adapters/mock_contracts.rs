//! Scriptable contract doubles.
//!
//! Values can be changed between events to emulate the chain moving on, and
//! individual methods can be made to fail.

use crate::domain::{Address, ContractError, RawVesting, TokenSettings, U256};
use crate::ports::{TokenContract, TokenManagerContract};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};

/// Reads returned for one address.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MockAccount {
    /// `shares`
    pub shares: U256,
    /// `delegableBalance`
    pub balance: U256,
    /// `delegatedTo`
    pub delegated: U256,
}

#[derive(Default)]
struct TokenInner {
    settings: TokenSettings,
    accounts: HashMap<Address, MockAccount>,
    failing: HashSet<&'static str>,
    calls: HashMap<&'static str, u32>,
}

/// Mock token for testing. Unknown addresses read as zero, like the contract.
#[derive(Default)]
pub struct MockTokenContract {
    inner: Mutex<TokenInner>,
}

impl MockTokenContract {
    /// Token with default (empty) settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Token with the given settings.
    pub fn with_settings(settings: TokenSettings) -> Self {
        let token = Self::new();
        token.inner.lock().settings = settings;
        token
    }

    /// Set the reads for an address.
    pub fn set_account(
        &self,
        address: Address,
        shares: impl Into<U256>,
        balance: impl Into<U256>,
        delegated: impl Into<U256>,
    ) {
        self.inner.lock().accounts.insert(
            address,
            MockAccount {
                shares: shares.into(),
                balance: balance.into(),
                delegated: delegated.into(),
            },
        );
    }

    /// Set `totalSupply()`.
    pub fn set_total_supply(&self, supply: impl Into<U256>) {
        self.inner.lock().settings.total_supply = supply.into();
    }

    /// Make `method` fail until [`recover`](Self::recover) is called.
    pub fn fail(&self, method: &'static str) {
        self.inner.lock().failing.insert(method);
    }

    /// Undo [`fail`](Self::fail).
    pub fn recover(&self, method: &'static str) {
        self.inner.lock().failing.remove(method);
    }

    /// Number of calls made to `method`.
    pub fn calls(&self, method: &str) -> u32 {
        self.inner.lock().calls.get(method).copied().unwrap_or(0)
    }

    fn read<T>(
        &self,
        method: &'static str,
        value: impl FnOnce(&TokenInner) -> T,
    ) -> Result<T, ContractError> {
        let mut inner = self.inner.lock();
        *inner.calls.entry(method).or_insert(0) += 1;
        if inner.failing.contains(method) {
            return Err(ContractError::new(method, "mock failure"));
        }
        Ok(value(&inner))
    }

    fn account(&self, method: &'static str, owner: Address) -> Result<MockAccount, ContractError> {
        self.read(method, |inner| {
            inner.accounts.get(&owner).copied().unwrap_or_default()
        })
    }
}

#[async_trait]
impl TokenContract for MockTokenContract {
    async fn name(&self) -> Result<String, ContractError> {
        self.read("name", |inner| inner.settings.name.clone())
    }

    async fn symbol(&self) -> Result<String, ContractError> {
        self.read("symbol", |inner| inner.settings.symbol.clone())
    }

    async fn decimals(&self) -> Result<u8, ContractError> {
        self.read("decimals", |inner| inner.settings.decimals)
    }

    async fn total_supply(&self) -> Result<U256, ContractError> {
        self.read("totalSupply", |inner| inner.settings.total_supply)
    }

    async fn transfers_enabled(&self) -> Result<bool, ContractError> {
        self.read("transfersEnabled", |inner| inner.settings.transfers_enabled)
    }

    async fn delegation_enabled(&self) -> Result<bool, ContractError> {
        self.read("delegationEnabled", |inner| inner.settings.delegation_enabled)
    }

    async fn shares(&self, owner: Address) -> Result<U256, ContractError> {
        Ok(self.account("shares", owner)?.shares)
    }

    async fn delegable_balance(&self, owner: Address) -> Result<U256, ContractError> {
        Ok(self.account("delegableBalance", owner)?.balance)
    }

    async fn delegated_to(&self, owner: Address) -> Result<U256, ContractError> {
        Ok(self.account("delegatedTo", owner)?.delegated)
    }
}

struct ManagerInner {
    token: Option<Address>,
    token_failures: u32,
    max_account_tokens: Option<U256>,
    vestings: HashMap<(Address, u64), RawVesting>,
    vesting_failures: u32,
    calls: HashMap<&'static str, u32>,
}

/// Mock token manager for testing.
pub struct MockTokenManager {
    address: Address,
    inner: Mutex<ManagerInner>,
}

impl MockTokenManager {
    /// Manager at `address` managing `token`, with an unlimited cap.
    pub fn new(address: Address, token: Address) -> Self {
        Self {
            address,
            inner: Mutex::new(ManagerInner {
                token: Some(token),
                token_failures: 0,
                max_account_tokens: Some(U256::zero()),
                vestings: HashMap::new(),
                vesting_failures: 0,
                calls: HashMap::new(),
            }),
        }
    }

    /// `token()` fails the next `times` calls (`u32::MAX` = always).
    pub fn fail_token(&self, times: u32) {
        self.inner.lock().token_failures = times;
    }

    /// `None` makes `maxAccountTokens()` fail.
    pub fn set_max_account_tokens(&self, cap: Option<U256>) {
        self.inner.lock().max_account_tokens = cap;
    }

    /// Register a vesting for `getVesting`.
    pub fn set_vesting(&self, receiver: Address, vesting_id: u64, vesting: RawVesting) {
        self.inner
            .lock()
            .vestings
            .insert((receiver, vesting_id), vesting);
    }

    /// `getVesting` fails the next `times` calls (`u32::MAX` = always).
    pub fn fail_vesting(&self, times: u32) {
        self.inner.lock().vesting_failures = times;
    }

    /// Number of calls made to `method`.
    pub fn calls(&self, method: &str) -> u32 {
        self.inner.lock().calls.get(method).copied().unwrap_or(0)
    }
}

fn consume_failure(remaining: &mut u32) -> bool {
    match *remaining {
        0 => false,
        u32::MAX => true,
        _ => {
            *remaining -= 1;
            true
        }
    }
}

#[async_trait]
impl TokenManagerContract for MockTokenManager {
    fn address(&self) -> Address {
        self.address
    }

    async fn token(&self) -> Result<Address, ContractError> {
        let mut inner = self.inner.lock();
        *inner.calls.entry("token").or_insert(0) += 1;
        if consume_failure(&mut inner.token_failures) {
            return Err(ContractError::new("token", "mock failure"));
        }
        inner
            .token
            .ok_or_else(|| ContractError::new("token", "no token configured"))
    }

    async fn max_account_tokens(&self) -> Result<U256, ContractError> {
        let mut inner = self.inner.lock();
        *inner.calls.entry("maxAccountTokens").or_insert(0) += 1;
        inner
            .max_account_tokens
            .ok_or_else(|| ContractError::new("maxAccountTokens", "mock failure"))
    }

    async fn get_vesting(
        &self,
        receiver: Address,
        vesting_id: u64,
    ) -> Result<RawVesting, ContractError> {
        let mut inner = self.inner.lock();
        *inner.calls.entry("getVesting").or_insert(0) += 1;
        if consume_failure(&mut inner.vesting_failures) {
            return Err(ContractError::new("getVesting", "mock failure"));
        }
        inner
            .vestings
            .get(&(receiver, vesting_id))
            .cloned()
            .ok_or_else(|| ContractError::new("getVesting", "TM_NO_VESTING"))
    }
}
