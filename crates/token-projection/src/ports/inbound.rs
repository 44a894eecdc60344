//! # Inbound Ports
//!
//! Read API consumed by the view layer. Everything here is a pure query over
//! the latest published snapshot.

use crate::domain::{Address, ApplicationState, VestingRecord, U256};
use std::sync::Arc;

/// One row of the holders table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HolderRow {
    /// Holder address.
    pub address: Address,
    /// Governance shares.
    pub shares: U256,
    /// Amount delegated to this holder (zero if never read).
    pub delegated: U256,
    /// Delegable balance (zero if never read).
    pub balance: U256,
    /// Vestings of this holder (empty if none).
    pub vestings: Vec<VestingRecord>,
}

/// Projection read API - inbound port.
pub trait TokenProjectionApi: Send + Sync {
    /// Latest published snapshot.
    fn snapshot(&self) -> Arc<ApplicationState>;

    /// Holders joined with balances, delegations and vestings.
    fn holder_rows(&self) -> Vec<HolderRow> {
        let state = self.snapshot();
        state
            .holders
            .iter()
            .map(|holder| HolderRow {
                address: holder.address,
                shares: holder.shares,
                delegated: state.delegated_to(&holder.address),
                balance: state.balance_of(&holder.address),
                vestings: state.vestings_of(&holder.address).to_vec(),
            })
            .collect()
    }

    /// Vestings of one address.
    fn vestings_for(&self, address: &Address) -> Vec<VestingRecord> {
        self.snapshot().vestings_of(address).to_vec()
    }

    /// Whether more tokens may be assigned to `address` under the cap.
    fn can_assign(&self, address: &Address) -> bool {
        let state = self.snapshot();
        state.max_account_tokens.is_zero() || state.balance_of(address) < state.max_account_tokens
    }

    /// Whether the store driver is still replaying history.
    fn is_syncing(&self) -> bool {
        self.snapshot().is_syncing
    }
}

impl TokenProjectionApi for Arc<ApplicationState> {
    fn snapshot(&self) -> Arc<ApplicationState> {
        Arc::clone(self)
    }
}
