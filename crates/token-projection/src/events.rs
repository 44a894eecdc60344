//! # Event Schema
//!
//! Inbound envelopes as delivered by the store driver, and the closed set of
//! typed events the reducer understands.
//!
//! ## Envelope (wire format)
//!
//! ```json
//! { "address": "0x…", "event": "Transfer", "returnValues": { "_from": "0x…", "_to": "0x…" } }
//! ```
//!
//! Two reserved names, [`SYNC_STATUS_SYNCING`] and [`SYNC_STATUS_SYNCED`],
//! carry no address and only toggle `is_syncing`.
//!
//! ## Typed events
//!
//! | Source | Event | Payload |
//! |--------|-------|---------|
//! | token | `ClaimedTokens` | `_token`, `_controller` |
//! | token | `Transfer` | `_from`, `_to` |
//! | token | `Delegate` / `UnDelegate` | `_owner`, `_delegate` |
//! | token manager | `NewVesting` | `receiver`, `vestingId` |

use crate::domain::Address;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Pseudo-event: the store driver started replaying history.
pub const SYNC_STATUS_SYNCING: &str = "SYNC_STATUS_SYNCING";

/// Pseudo-event: the store driver caught up with the chain head.
pub const SYNC_STATUS_SYNCED: &str = "SYNC_STATUS_SYNCED";

/// Event envelope as emitted by the store driver.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventEnvelope {
    /// Emitting contract; absent for sync pseudo-events.
    #[serde(default)]
    pub address: Option<Address>,
    /// Event name.
    pub event: String,
    /// Decoded event arguments.
    #[serde(default)]
    pub return_values: Map<String, Value>,
}

impl EventEnvelope {
    /// Envelope for a contract event with no arguments yet.
    pub fn new(address: Address, event: impl Into<String>) -> Self {
        Self {
            address: Some(address),
            event: event.into(),
            return_values: Map::new(),
        }
    }

    /// Sync status pseudo-event.
    pub fn sync_status(status: SyncStatus) -> Self {
        let name = match status {
            SyncStatus::Syncing => SYNC_STATUS_SYNCING,
            SyncStatus::Synced => SYNC_STATUS_SYNCED,
        };
        Self {
            address: None,
            event: name.to_string(),
            return_values: Map::new(),
        }
    }

    /// Builder method to add an argument.
    pub fn with_arg(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.return_values.insert(name.to_string(), value.into());
        self
    }

    /// Builder method to add an address argument in canonical form.
    pub fn with_address(self, name: &str, address: Address) -> Self {
        self.with_arg(name, address.to_hex())
    }

    /// Transfer from `from` to `to`.
    pub fn transfer(token: Address, from: Address, to: Address) -> Self {
        Self::new(token, "Transfer")
            .with_address("_from", from)
            .with_address("_to", to)
    }

    /// NewVesting for `receiver`.
    pub fn new_vesting(manager: Address, receiver: Address, vesting_id: u64) -> Self {
        Self::new(manager, "NewVesting")
            .with_address("receiver", receiver)
            .with_arg("vestingId", vesting_id.to_string())
    }
}

/// Sync lifecycle reported by the store driver.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncStatus {
    /// Replaying history.
    Syncing,
    /// Caught up.
    Synced,
}

impl SyncStatus {
    /// Value for `ApplicationState::is_syncing`.
    pub fn is_syncing(self) -> bool {
        matches!(self, Self::Syncing)
    }
}

/// Events emitted by the token contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenEvent {
    /// Tokens recovered from the token contract by its controller.
    ClaimedTokens {
        /// Recovered asset (already checked to be the watched token)
        token: Address,
        /// Controller receiving the funds
        controller: Address,
    },
    /// Balance moved between two holders (may mint or burn).
    Transfer {
        /// Sender
        from: Address,
        /// Recipient
        to: Address,
    },
    /// Voting power delegated.
    Delegate {
        /// Delegating holder
        owner: Address,
        /// Delegate
        delegate: Address,
    },
    /// Delegation withdrawn.
    UnDelegate {
        /// Delegating holder
        owner: Address,
        /// Former delegate
        delegate: Address,
    },
}

impl TokenEvent {
    /// Event name as emitted on-chain.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ClaimedTokens { .. } => "ClaimedTokens",
            Self::Transfer { .. } => "Transfer",
            Self::Delegate { .. } => "Delegate",
            Self::UnDelegate { .. } => "UnDelegate",
        }
    }

    /// The two addresses whose reads must be refreshed.
    pub fn parties(&self) -> [Address; 2] {
        match *self {
            Self::ClaimedTokens { token, controller } => [token, controller],
            Self::Transfer { from, to } => [from, to],
            Self::Delegate { owner, delegate } | Self::UnDelegate { owner, delegate } => {
                [owner, delegate]
            }
        }
    }

    /// Whether total supply may have changed.
    pub fn refreshes_supply(&self) -> bool {
        matches!(self, Self::Transfer { .. })
    }
}

/// Events emitted by the token manager.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ManagerEvent {
    /// A vesting was assigned; details must be fetched by id.
    NewVesting {
        /// Vesting receiver
        receiver: Address,
        /// Vesting id
        vesting_id: u64,
    },
}

/// A classified event ready for the reducer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncEvent {
    /// Sync lifecycle pseudo-event.
    Status(SyncStatus),
    /// Token contract event.
    Token(TokenEvent),
    /// Token manager event.
    Manager(ManagerEvent),
}
