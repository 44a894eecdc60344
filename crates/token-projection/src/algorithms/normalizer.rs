//! # Event Normalizer
//!
//! Classifies an envelope by emitting contract and event name.
//!
//! ```text
//! SYNC_STATUS_* ─────────────────────────→ Status
//! emitter == token   ─┬─ ClaimedTokens(_token == token) → Token
//!                     ├─ Transfer / Delegate / UnDelegate → Token
//!                     └─ anything else                   → None
//! emitter == manager ─┬─ NewVesting                      → Manager
//!                     └─ anything else                   → None
//! any other emitter  ────────────────────────────────────→ None
//! ```
//!
//! `None` means "pass the state through unchanged"; unknown events are not
//! errors so newer contract versions can add events safely.

use crate::domain::{Address, EventError};
use crate::events::{
    EventEnvelope, ManagerEvent, SyncEvent, SyncStatus, TokenEvent, SYNC_STATUS_SYNCED,
    SYNC_STATUS_SYNCING,
};
use serde_json::Value;

/// The two contracts whose events are folded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WatchedContracts {
    /// Delegable token.
    pub token: Address,
    /// Token manager.
    pub manager: Address,
}

/// Classify `envelope`; `Ok(None)` for events this engine ignores.
pub fn normalize(
    envelope: &EventEnvelope,
    watched: &WatchedContracts,
) -> Result<Option<SyncEvent>, EventError> {
    match envelope.event.as_str() {
        SYNC_STATUS_SYNCING => return Ok(Some(SyncEvent::Status(SyncStatus::Syncing))),
        SYNC_STATUS_SYNCED => return Ok(Some(SyncEvent::Status(SyncStatus::Synced))),
        _ => {}
    }

    let emitter = envelope.address.ok_or_else(|| EventError::MissingEmitter {
        event: envelope.event.clone(),
    })?;

    if emitter == watched.token {
        return Ok(token_event(envelope, watched.token)?.map(SyncEvent::Token));
    }
    if emitter == watched.manager {
        return Ok(manager_event(envelope)?.map(SyncEvent::Manager));
    }
    Ok(None)
}

fn token_event(envelope: &EventEnvelope, token: Address) -> Result<Option<TokenEvent>, EventError> {
    let args = Args(envelope);
    let event = match envelope.event.as_str() {
        "ClaimedTokens" => {
            // Fires for every recovered asset, not only this token.
            let claimed = args.address("_token")?;
            if claimed != token {
                return Ok(None);
            }
            TokenEvent::ClaimedTokens {
                token: claimed,
                controller: args.address("_controller")?,
            }
        }
        "Transfer" => TokenEvent::Transfer {
            from: args.address("_from")?,
            to: args.address("_to")?,
        },
        "Delegate" => TokenEvent::Delegate {
            owner: args.address("_owner")?,
            delegate: args.address("_delegate")?,
        },
        "UnDelegate" => TokenEvent::UnDelegate {
            owner: args.address("_owner")?,
            delegate: args.address("_delegate")?,
        },
        _ => return Ok(None),
    };
    Ok(Some(event))
}

fn manager_event(envelope: &EventEnvelope) -> Result<Option<ManagerEvent>, EventError> {
    let args = Args(envelope);
    match envelope.event.as_str() {
        "NewVesting" => Ok(Some(ManagerEvent::NewVesting {
            receiver: args.address("receiver")?,
            vesting_id: args.unsigned("vestingId")?,
        })),
        _ => Ok(None),
    }
}

/// Typed access to `returnValues`.
struct Args<'a>(&'a EventEnvelope);

impl Args<'_> {
    fn raw(&self, arg: &'static str) -> Result<&Value, EventError> {
        self.0
            .return_values
            .get(arg)
            .ok_or_else(|| EventError::MissingArgument {
                event: self.0.event.clone(),
                arg,
            })
    }

    fn address(&self, arg: &'static str) -> Result<Address, EventError> {
        let value = self.raw(arg)?;
        let text = value.as_str().unwrap_or_default();
        text.parse().map_err(|source| EventError::InvalidAddress {
            event: self.0.event.clone(),
            arg,
            source,
        })
    }

    fn unsigned(&self, arg: &'static str) -> Result<u64, EventError> {
        let value = self.raw(arg)?;
        let parsed = match value {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        };
        parsed.ok_or_else(|| EventError::InvalidNumber {
            event: self.0.event.clone(),
            arg,
            value: value.to_string(),
        })
    }
}
