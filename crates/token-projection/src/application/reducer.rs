//! # State Reducer
//!
//! Folds one event into the projected state.
//!
//! ```text
//! envelope ──normalize──┬─ None / malformed ─→ same Arc (no new snapshot)
//!                       ├─ Status            ─→ is_syncing flipped
//!                       ├─ Token             ─→ re-read both parties (+ supply)
//!                       └─ Manager           ─→ getVesting with retry, upsert
//! ```
//!
//! Balances are never computed from event amounts: every affected address is
//! re-read from the token and the read replaces what was stored. A failed read
//! leaves the state exactly as it was.

use super::context::SyncContext;
use crate::algorithms::normalize;
use crate::config::VestingFailurePolicy;
use crate::domain::{AccountReads, Address, ApplicationState, ContractError, RetryError, SyncError};
use crate::events::{EventEnvelope, ManagerEvent, SyncEvent, SyncStatus, TokenEvent};
use crate::ports::TokenContract;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// How an event was folded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FoldOutcome {
    /// A new snapshot was produced.
    Applied,
    /// Nothing to change: unrelated event, or a sync status already in effect.
    PassedThrough,
    /// The event concerned us but could not be applied.
    Skipped,
}

/// Result of folding one event.
#[derive(Clone, Debug)]
pub struct Reduction {
    /// State after the event; the input `Arc` unless `outcome` is `Applied`.
    pub state: Arc<ApplicationState>,
    /// What happened.
    pub outcome: FoldOutcome,
}

impl Reduction {
    fn applied(state: Arc<ApplicationState>) -> Self {
        Self {
            state,
            outcome: FoldOutcome::Applied,
        }
    }

    fn passed_through(state: Arc<ApplicationState>) -> Self {
        Self {
            state,
            outcome: FoldOutcome::PassedThrough,
        }
    }

    fn skipped(state: Arc<ApplicationState>) -> Self {
        Self {
            state,
            outcome: FoldOutcome::Skipped,
        }
    }
}

/// Fold a raw envelope.
///
/// Envelopes that fail to normalize are logged and leave the state untouched.
pub async fn reduce(
    ctx: &SyncContext,
    state: Arc<ApplicationState>,
    envelope: &EventEnvelope,
) -> Result<Reduction, SyncError> {
    match normalize(envelope, &ctx.contracts) {
        Ok(Some(event)) => apply(ctx, state, event).await,
        Ok(None) => Ok(Reduction::passed_through(state)),
        Err(err) => {
            warn!(event = %envelope.event, error = %err, "Ignoring malformed event");
            Ok(Reduction::skipped(state))
        }
    }
}

/// Fold an already classified event.
pub async fn apply(
    ctx: &SyncContext,
    state: Arc<ApplicationState>,
    event: SyncEvent,
) -> Result<Reduction, SyncError> {
    match event {
        SyncEvent::Status(status) => Ok(set_syncing(state, status)),
        SyncEvent::Token(event) => Ok(refresh_accounts(ctx, state, &event).await),
        SyncEvent::Manager(ManagerEvent::NewVesting {
            receiver,
            vesting_id,
        }) => new_vesting(ctx, state, receiver, vesting_id).await,
    }
}

/// Clone, edit, bump the version.
fn derive(
    state: &ApplicationState,
    edit: impl FnOnce(&mut ApplicationState),
) -> Arc<ApplicationState> {
    let mut next = state.clone();
    edit(&mut next);
    next.version += 1;
    Arc::new(next)
}

fn set_syncing(state: Arc<ApplicationState>, status: SyncStatus) -> Reduction {
    let is_syncing = status.is_syncing();
    if state.is_syncing == is_syncing {
        return Reduction::passed_through(state);
    }
    debug!(is_syncing, "Sync status changed");
    Reduction::applied(derive(&state, |next| next.is_syncing = is_syncing))
}

async fn refresh_accounts(
    ctx: &SyncContext,
    state: Arc<ApplicationState>,
    event: &TokenEvent,
) -> Reduction {
    let token = ctx.token.as_ref();
    let [first, second] = event.parties();

    let reads = if event.refreshes_supply() {
        tokio::try_join!(read_parties(token, first, second), token.total_supply())
            .map(|(accounts, supply)| (accounts, Some(supply)))
    } else {
        read_parties(token, first, second)
            .await
            .map(|accounts| (accounts, None))
    };

    match reads {
        Ok((accounts, supply)) => {
            debug!(event = event.name(), %first, %second, "Refreshed accounts");
            Reduction::applied(derive(&state, |next| {
                next.merge_account_reads(&accounts);
                if let Some(supply) = supply {
                    next.token_supply = Some(supply);
                }
            }))
        }
        Err(err) => {
            error!(
                event = event.name(),
                %first,
                %second,
                error = %err,
                "Failed to refresh accounts, state left unchanged"
            );
            Reduction::skipped(state)
        }
    }
}

async fn read_parties(
    token: &dyn TokenContract,
    first: Address,
    second: Address,
) -> Result<Vec<AccountReads>, ContractError> {
    if first == second {
        return Ok(vec![read_account(token, first).await?]);
    }
    let (a, b) = tokio::try_join!(read_account(token, first), read_account(token, second))?;
    Ok(vec![a, b])
}

async fn read_account(
    token: &dyn TokenContract,
    address: Address,
) -> Result<AccountReads, ContractError> {
    let (shares, balance, delegated) = tokio::try_join!(
        token.shares(address),
        token.delegable_balance(address),
        token.delegated_to(address),
    )?;
    Ok(AccountReads {
        address,
        shares,
        balance,
        delegated,
    })
}

async fn new_vesting(
    ctx: &SyncContext,
    state: Arc<ApplicationState>,
    receiver: Address,
    vesting_id: u64,
) -> Result<Reduction, SyncError> {
    let manager = ctx.manager.as_ref();
    let result = ctx
        .vesting_retry
        .run("getVesting", || manager.get_vesting(receiver, vesting_id))
        .await;

    match result {
        Ok(raw) => {
            let record = raw.into_record(vesting_id);
            debug!(%receiver, vesting_id, "Vesting loaded");
            Ok(Reduction::applied(derive(&state, |next| {
                next.upsert_vesting(receiver, record)
            })))
        }
        Err(source @ RetryError::Exhausted { .. })
            if ctx.vesting_failure_policy == VestingFailurePolicy::SkipAndLog =>
        {
            error!(%receiver, vesting_id, error = %source, "Skipping vesting that could not be loaded");
            Ok(Reduction::skipped(state))
        }
        Err(source) => {
            error!(%receiver, vesting_id, error = %source, "Could not load vesting");
            Err(SyncError::VestingUnavailable {
                receiver,
                vesting_id,
                source,
            })
        }
    }
}
