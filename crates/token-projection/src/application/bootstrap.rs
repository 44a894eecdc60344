//! # Bootstrap
//!
//! Resolves the watched token and builds the state the fold starts from.
//!
//! | Step | On failure |
//! |------|------------|
//! | `token()` on the manager (with retry) | fatal |
//! | `symbol()` for the identity label | logged, no label |
//! | token settings, unless already cached | logged, cached values kept |
//! | `maxAccountTokens()` | fatal |

use super::context::SyncContext;
use crate::domain::{Address, ApplicationState, ContractError, SyncError, TokenSettings};
use crate::ports::{TokenContract, TokenManagerContract};
use crate::retry::RetryScheduler;
use tracing::{error, info, warn};

/// Initial state plus the label the host should display for this app.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BootstrapOutcome {
    /// State to start folding from.
    pub state: ApplicationState,
    /// Token symbol, when it could be read.
    pub identity_label: Option<String>,
}

/// Ask the manager which token it manages.
pub async fn resolve_token_address(
    manager: &dyn TokenManagerContract,
    retry: &RetryScheduler,
) -> Result<Address, SyncError> {
    match retry.run("token", || manager.token()).await {
        Ok(address) => {
            info!(manager = %manager.address(), token = %address, "Resolved token address");
            Ok(address)
        }
        Err(err) => {
            error!(
                manager = %manager.address(),
                error = %err,
                "Could not start: token manager did not return its token"
            );
            Err(SyncError::TokenAddressUnavailable(err))
        }
    }
}

/// Build the initial state from the cache, if any.
pub async fn initial_state(
    ctx: &SyncContext,
    cached: Option<ApplicationState>,
) -> Result<BootstrapOutcome, SyncError> {
    let token_address = ctx.contracts.token;
    let mut state = match cached {
        Some(cached) if cached.token_address.is_some_and(|addr| addr != token_address) => {
            warn!(
                cached = ?cached.token_address,
                token = %token_address,
                "Cached state belongs to another token, starting cold"
            );
            ApplicationState::default()
        }
        Some(cached) => cached,
        None => ApplicationState::default(),
    };

    let identity_label = match ctx.token.symbol().await {
        Ok(symbol) => Some(symbol),
        Err(err) => {
            warn!(token = %token_address, error = %err, "Failed to load token symbol");
            None
        }
    };

    if !state.has_loaded_token_settings() {
        match load_token_settings(ctx.token.as_ref()).await {
            Ok(settings) => state.apply_token_settings(settings),
            Err(err) => warn!(token = %token_address, error = %err, "Failed to load token settings"),
        }
    }

    let max_account_tokens = ctx.manager.max_account_tokens().await.map_err(|err| {
        error!(error = %err, "Could not load maxAccountTokens");
        SyncError::MaxAccountTokensUnavailable(err)
    })?;

    state.is_syncing = true;
    state.token_address = Some(token_address);
    state.max_account_tokens = max_account_tokens;
    state.version += 1;

    Ok(BootstrapOutcome {
        state,
        identity_label,
    })
}

/// Read every setting or none.
async fn load_token_settings(token: &dyn TokenContract) -> Result<TokenSettings, ContractError> {
    let (name, symbol, decimals, total_supply, transfers_enabled, delegation_enabled) = tokio::try_join!(
        token.name(),
        token.symbol(),
        token.decimals(),
        token.total_supply(),
        token.transfers_enabled(),
        token.delegation_enabled(),
    )?;
    Ok(TokenSettings {
        name,
        symbol,
        decimals,
        total_supply,
        transfers_enabled,
        delegation_enabled,
    })
}
