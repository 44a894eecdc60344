//! # Token Sync Service
//!
//! Store driver: bootstraps, then folds events strictly in arrival order,
//! persisting and publishing every new snapshot.
//!
//! ```text
//! EventSource ──next_event──→ reduce ──Applied──→ SnapshotStore::save
//!                                │                watch::Sender (readers)
//!                                └─other──→ counted, nothing published
//! ```

use super::bootstrap::{initial_state, resolve_token_address};
use super::context::SyncContext;
use super::reducer::{reduce, FoldOutcome};
use crate::config::TokenSyncConfig;
use crate::domain::{Address, ApplicationState, RetryError, SyncError};
use crate::events::EventEnvelope;
use crate::ports::{
    EventSource, SnapshotStore, TokenContract, TokenManagerContract, TokenProjectionApi,
};
use crate::retry::{shutdown_requested, RetryScheduler};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Counters for folded events.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FoldStats {
    /// Events that produced a snapshot.
    pub applied: u64,
    /// Events that did not concern this projection.
    pub passed_through: u64,
    /// Events that could not be applied.
    pub skipped: u64,
}

impl FoldStats {
    /// Count one outcome.
    pub fn record(&mut self, outcome: FoldOutcome) {
        match outcome {
            FoldOutcome::Applied => self.applied += 1,
            FoldOutcome::PassedThrough => self.passed_through += 1,
            FoldOutcome::Skipped => self.skipped += 1,
        }
    }

    /// Total events seen.
    pub fn total(&self) -> u64 {
        self.applied + self.passed_through + self.skipped
    }
}

/// Read handle over the latest published snapshot.
#[derive(Clone)]
pub struct ProjectionReader {
    receiver: watch::Receiver<Arc<ApplicationState>>,
}

impl TokenProjectionApi for ProjectionReader {
    fn snapshot(&self) -> Arc<ApplicationState> {
        self.receiver.borrow().clone()
    }
}

/// Token Sync Service - owns the state and the fold loop.
pub struct TokenSyncService<S: SnapshotStore> {
    ctx: SyncContext,
    store: Arc<S>,
    state: Arc<ApplicationState>,
    publisher: watch::Sender<Arc<ApplicationState>>,
    shutdown: watch::Receiver<bool>,
    identity_label: Option<String>,
    stats: FoldStats,
}

impl<S: SnapshotStore> TokenSyncService<S> {
    /// Resolve the token, rehydrate from `store` and publish the initial state.
    ///
    /// `connect_token` builds the token client once its address is known.
    pub async fn start<C>(
        config: TokenSyncConfig,
        manager: Arc<dyn TokenManagerContract>,
        connect_token: C,
        store: Arc<S>,
        shutdown: watch::Receiver<bool>,
    ) -> Result<Self, SyncError>
    where
        C: FnOnce(Address) -> Arc<dyn TokenContract>,
    {
        config.validate()?;

        let bootstrap_retry =
            RetryScheduler::with_shutdown(config.bootstrap_retry.clone(), shutdown.clone());
        let token_address = resolve_token_address(manager.as_ref(), &bootstrap_retry).await?;

        let ctx = SyncContext::new(
            token_address,
            connect_token(token_address),
            manager,
            &config,
            Some(shutdown.clone()),
        );

        let cached = match store.load().await {
            Ok(cached) => cached,
            Err(err) => {
                warn!(error = %err, "Failed to load cached state, starting cold");
                None
            }
        };
        let rehydrated = cached.is_some();

        let outcome = initial_state(&ctx, cached).await?;
        info!(
            token = %token_address,
            manager = %ctx.contracts.manager,
            rehydrated,
            holders = outcome.state.holders.len(),
            "Token sync bootstrapped"
        );

        let state = Arc::new(outcome.state);
        let (publisher, _) = watch::channel(Arc::clone(&state));
        let service = Self {
            ctx,
            store,
            state,
            publisher,
            shutdown,
            identity_label: outcome.identity_label,
            stats: FoldStats::default(),
        };
        service.persist().await;
        Ok(service)
    }

    /// Fold one envelope.
    pub async fn apply(&mut self, envelope: &EventEnvelope) -> Result<FoldOutcome, SyncError> {
        let reduction = reduce(&self.ctx, Arc::clone(&self.state), envelope).await?;
        self.stats.record(reduction.outcome);

        if reduction.outcome == FoldOutcome::Applied {
            self.state = reduction.state;
            self.publisher.send_replace(Arc::clone(&self.state));
            self.persist().await;
        }
        Ok(reduction.outcome)
    }

    /// Fold events until the source closes or shutdown is requested.
    pub async fn run<E: EventSource>(&mut self, source: &mut E) -> Result<FoldStats, SyncError> {
        self.run_with(source, |_| {}).await
    }

    /// Like [`run`](Self::run), reporting every outcome to `on_fold`.
    pub async fn run_with<E, F>(
        &mut self,
        source: &mut E,
        mut on_fold: F,
    ) -> Result<FoldStats, SyncError>
    where
        E: EventSource,
        F: FnMut(FoldOutcome) + Send,
    {
        let mut shutdown = self.shutdown.clone();
        loop {
            let envelope = tokio::select! {
                biased;
                () = shutdown_requested(&mut shutdown) => {
                    info!("Shutdown requested, stopping event fold");
                    break;
                }
                next = source.next_event() => match next {
                    Some(envelope) => envelope,
                    None => {
                        info!("Event source closed");
                        break;
                    }
                },
            };

            match self.apply(&envelope).await {
                Ok(outcome) => on_fold(outcome),
                Err(SyncError::VestingUnavailable {
                    source: RetryError::Cancelled { .. },
                    ..
                }) => {
                    info!("Vesting lookup cancelled by shutdown");
                    break;
                }
                Err(err) => return Err(err),
            }
        }
        debug!(stats = ?self.stats, "Event fold finished");
        Ok(self.stats)
    }

    /// Subscribe to every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<Arc<ApplicationState>> {
        self.publisher.subscribe()
    }

    /// Query handle over published snapshots.
    pub fn reader(&self) -> ProjectionReader {
        ProjectionReader {
            receiver: self.subscribe(),
        }
    }

    /// Current state.
    pub fn state(&self) -> Arc<ApplicationState> {
        Arc::clone(&self.state)
    }

    /// Token symbol read at bootstrap.
    pub fn identity_label(&self) -> Option<&str> {
        self.identity_label.as_deref()
    }

    /// Folded event counters.
    pub fn stats(&self) -> FoldStats {
        self.stats
    }

    /// Context shared with the reducer.
    pub fn context(&self) -> &SyncContext {
        &self.ctx
    }

    async fn persist(&self) {
        if let Err(err) = self.store.save(&self.state).await {
            warn!(version = self.state.version, error = %err, "Failed to persist state snapshot");
        }
    }
}
