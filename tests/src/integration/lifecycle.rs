//! # Service Lifecycle
//!
//! Bootstrap retries, fatal startup failures, rehydration, vesting failure
//! policies and shutdown.

#[cfg(test)]
mod tests {
    use super::super::harness::{addr, settings, Harness, MANAGER, TOKEN};
    use projection_runtime::adapters::JsonFileSnapshotStore;
    use std::sync::Arc;
    use std::time::Duration;
    use token_projection::{
        ApplicationState, EventEnvelope, InMemorySnapshotStore, RawVesting, RetryError,
        RetryPolicy, SyncError, TokenContract, TokenSyncConfig, TokenSyncService, VecEventSource,
        VestingFailurePolicy, U256,
    };

    fn vesting() -> RawVesting {
        RawVesting {
            amount: U256::from(100),
            start: 1_000,
            cliff: 2_000,
            vesting: 3_000,
            revokable: true,
        }
    }

    // =============================================================================
    // BOOTSTRAP
    // =============================================================================

    #[tokio::test(start_paused = true)]
    async fn test_token_address_retry_is_bounded() {
        let harness = Harness::new();
        harness.manager.fail_token(u32::MAX);

        let err = harness
            .start(TokenSyncConfig::for_testing())
            .await
            .err()
            .unwrap();

        assert!(matches!(
            err,
            SyncError::TokenAddressUnavailable(RetryError::Exhausted { attempts: 4, .. })
        ));
        assert_eq!(harness.manager.calls("token"), 4);
        assert_eq!(harness.token.calls("symbol"), 0);
        assert_eq!(harness.store.save_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_token_address_recovers_within_budget() {
        let harness = Harness::new();
        harness.manager.fail_token(3);

        let service = harness.start(TokenSyncConfig::for_testing()).await.unwrap();

        assert_eq!(harness.manager.calls("token"), 4);
        assert_eq!(service.state().token_address, Some(TOKEN));
    }

    #[tokio::test]
    async fn test_max_account_tokens_failure_aborts_start() {
        let harness = Harness::new();
        harness.manager.set_max_account_tokens(None);

        let err = harness
            .start(TokenSyncConfig::for_testing())
            .await
            .err()
            .unwrap();

        assert!(matches!(err, SyncError::MaxAccountTokensUnavailable(_)));
        assert_eq!(harness.store.save_count(), 0);
    }

    #[tokio::test]
    async fn test_rehydrated_settings_are_not_reloaded() {
        let mut cached = ApplicationState {
            token_address: Some(TOKEN),
            version: 7,
            ..Default::default()
        };
        cached.apply_token_settings(settings());
        cached.upsert_holder(addr(1), U256::from(12));
        let harness = Harness::with_store(InMemorySnapshotStore::with_state(cached));

        let service = harness.start(TokenSyncConfig::for_testing()).await.unwrap();
        let state = service.state();

        assert_eq!(harness.token.calls("name"), 0);
        assert_eq!(harness.token.calls("decimals"), 0);
        assert_eq!(state.holder(&addr(1)).unwrap().shares, U256::from(12));
        assert_eq!(state.version, 8);
        assert!(state.is_syncing);
        assert_eq!(service.identity_label(), Some("GOV"));
    }

    #[tokio::test]
    async fn test_file_store_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.json");
        let harness = Harness::new();
        harness.token.set_account(addr(2), 25u64, 25u64, 0u64);

        let (_tx, shutdown) = tokio::sync::watch::channel(false);
        let token: Arc<dyn TokenContract> = harness.token.clone();
        let mut first = TokenSyncService::start(
            TokenSyncConfig::for_testing(),
            harness.manager.clone(),
            {
                let token = token.clone();
                move |_| token
            },
            Arc::new(JsonFileSnapshotStore::new(&path)),
            shutdown.clone(),
        )
        .await
        .unwrap();
        first
            .apply(&EventEnvelope::transfer(TOKEN, addr(1), addr(2)))
            .await
            .unwrap();
        let saved = first.state();
        drop(first);

        let second = TokenSyncService::start(
            TokenSyncConfig::for_testing(),
            harness.manager.clone(),
            move |_| token,
            Arc::new(JsonFileSnapshotStore::new(&path)),
            shutdown,
        )
        .await
        .unwrap();

        let state = second.state();
        assert_eq!(state.holders, saved.holders);
        assert_eq!(state.balance_of(&addr(2)), U256::from(25));
        assert_eq!(state.version, saved.version + 1);
    }

    // =============================================================================
    // VESTING FAILURE POLICY
    // =============================================================================

    #[tokio::test(start_paused = true)]
    async fn test_vesting_failure_propagates_by_default() {
        let harness = Harness::new();
        harness.manager.fail_vesting(u32::MAX);
        let mut service = harness.start(TokenSyncConfig::for_testing()).await.unwrap();
        let mut source = VecEventSource::new(vec![
            EventEnvelope::new_vesting(MANAGER, addr(7), 0),
            EventEnvelope::transfer(TOKEN, addr(1), addr(2)),
        ]);

        let err = service.run(&mut source).await.unwrap_err();

        assert!(matches!(
            err,
            SyncError::VestingUnavailable {
                vesting_id: 0,
                source: RetryError::Exhausted { attempts: 4, .. },
                ..
            }
        ));
        assert_eq!(harness.manager.calls("getVesting"), 4);
        assert_eq!(harness.token.calls("shares"), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_vesting_failure_can_be_skipped() {
        let harness = Harness::new();
        harness.manager.fail_vesting(u32::MAX);
        let config = TokenSyncConfig {
            vesting_failure_policy: VestingFailurePolicy::SkipAndLog,
            ..TokenSyncConfig::for_testing()
        };
        let mut service = harness.start(config).await.unwrap();
        let mut source = VecEventSource::new(vec![
            EventEnvelope::new_vesting(MANAGER, addr(7), 0),
            EventEnvelope::transfer(TOKEN, addr(1), addr(2)),
        ]);

        let stats = service.run(&mut source).await.unwrap();

        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.applied, 1);
        assert!(service.state().vestings.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_vesting_retry_recovers() {
        let harness = Harness::new();
        harness.manager.fail_vesting(2);
        harness.manager.set_vesting(addr(7), 4, vesting());
        let mut service = harness.start(TokenSyncConfig::for_testing()).await.unwrap();

        service
            .apply(&EventEnvelope::new_vesting(MANAGER, addr(7), 4))
            .await
            .unwrap();

        let state = service.state();
        let records = state.vestings_of(&addr(7));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, 4);
        assert_eq!(records[0].cliff, 2_000_000);
        assert_eq!(harness.manager.calls("getVesting"), 3);
    }

    // =============================================================================
    // SHUTDOWN
    // =============================================================================

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_cancels_vesting_backoff() {
        let harness = Harness::new();
        harness.manager.fail_vesting(u32::MAX);
        let config = TokenSyncConfig {
            vesting_retry: RetryPolicy::new(Duration::from_secs(60), 2, 3),
            ..TokenSyncConfig::for_testing()
        };
        let mut service = harness.start(config).await.unwrap();
        let mut source =
            VecEventSource::new(vec![EventEnvelope::new_vesting(MANAGER, addr(7), 0)]);

        let signal = async {
            tokio::time::sleep(Duration::from_secs(1)).await;
            harness.shutdown.send_replace(true);
        };
        let (result, ()) = tokio::join!(service.run(&mut source), signal);

        let stats = result.unwrap();
        assert_eq!(stats.total(), 0);
        assert_eq!(harness.manager.calls("getVesting"), 1);
    }

    #[tokio::test]
    async fn test_shutdown_before_run_folds_nothing() {
        let harness = Harness::new();
        let mut service = harness.start(TokenSyncConfig::for_testing()).await.unwrap();
        harness.shutdown.send_replace(true);
        let mut source =
            VecEventSource::new(vec![EventEnvelope::transfer(TOKEN, addr(1), addr(2))]);

        let stats = service.run(&mut source).await.unwrap();

        assert_eq!(stats.total(), 0);
        assert_eq!(harness.token.calls("shares"), 0);
    }
}
