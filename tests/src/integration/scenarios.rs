//! # Fold Scenarios
//!
//! Event sequences folded through [`TokenSyncService`] with mock contracts.
//!
//! [`TokenSyncService`]: token_projection::TokenSyncService

#[cfg(test)]
mod tests {
    use super::super::harness::{addr, Harness, MANAGER, TOKEN};
    use std::sync::Arc;
    use token_projection::application::reduce;
    use token_projection::{
        ApplicationState, EventEnvelope, FoldOutcome, RawVesting, SyncStatus,
        TokenProjectionApi, TokenSyncConfig, U256,
    };

    fn vesting(amount: u64, start_secs: u64) -> RawVesting {
        RawVesting {
            amount: U256::from(amount),
            start: start_secs,
            cliff: start_secs + 3_600,
            vesting: start_secs + 86_400,
            revokable: false,
        }
    }

    // =============================================================================
    // SYNC + TRANSFER SCENARIO
    // =============================================================================

    #[tokio::test]
    async fn test_sync_start_then_transfer_from_empty_state() {
        let harness = Harness::new();
        let (a, b) = (addr(0x0A), addr(0x0B));
        harness.token.set_account(a, 0u64, 0u64, 0u64);
        harness.token.set_account(b, 10u64, 40u64, 0u64);
        harness.token.set_total_supply(1_000u64);
        let service = harness.start(TokenSyncConfig::for_testing()).await.unwrap();
        let ctx = service.context();

        let state = Arc::new(ApplicationState::default());
        let syncing = reduce(ctx, state, &EventEnvelope::sync_status(SyncStatus::Syncing))
            .await
            .unwrap();
        assert!(syncing.state.is_syncing);

        let after = reduce(ctx, syncing.state, &EventEnvelope::transfer(TOKEN, a, b))
            .await
            .unwrap()
            .state;

        assert_eq!(after.holders.len(), 2);
        assert_eq!(after.holder(&a).unwrap().shares, U256::zero());
        assert_eq!(after.holder(&b).unwrap().shares, U256::from(10));
        assert_eq!(after.balance_of(&a), U256::zero());
        assert_eq!(after.balance_of(&b), U256::from(40));
        assert_eq!(after.balances.len(), 2);
        assert_eq!(after.token_supply, Some(U256::from(1_000)));
    }

    // =============================================================================
    // IDEMPOTENCE + FILTERING
    // =============================================================================

    #[tokio::test]
    async fn test_unrelated_contract_leaves_snapshot_reference_equal() {
        let harness = Harness::new();
        let mut service = harness.start(TokenSyncConfig::for_testing()).await.unwrap();
        let before = service.state();

        let outcome = service
            .apply(&EventEnvelope::transfer(addr(0x42), addr(1), addr(2)))
            .await
            .unwrap();

        assert_eq!(outcome, FoldOutcome::PassedThrough);
        assert!(Arc::ptr_eq(&before, &service.state()));
        assert_eq!(harness.token.calls("shares"), 0);
    }

    #[tokio::test]
    async fn test_claimed_tokens_for_other_asset_changes_nothing() {
        let harness = Harness::new();
        let mut service = harness.start(TokenSyncConfig::for_testing()).await.unwrap();
        let before = service.state();

        let claimed = EventEnvelope::new(TOKEN, "ClaimedTokens")
            .with_address("_token", addr(0x99))
            .with_address("_controller", addr(3));
        service.apply(&claimed).await.unwrap();

        assert!(Arc::ptr_eq(&before, &service.state()));
    }

    #[tokio::test]
    async fn test_claimed_tokens_for_watched_token_refreshes_controller() {
        let harness = Harness::new();
        harness.token.set_account(addr(3), 5u64, 5u64, 0u64);
        let mut service = harness.start(TokenSyncConfig::for_testing()).await.unwrap();

        let claimed = EventEnvelope::new(TOKEN, "ClaimedTokens")
            .with_address("_token", TOKEN)
            .with_address("_controller", addr(3));
        let outcome = service.apply(&claimed).await.unwrap();

        assert_eq!(outcome, FoldOutcome::Applied);
        assert_eq!(service.state().balance_of(&addr(3)), U256::from(5));
    }

    // =============================================================================
    // MERGE SEMANTICS
    // =============================================================================

    #[tokio::test]
    async fn test_second_transfer_replaces_balance() {
        let harness = Harness::new();
        let mut service = harness.start(TokenSyncConfig::for_testing()).await.unwrap();

        harness.token.set_account(addr(2), 30u64, 30u64, 0u64);
        service
            .apply(&EventEnvelope::transfer(TOKEN, addr(1), addr(2)))
            .await
            .unwrap();

        harness.token.set_account(addr(2), 45u64, 45u64, 0u64);
        service
            .apply(&EventEnvelope::transfer(TOKEN, addr(3), addr(2)))
            .await
            .unwrap();

        let state = service.state();
        assert_eq!(state.balance_of(&addr(2)), U256::from(45));
        assert_eq!(state.holder(&addr(2)).unwrap().shares, U256::from(45));
        assert_eq!(state.holders.len(), 3);
    }

    #[tokio::test]
    async fn test_mixed_case_addresses_share_one_holder() {
        let harness = Harness::new();
        let mut service = harness.start(TokenSyncConfig::for_testing()).await.unwrap();

        for (from, to) in [
            ("0xABABABABABABABABABABABABABABABABABABABAB", "0x0101010101010101010101010101010101010101"),
            ("0xabababababababababababababababababababab", "0x0101010101010101010101010101010101010101"),
        ] {
            let envelope = EventEnvelope::new(TOKEN, "Transfer")
                .with_arg("_from", from)
                .with_arg("_to", to);
            service.apply(&envelope).await.unwrap();
        }

        assert_eq!(service.state().holders.len(), 2);
    }

    #[tokio::test]
    async fn test_delegate_and_undelegate_refresh_delegations() {
        let harness = Harness::new();
        let mut service = harness.start(TokenSyncConfig::for_testing()).await.unwrap();
        let reader = service.reader();
        let supply_reads = harness.token.calls("totalSupply");

        harness.token.set_account(addr(2), 0u64, 0u64, 70u64);
        let delegate = EventEnvelope::new(TOKEN, "Delegate")
            .with_address("_owner", addr(1))
            .with_address("_delegate", addr(2));
        service.apply(&delegate).await.unwrap();
        assert_eq!(reader.snapshot().delegated_to(&addr(2)), U256::from(70));

        harness.token.set_account(addr(2), 0u64, 0u64, 0u64);
        let undelegate = EventEnvelope::new(TOKEN, "UnDelegate")
            .with_address("_owner", addr(1))
            .with_address("_delegate", addr(2));
        service.apply(&undelegate).await.unwrap();
        assert_eq!(reader.snapshot().delegated_to(&addr(2)), U256::zero());
        assert_eq!(harness.token.calls("totalSupply"), supply_reads);
    }

    #[tokio::test]
    async fn test_vesting_merges_by_id() {
        let harness = Harness::new();
        let receiver = addr(7);
        harness.manager.set_vesting(receiver, 0, vesting(100, 1_000));
        let mut service = harness.start(TokenSyncConfig::for_testing()).await.unwrap();

        service
            .apply(&EventEnvelope::new_vesting(MANAGER, receiver, 0))
            .await
            .unwrap();

        harness.manager.set_vesting(receiver, 0, vesting(150, 2_000));
        service
            .apply(&EventEnvelope::new_vesting(MANAGER, receiver, 0))
            .await
            .unwrap();
        let vestings = service.reader().vestings_for(&receiver);
        assert_eq!(vestings.len(), 1);
        assert_eq!(vestings[0].amount, U256::from(150));
        assert_eq!(vestings[0].start, 2_000_000);

        harness.manager.set_vesting(receiver, 1, vesting(50, 3_000));
        service
            .apply(&EventEnvelope::new_vesting(MANAGER, receiver, 1))
            .await
            .unwrap();
        let ids: Vec<u64> = service
            .reader()
            .vestings_for(&receiver)
            .iter()
            .map(|v| v.id)
            .collect();
        assert_eq!(ids, vec![0, 1]);
    }

    // =============================================================================
    // FAILURE POLICY
    // =============================================================================

    #[tokio::test]
    async fn test_failed_read_keeps_previous_snapshot() {
        let harness = Harness::new();
        harness.token.set_account(addr(1), 10u64, 10u64, 0u64);
        let mut service = harness.start(TokenSyncConfig::for_testing()).await.unwrap();
        service
            .apply(&EventEnvelope::transfer(TOKEN, addr(1), addr(2)))
            .await
            .unwrap();
        let before = service.state();

        harness.token.set_account(addr(1), 99u64, 99u64, 0u64);
        harness.token.fail("totalSupply");
        let outcome = service
            .apply(&EventEnvelope::transfer(TOKEN, addr(1), addr(2)))
            .await
            .unwrap();

        assert_eq!(outcome, FoldOutcome::Skipped);
        assert!(Arc::ptr_eq(&before, &service.state()));
        assert_eq!(service.state().balance_of(&addr(1)), U256::from(10));
        assert_eq!(service.stats().skipped, 1);
    }

    #[tokio::test]
    async fn test_holder_rows_and_cap() {
        let harness = Harness::new();
        harness
            .manager
            .set_max_account_tokens(Some(U256::from(50)));
        harness.token.set_account(addr(1), 60u64, 60u64, 0u64);
        harness.token.set_account(addr(2), 10u64, 10u64, 5u64);
        let mut service = harness.start(TokenSyncConfig::for_testing()).await.unwrap();
        service
            .apply(&EventEnvelope::transfer(TOKEN, addr(1), addr(2)))
            .await
            .unwrap();

        let reader = service.reader();
        let rows = reader.holder_rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].delegated, U256::from(5));
        assert!(!reader.can_assign(&addr(1)));
        assert!(reader.can_assign(&addr(2)));
        assert!(reader.can_assign(&addr(9)));
    }
}
