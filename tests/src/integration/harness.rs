//! Mock contracts plus an in-memory store, wired into a service.

use std::sync::Arc;
use tokio::sync::watch;
use token_projection::{
    Address, InMemorySnapshotStore, MockTokenContract, MockTokenManager, SyncError,
    TokenContract, TokenSettings, TokenSyncConfig, TokenSyncService, U256,
};

/// Watched token.
pub const TOKEN: Address = Address::repeat_byte(0xAA);
/// Token manager.
pub const MANAGER: Address = Address::repeat_byte(0xBB);

/// Address made of one repeated byte.
pub fn addr(byte: u8) -> Address {
    Address::repeat_byte(byte)
}

/// Settings the mock token reports.
pub fn settings() -> TokenSettings {
    TokenSettings {
        name: "Governance Token".to_string(),
        symbol: "GOV".to_string(),
        decimals: 18,
        total_supply: U256::from(1_000),
        transfers_enabled: true,
        delegation_enabled: true,
    }
}

/// Contract doubles and store shared by a test.
pub struct Harness {
    /// Token double.
    pub token: Arc<MockTokenContract>,
    /// Manager double.
    pub manager: Arc<MockTokenManager>,
    /// Snapshot cache.
    pub store: Arc<InMemorySnapshotStore>,
    /// Shutdown signal handed to the service.
    pub shutdown: watch::Sender<bool>,
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}

impl Harness {
    /// Fresh doubles and an empty store.
    pub fn new() -> Self {
        Self::with_store(InMemorySnapshotStore::new())
    }

    /// Fresh doubles over an existing store.
    pub fn with_store(store: InMemorySnapshotStore) -> Self {
        let (shutdown, _) = watch::channel(false);
        Self {
            token: Arc::new(MockTokenContract::with_settings(settings())),
            manager: Arc::new(MockTokenManager::new(MANAGER, TOKEN)),
            store: Arc::new(store),
            shutdown,
        }
    }

    /// Start a service with `config`.
    pub async fn start(
        &self,
        config: TokenSyncConfig,
    ) -> Result<TokenSyncService<InMemorySnapshotStore>, SyncError> {
        let token: Arc<dyn TokenContract> = self.token.clone();
        TokenSyncService::start(
            config,
            self.manager.clone(),
            move |_| token,
            self.store.clone(),
            self.shutdown.subscribe(),
        )
        .await
    }
}
