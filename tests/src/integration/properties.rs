//! # Fold Properties
//!
//! Invariants that hold for any sequence of transfers.

#[cfg(test)]
mod tests {
    use super::super::harness::{addr, Harness, TOKEN};
    use proptest::prelude::*;
    use std::collections::{BTreeMap, BTreeSet};
    use token_projection::{Address, EventEnvelope, TokenProjectionApi, TokenSyncConfig, U256};

    /// Sender, recipient, and the recipient's balance after the transfer.
    fn transfer_strategy() -> impl Strategy<Value = (u8, u8, u64)> {
        (1u8..6, 1u8..6, 0u64..1_000_000)
    }

    fn runtime() -> tokio::runtime::Runtime {
        tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .unwrap()
    }

    proptest! {
        #[test]
        fn prop_service_keeps_one_holder_per_address(
            transfers in prop::collection::vec(transfer_strategy(), 1..20)
        ) {
            let (holders, balances, expected) = runtime().block_on(async {
                let harness = Harness::new();
                let mut service = harness.start(TokenSyncConfig::for_testing()).await.unwrap();
                let mut reported: BTreeMap<Address, U256> = BTreeMap::new();
                let mut expected: BTreeMap<Address, U256> = BTreeMap::new();

                for (from, to, amount) in &transfers {
                    harness.token.set_account(addr(*to), *amount, *amount, 0u64);
                    reported.insert(addr(*to), U256::from(*amount));
                    service
                        .apply(&EventEnvelope::transfer(TOKEN, addr(*from), addr(*to)))
                        .await
                        .unwrap();
                    for party in [addr(*from), addr(*to)] {
                        let value = reported.get(&party).copied().unwrap_or_default();
                        expected.insert(party, value);
                    }
                }

                let state = service.state();
                (state.holders.clone(), state.balances.clone(), expected)
            });

            let unique: BTreeSet<Address> = holders.iter().map(|h| h.address).collect();
            prop_assert_eq!(unique.len(), holders.len());
            prop_assert_eq!(balances, expected);
        }

        #[test]
        fn prop_published_version_is_monotonic(
            transfers in prop::collection::vec(transfer_strategy(), 1..20)
        ) {
            let versions = runtime().block_on(async {
                let harness = Harness::new();
                let mut service = harness.start(TokenSyncConfig::for_testing()).await.unwrap();
                let mut versions = vec![service.state().version];

                for (from, to, amount) in &transfers {
                    harness.token.set_account(addr(*to), *amount, *amount, 0u64);
                    service
                        .apply(&EventEnvelope::transfer(TOKEN, addr(*from), addr(*to)))
                        .await
                        .unwrap();
                    versions.push(service.reader().snapshot().version);
                }
                versions
            });

            prop_assert!(versions.windows(2).all(|w| w[1] == w[0] + 1));
        }
    }
}
