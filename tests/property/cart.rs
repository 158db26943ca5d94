//! Property tests for cart accumulation.
//!
//! Invariants tested:
//! - Concurrent increments to one entry sum exactly, for any interleaving
//! - Non-positive quantities are rejected and change nothing

use futures::future::join_all;
use polyshop_cart::{CartAccumulator, CartConfig, CartError, InMemoryHashStore};
use proptest::prelude::*;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Builder;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    /// Property: final quantity equals the sum of all applied increments
    #[test]
    fn concurrent_increments_sum_exactly(
        quantities in prop::collection::vec(1i64..=1_000, 1..64),
        pauses in prop::collection::vec(0u64..3, 64),
    ) {
        let rt = Builder::new_multi_thread().worker_threads(4).enable_all().build().unwrap();
        rt.block_on(async {
            let cart = Arc::new(CartAccumulator::new(InMemoryHashStore::new(), CartConfig::default()));

            let tasks = quantities.iter().zip(pauses.iter()).map(|(&q, &pause)| {
                let cart = Arc::clone(&cart);
                tokio::spawn(async move {
                    if pause > 0 {
                        tokio::time::sleep(Duration::from_millis(pause)).await;
                    }
                    cart.increment("u", "p", q).await
                })
            });
            for result in join_all(tasks).await {
                prop_assert!(result.unwrap().is_ok());
            }

            let expected: i64 = quantities.iter().sum();
            let items = cart.get_cart("u").await.unwrap();
            prop_assert_eq!(items.get("p").copied(), Some(expected as u64));
            Ok(())
        })?;
    }

    /// Property: q <= 0 is rejected and the stored cart is byte-for-byte unchanged
    #[test]
    fn non_positive_quantity_is_rejected(
        existing in prop::collection::vec(("[a-z]{1,6}", 1i64..100), 0..8),
        q in i64::MIN..=0,
    ) {
        let rt = Builder::new_current_thread().enable_all().build().unwrap();
        rt.block_on(async {
            let store = InMemoryHashStore::new();
            let cart = CartAccumulator::new(store.clone(), CartConfig::default());
            for (product, quantity) in &existing {
                cart.increment("u", product, *quantity).await.unwrap();
            }
            let before = store.snapshot("cart:u");
            let calls = store.calls();

            let result = cart.increment("u", "target", q).await;

            prop_assert_eq!(result, Err(CartError::InvalidQuantity(q)));
            prop_assert_eq!(store.snapshot("cart:u"), before);
            prop_assert_eq!(store.calls(), calls);
            Ok(())
        })?;
    }
}
