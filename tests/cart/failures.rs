use super::cart;
use polyshop_cart::{CartAccumulator, CartConfig, CartError, InMemoryHashStore, StoreError};
use std::time::Duration;

#[tokio::test]
async fn zero_quantity_on_fresh_user_leaves_cart_empty() {
    let (cart, _) = cart();
    assert_eq!(
        cart.increment("u1", "p1", 0).await,
        Err(CartError::InvalidQuantity(0))
    );
    assert!(cart.get_cart("u1").await.unwrap().is_empty());
}

#[tokio::test]
async fn negative_quantity_leaves_existing_cart_unchanged() {
    let (cart, store) = cart();
    cart.increment("u1", "p1", 3).await.unwrap();
    let before = store.snapshot("cart:u1");

    assert_eq!(
        cart.increment("u1", "p1", -3).await,
        Err(CartError::InvalidQuantity(-3))
    );
    assert_eq!(store.snapshot("cart:u1"), before);
}

#[tokio::test]
async fn corrupt_field_does_not_hide_valid_entries() {
    let (cart, store) = cart();
    cart.increment("u1", "p1", 2).await.unwrap();
    cart.increment("u1", "p2", 4).await.unwrap();
    store.insert_raw("cart:u1", "p3", "not-a-number");
    store.insert_raw("cart:u1", "p4", "0");
    store.insert_raw("cart:u1", "p5", "-1");

    let items = cart.get_cart("u1").await.unwrap();

    assert_eq!(items.len(), 2);
    assert_eq!(items["p1"], 2);
    assert_eq!(items["p2"], 4);
}

#[tokio::test]
async fn store_outage_surfaces_for_every_operation() {
    let (cart, store) = cart();
    store.set_unavailable(true);
    let unavailable = Err(CartError::Store(StoreError::Unavailable));

    assert_eq!(cart.increment("u1", "p1", 1).await.map(|_| ()), unavailable);
    assert_eq!(cart.get_cart("u1").await.map(|_| ()), unavailable);
    assert_eq!(cart.clear_cart("u1").await, unavailable);
    assert_eq!(cart.item_count("u1").await.map(|_| ()), unavailable);
    assert_eq!(store.calls(), 4);
}

#[tokio::test]
async fn recovers_once_store_is_back() {
    let (cart, store) = cart();
    store.set_unavailable(true);
    assert!(cart.increment("u1", "p1", 1).await.is_err());

    store.set_unavailable(false);
    cart.increment("u1", "p1", 1).await.unwrap();
    assert_eq!(cart.get_cart("u1").await.unwrap()["p1"], 1);
}

#[tokio::test(start_paused = true)]
async fn slow_store_fails_with_timeout_instead_of_hanging() {
    let store = InMemoryHashStore::new();
    store.set_latency(Duration::from_secs(30));
    let cart = CartAccumulator::new(
        store,
        CartConfig::builder()
            .call_timeout(Duration::from_secs(3))
            .build(),
    );

    let start = tokio::time::Instant::now();
    let result = cart.increment("u1", "p1", 1).await;

    assert_eq!(
        result,
        Err(CartError::Store(StoreError::Timeout(Duration::from_secs(3))))
    );
    assert!(start.elapsed() < Duration::from_secs(4));
}
