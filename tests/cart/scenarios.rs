use super::cart;
use std::collections::HashMap;

fn items(pairs: &[(&str, u64)]) -> HashMap<String, u64> {
    pairs.iter().map(|(p, q)| (p.to_string(), *q)).collect()
}

#[tokio::test]
async fn accumulate_read_count_and_clear() {
    let (cart, _) = cart();

    cart.increment("u1", "p1", 2).await.unwrap();
    cart.increment("u1", "p1", 3).await.unwrap();
    assert_eq!(cart.get_cart("u1").await.unwrap(), items(&[("p1", 5)]));

    cart.increment("u1", "p2", 1).await.unwrap();
    assert_eq!(
        cart.get_cart("u1").await.unwrap(),
        items(&[("p1", 5), ("p2", 1)])
    );
    assert_eq!(cart.item_count("u1").await.unwrap(), 2);

    cart.clear_cart("u1").await.unwrap();
    assert!(cart.get_cart("u1").await.unwrap().is_empty());
}

#[tokio::test]
async fn untouched_user_has_empty_cart() {
    let (cart, _) = cart();
    assert!(cart.get_cart("never-seen").await.unwrap().is_empty());
    assert_eq!(cart.item_count("never-seen").await.unwrap(), 0);
}

#[tokio::test]
async fn clear_is_idempotent() {
    let (cart, _) = cart();
    cart.increment("u1", "p1", 1).await.unwrap();

    cart.clear_cart("u1").await.unwrap();
    assert!(cart.get_cart("u1").await.unwrap().is_empty());
    cart.clear_cart("u1").await.unwrap();
    assert!(cart.get_cart("u1").await.unwrap().is_empty());
}

#[tokio::test]
async fn carts_are_isolated_per_user() {
    let (cart, store) = cart();
    cart.increment("alice", "p1", 2).await.unwrap();
    cart.increment("bob", "p1", 7).await.unwrap();

    cart.clear_cart("alice").await.unwrap();

    assert!(cart.get_cart("alice").await.unwrap().is_empty());
    assert_eq!(cart.get_cart("bob").await.unwrap(), items(&[("p1", 7)]));
    assert_eq!(store.snapshot("cart:bob")["p1"], "7");
}

#[tokio::test]
async fn item_count_counts_products_not_units() {
    let (cart, _) = cart();
    cart.increment("u1", "p1", 40).await.unwrap();
    cart.increment("u1", "p2", 2).await.unwrap();
    assert_eq!(cart.item_count("u1").await.unwrap(), 2);
}

#[tokio::test]
async fn large_quantities_are_not_capped() {
    let (cart, _) = cart();
    cart.increment("u1", "p1", 1_000_000).await.unwrap();
    cart.increment("u1", "p1", 1_000_000).await.unwrap();
    assert_eq!(cart.get_cart("u1").await.unwrap()["p1"], 2_000_000);
}
