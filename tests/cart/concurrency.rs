use super::cart;
use futures::future::join_all;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_increments_never_lose_updates() {
    let (cart, _) = cart();

    let tasks = (1..=200i64).map(|q| {
        let cart = cart.clone();
        tokio::spawn(async move { cart.increment("u1", "p1", q).await })
    });
    for result in join_all(tasks).await {
        result.unwrap().unwrap();
    }

    assert_eq!(cart.get_cart("u1").await.unwrap()["p1"], (1..=200u64).sum::<u64>());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_products_all_land() {
    let (cart, _) = cart();

    let tasks = (0..50).map(|i| {
        let cart = cart.clone();
        tokio::spawn(async move { cart.increment("u1", &format!("p{i}"), 1).await })
    });
    for result in join_all(tasks).await {
        result.unwrap().unwrap();
    }

    assert_eq!(cart.item_count("u1").await.unwrap(), 50);
}
