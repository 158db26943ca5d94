//! Tests for `polyshop-cart` over the in-memory hash store.
//!
//! Test organization:
//! - scenarios.rs: end-to-end operation sequences
//! - concurrency.rs: accumulation under concurrent increments
//! - failures.rs: rejected input, corrupt entries, store outages

mod concurrency;
mod failures;
mod scenarios;

use polyshop_cart::{CartAccumulator, CartConfig, InMemoryHashStore};
use std::sync::Arc;

pub fn cart() -> (Arc<CartAccumulator<InMemoryHashStore>>, InMemoryHashStore) {
    let store = InMemoryHashStore::new();
    let cart = CartAccumulator::new(store.clone(), CartConfig::default());
    (Arc::new(cart), store)
}
