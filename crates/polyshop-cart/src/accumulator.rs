use crate::config::CartConfig;
use crate::error::{CartError, StoreError};
use crate::events::CartEvent;
use crate::store::HashStore;
use std::collections::HashMap;
use std::future::Future;
use std::time::Instant;

#[cfg(feature = "metrics")]
use metrics::counter;

/// Store key holding the cart of `user_id`.
pub fn cart_key(user_id: &str) -> String {
    format!("cart:{user_id}")
}

/// Per-user product quantities on top of a [`HashStore`].
///
/// Every operation makes at most one store call, bounded by the configured
/// call timeout. Nothing is retried.
#[derive(Debug)]
pub struct CartAccumulator<S> {
    store: S,
    config: CartConfig,
}

impl<S: HashStore> CartAccumulator<S> {
    /// Wraps `store`. The accumulator owns it and closes it in [`close`](Self::close).
    pub fn new(store: S, config: CartConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &CartConfig {
        &self.config
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Atomically adds `quantity` of `product_id` to the cart and returns
    /// the new quantity for that product.
    ///
    /// A non-positive quantity is rejected before the store is touched.
    pub async fn increment(
        &self,
        user_id: &str,
        product_id: &str,
        quantity: i64,
    ) -> Result<i64, CartError> {
        check_user(user_id)?;
        if quantity <= 0 {
            return Err(CartError::InvalidQuantity(quantity));
        }

        let key = cart_key(user_id);
        let total = self
            .call(self.store.hash_increment(&key, product_id, quantity))
            .await?;

        tracing::debug!(user_id, product_id, quantity, total, "cart entry incremented");
        self.emit(CartEvent::Increment {
            source: self.config.name.clone(),
            timestamp: Instant::now(),
            user_id: user_id.to_string(),
            product_id: product_id.to_string(),
            quantity,
            total,
        });

        #[cfg(feature = "metrics")]
        counter!("cart_increments_total", "cart" => self.config.name.clone()).increment(1);

        Ok(total)
    }

    /// All valid entries of the cart. Empty for a user never seen.
    ///
    /// Entries whose stored value is not a positive integer are logged and
    /// left out; the rest of the cart is still returned.
    pub async fn get_cart(&self, user_id: &str) -> Result<HashMap<String, u64>, CartError> {
        check_user(user_id)?;
        let raw = self.call(self.store.hash_get_all(&cart_key(user_id))).await?;

        let mut items = HashMap::with_capacity(raw.len());
        for (product_id, value) in raw {
            match parse_quantity(&value) {
                Some(quantity) => {
                    items.insert(product_id, quantity);
                }
                None => self.skip_corrupt(user_id, product_id, value),
            }
        }

        self.emit(CartEvent::Read {
            source: self.config.name.clone(),
            timestamp: Instant::now(),
            user_id: user_id.to_string(),
            items: items.len(),
        });
        Ok(items)
    }

    /// Removes the whole cart in one store operation. Clearing an empty
    /// cart succeeds.
    pub async fn clear_cart(&self, user_id: &str) -> Result<(), CartError> {
        check_user(user_id)?;
        self.call(self.store.delete(&cart_key(user_id))).await?;

        tracing::debug!(user_id, "cart cleared");
        self.emit(CartEvent::Clear {
            source: self.config.name.clone(),
            timestamp: Instant::now(),
            user_id: user_id.to_string(),
        });
        Ok(())
    }

    /// Number of distinct products in the cart, not the sum of quantities.
    pub async fn item_count(&self, user_id: &str) -> Result<u64, CartError> {
        check_user(user_id)?;
        Ok(self.call(self.store.hash_len(&cart_key(user_id))).await?)
    }

    /// Liveness of the underlying store, bounded by the call timeout.
    pub async fn ping(&self) -> Result<(), CartError> {
        Ok(self.call(self.store.ping()).await?)
    }

    /// Releases the store connection.
    pub async fn close(&self) {
        self.store.close().await;
    }

    async fn call<T>(
        &self,
        fut: impl Future<Output = Result<T, StoreError>>,
    ) -> Result<T, StoreError> {
        let timeout = self.config.call_timeout;
        match tokio::time::timeout(timeout, fut).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(
                    cart = %self.config.name,
                    timeout_ms = timeout.as_millis() as u64,
                    "store call timed out"
                );
                Err(StoreError::Timeout(timeout))
            }
        }
    }

    fn skip_corrupt(&self, user_id: &str, product_id: String, raw: String) {
        tracing::warn!(
            user_id,
            product_id = %product_id,
            raw = %raw,
            "skipping cart entry with unparseable quantity"
        );
        self.emit(CartEvent::CorruptEntry {
            source: self.config.name.clone(),
            timestamp: Instant::now(),
            user_id: user_id.to_string(),
            product_id,
            raw,
        });
    }

    fn emit(&self, event: CartEvent) {
        self.config.event_listeners.emit(&event);
    }
}

fn check_user(user_id: &str) -> Result<(), CartError> {
    if user_id.is_empty() {
        return Err(CartError::EmptyUserId);
    }
    Ok(())
}

fn parse_quantity(raw: &str) -> Option<u64> {
    raw.parse::<u64>().ok().filter(|quantity| *quantity > 0)
}
