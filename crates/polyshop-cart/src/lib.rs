//! Per-user cart quantities with race-free accumulation.
//!
//! A cart is a hash stored under `cart:{user_id}` whose fields are product
//! ids and whose values are decimal quantities. [`CartAccumulator`] never
//! reads-modifies-writes: every increment is a single atomic
//! hash-increment in the [`HashStore`], so concurrent requests for the same
//! product never lose an update.
//!
//! Store failures surface as [`CartError::Store`] and are not retried here.
//! Reconnecting is a startup concern handled by `polyshop-reconnect`.
//!
//! # Examples
//!
//! ```
//! use polyshop_cart::{CartAccumulator, CartConfig, InMemoryHashStore};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), polyshop_cart::CartError> {
//! let cart = CartAccumulator::new(InMemoryHashStore::new(), CartConfig::default());
//!
//! cart.increment("u1", "p1", 2).await?;
//! cart.increment("u1", "p1", 3).await?;
//!
//! let items = cart.get_cart("u1").await?;
//! assert_eq!(items.get("p1"), Some(&5));
//! # Ok(())
//! # }
//! ```

mod accumulator;
mod config;
mod error;
mod events;
mod memory;
mod store;

#[cfg(feature = "redis")]
mod redis;

pub use accumulator::{CartAccumulator, cart_key};
pub use config::{CartConfig, CartConfigBuilder};
pub use error::{CartError, StoreError};
pub use events::CartEvent;
pub use memory::InMemoryHashStore;
pub use store::HashStore;

#[cfg(feature = "redis")]
pub use self::redis::RedisHashStore;
