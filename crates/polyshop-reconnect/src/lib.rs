//! Establishes a verified, pooled connection to an external store before a
//! service starts taking traffic.
//!
//! A [`Connector`] knows how to open a pool for one kind of store and how to
//! run a liveness check against it. [`ReconnectingStore::connect`] drives the
//! connector with bounded exponential backoff and jitter from a
//! [`RetryPolicy`](polyshop_retry::RetryPolicy) until the liveness check
//! passes, the attempts run out, or the caller cancels.
//!
//! # Examples
//!
//! ```rust,no_run
//! # #[cfg(feature = "redis")]
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! use polyshop_reconnect::{ReconnectConfig, ReconnectingStore, connectors::RedisConnector};
//! use polyshop_retry::RetryPolicy;
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//!
//! let config = ReconnectConfig::builder()
//!     .name("cart-redis")
//!     .policy(RetryPolicy::default())
//!     .deadline(Duration::from_secs(30))
//!     .build();
//!
//! let connector = RedisConnector::new("localhost:6379")?;
//! let handle = ReconnectingStore::new(connector, config)
//!     .connect(&CancellationToken::new())
//!     .await?;
//!
//! assert!(handle.is_alive().await);
//! handle.close().await;
//! # Ok(())
//! # }
//! ```

mod config;
mod connector;
mod error;
mod events;
mod handle;
mod state;
mod store;

pub mod connectors;

pub use config::{ReconnectConfig, ReconnectConfigBuilder};
pub use connector::Connector;
pub use error::{AttemptFailure, ConnectError, InvalidTarget, PingError};
pub use events::ConnectEvent;
pub use handle::Handle;
pub use state::{ConnectState, ConnectionState};
pub use store::{ReconnectingStore, connect};

pub use polyshop_retry::{RetryPolicy, compute_delay};
