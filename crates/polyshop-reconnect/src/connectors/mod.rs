//! [`Connector`](crate::Connector) implementations for the stores the
//! services depend on. Each one is behind a cargo feature.

#[cfg(feature = "postgres")]
mod postgres;
#[cfg(feature = "redis")]
mod redis;

#[cfg(feature = "postgres")]
pub use self::postgres::{PgConnector, PgPoolSettings};
#[cfg(feature = "redis")]
pub use self::redis::RedisConnector;
