//! Service plumbing for the polyshop `cart-service` and `product-service`
//! binaries: configuration, tracing, HTTP routes, health probes and
//! graceful shutdown.

pub mod cart;
pub mod config;
pub mod health;
pub mod products;
pub mod shutdown;
pub mod telemetry;
