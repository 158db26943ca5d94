//! Product catalog backed by PostgreSQL.
//!
//! [`PgProductRepository`] runs its queries on a pool established by
//! `polyshop-reconnect`; [`InMemoryProductRepository`] serves fixed data
//! for tests and local runs.

mod error;
mod memory;
mod product;
mod repository;

pub use error::CatalogError;
pub use memory::InMemoryProductRepository;
pub use product::Product;
pub use repository::{PgProductRepository, ProductRepository};
