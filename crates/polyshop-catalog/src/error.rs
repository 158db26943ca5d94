/// Errors returned by a [`ProductRepository`](crate::ProductRepository).
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("product {0} not found")]
    NotFound(i32),

    /// The database is unreachable or did not answer the liveness check in time.
    #[error("catalog database unavailable: {0}")]
    Unavailable(String),

    #[error("catalog query failed: {0}")]
    Database(#[from] sqlx::Error),
}
