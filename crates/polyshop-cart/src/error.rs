use std::time::Duration;

/// Failures talking to the backing hash store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The call did not complete within the per-call timeout.
    #[error("store call timed out after {0:?}")]
    Timeout(Duration),

    /// The store could not be reached or the connection dropped.
    #[error("store unavailable")]
    Unavailable,

    /// The store answered with an error.
    #[error("store error: {0}")]
    Backend(String),
}

/// Errors returned by [`CartAccumulator`](crate::CartAccumulator) operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CartError {
    /// Quantity was zero or negative. Nothing was written.
    #[error("quantity must be positive, got {0}")]
    InvalidQuantity(i64),

    /// The user id was empty.
    #[error("user id must not be empty")]
    EmptyUserId,

    /// The store call failed. Not retried.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl CartError {
    /// True for caller mistakes, as opposed to store trouble.
    pub fn is_client_error(&self) -> bool {
        matches!(self, CartError::InvalidQuantity(_) | CartError::EmptyUserId)
    }
}
