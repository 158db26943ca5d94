use crate::error::StoreError;
use std::collections::HashMap;
use std::future::Future;

/// The store capabilities a cart needs.
///
/// `hash_increment` must be atomic in the store itself. Implementations
/// should be cheap to share across tasks; the accumulator holds one and
/// calls it from every request.
pub trait HashStore: Send + Sync + 'static {
    /// Adds `delta` to `field` in the hash at `key`, creating either if
    /// absent, and returns the new value.
    fn hash_increment(
        &self,
        key: &str,
        field: &str,
        delta: i64,
    ) -> impl Future<Output = Result<i64, StoreError>> + Send;

    /// All fields of the hash at `key`. Empty when the key does not exist.
    fn hash_get_all(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<HashMap<String, String>, StoreError>> + Send;

    /// Removes `key` entirely. Succeeds when it is already gone.
    fn delete(&self, key: &str) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Number of fields in the hash at `key`.
    fn hash_len(&self, key: &str) -> impl Future<Output = Result<u64, StoreError>> + Send;

    /// Liveness check.
    fn ping(&self) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Releases the connection. Idempotent.
    fn close(&self) -> impl Future<Output = ()> + Send;
}
