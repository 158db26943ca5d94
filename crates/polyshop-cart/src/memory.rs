use crate::error::StoreError;
use crate::store::HashStore;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

type Hashes = HashMap<String, HashMap<String, String>>;

/// In-process [`HashStore`] with the same semantics as a Redis hash.
///
/// Clones share contents, so a test can keep one clone for inspection and
/// fault injection while an accumulator owns another.
#[derive(Clone, Default)]
pub struct InMemoryHashStore {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    hashes: Mutex<Hashes>,
    unavailable: AtomicBool,
    fail_reads: AtomicBool,
    latency_ms: AtomicU64,
    calls: AtomicU64,
    closed: AtomicBool,
}

impl InMemoryHashStore {
    /// An empty, reachable store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes a field verbatim, bypassing increment semantics.
    pub fn insert_raw(&self, key: &str, field: &str, value: &str) {
        self.hashes()
            .entry(key.to_string())
            .or_default()
            .insert(field.to_string(), value.to_string());
    }

    /// Current contents of the hash at `key`.
    pub fn snapshot(&self, key: &str) -> HashMap<String, String> {
        self.hashes().get(key).cloned().unwrap_or_default()
    }

    /// While set, every call fails with [`StoreError::Unavailable`].
    pub fn set_unavailable(&self, unavailable: bool) {
        self.inner.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// While set, only `hash_get_all` fails with [`StoreError::Unavailable`].
    /// Writes keep succeeding.
    pub fn set_fail_reads(&self, fail: bool) {
        self.inner.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Delays every call by `latency`.
    pub fn set_latency(&self, latency: Duration) {
        self.inner
            .latency_ms
            .store(latency.as_millis() as u64, Ordering::SeqCst);
    }

    /// Number of store calls made so far, including failed ones.
    pub fn calls(&self) -> u64 {
        self.inner.calls.load(Ordering::SeqCst)
    }

    /// True once [`HashStore::close`] has been called on any clone.
    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::SeqCst)
    }

    fn hashes(&self) -> MutexGuard<'_, Hashes> {
        self.inner
            .hashes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    async fn enter(&self) -> Result<(), StoreError> {
        self.inner.calls.fetch_add(1, Ordering::SeqCst);
        let latency = self.inner.latency_ms.load(Ordering::SeqCst);
        if latency > 0 {
            tokio::time::sleep(Duration::from_millis(latency)).await;
        }
        if self.inner.unavailable.load(Ordering::SeqCst) || self.is_closed() {
            return Err(StoreError::Unavailable);
        }
        Ok(())
    }
}

impl std::fmt::Debug for InMemoryHashStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryHashStore")
            .field("keys", &self.hashes().len())
            .field("calls", &self.calls())
            .finish()
    }
}

impl HashStore for InMemoryHashStore {
    async fn hash_increment(&self, key: &str, field: &str, delta: i64) -> Result<i64, StoreError> {
        self.enter().await?;
        let mut hashes = self.hashes();
        let hash = hashes.entry(key.to_string()).or_default();
        let current = match hash.get(field) {
            Some(raw) => raw
                .parse::<i64>()
                .map_err(|_| StoreError::Backend("hash value is not an integer".to_string()))?,
            None => 0,
        };
        let next = current.checked_add(delta).ok_or_else(|| {
            StoreError::Backend("increment or decrement would overflow".to_string())
        })?;
        hash.insert(field.to_string(), next.to_string());
        Ok(next)
    }

    async fn hash_get_all(&self, key: &str) -> Result<HashMap<String, String>, StoreError> {
        self.enter().await?;
        if self.inner.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable);
        }
        Ok(self.snapshot(key))
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.enter().await?;
        self.hashes().remove(key);
        Ok(())
    }

    async fn hash_len(&self, key: &str) -> Result<u64, StoreError> {
        self.enter().await?;
        Ok(self.hashes().get(key).map_or(0, |hash| hash.len() as u64))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.enter().await
    }

    async fn close(&self) {
        self.inner.closed.store(true, Ordering::SeqCst);
    }
}
