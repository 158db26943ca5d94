use crate::error::StoreError;
use crate::store::HashStore;
use polyshop_reconnect::connectors::RedisConnector;
use polyshop_reconnect::{Handle, PingError};
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, ErrorKind, RedisError};
use std::collections::HashMap;

/// [`HashStore`] over a Redis connection established by
/// [`ReconnectingStore`](polyshop_reconnect::ReconnectingStore).
///
/// Each call clones the multiplexed [`ConnectionManager`], which is how
/// concurrent requests share one connection without locking.
#[derive(Debug, Clone)]
pub struct RedisHashStore {
    handle: Handle<RedisConnector>,
}

impl RedisHashStore {
    /// Runs cart commands on an established connection.
    pub fn new(handle: Handle<RedisConnector>) -> Self {
        Self { handle }
    }

    /// The handle this store runs on.
    pub fn handle(&self) -> &Handle<RedisConnector> {
        &self.handle
    }

    fn connection(&self) -> Result<ConnectionManager, StoreError> {
        if self.handle.is_closed() {
            return Err(StoreError::Unavailable);
        }
        Ok(self.handle.connection().clone())
    }
}

impl HashStore for RedisHashStore {
    async fn hash_increment(&self, key: &str, field: &str, delta: i64) -> Result<i64, StoreError> {
        let mut conn = self.connection()?;
        Ok(conn.hincr(key, field, delta).await?)
    }

    async fn hash_get_all(&self, key: &str) -> Result<HashMap<String, String>, StoreError> {
        let mut conn = self.connection()?;
        let raw: HashMap<Vec<u8>, Vec<u8>> = conn.hgetall(key).await?;
        Ok(decode_hash(key, raw))
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        let mut conn = self.connection()?;
        let _: u64 = conn.del(key).await?;
        Ok(())
    }

    async fn hash_len(&self, key: &str) -> Result<u64, StoreError> {
        let mut conn = self.connection()?;
        Ok(conn.hlen(key).await?)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.handle.ping().await.map_err(|e| match e {
            PingError::Timeout(d) => StoreError::Timeout(d),
            PingError::Closed => StoreError::Unavailable,
            PingError::Store(e) => StoreError::from(e),
        })
    }

    async fn close(&self) {
        self.handle.close().await;
    }
}

/// Fields that are not UTF-8 cannot name a product and are dropped. Values
/// are decoded lossily and left for the accumulator to reject.
fn decode_hash(key: &str, raw: HashMap<Vec<u8>, Vec<u8>>) -> HashMap<String, String> {
    let mut decoded = HashMap::with_capacity(raw.len());
    for (field, value) in raw {
        match String::from_utf8(field) {
            Ok(field) => {
                decoded.insert(field, String::from_utf8_lossy(&value).into_owned());
            }
            Err(e) => {
                tracing::warn!(
                    key,
                    field = %String::from_utf8_lossy(e.as_bytes()),
                    "skipping hash field with non-UTF-8 name"
                );
            }
        }
    }
    decoded
}

impl From<RedisError> for StoreError {
    fn from(e: RedisError) -> Self {
        if e.kind() == ErrorKind::IoError
            || e.is_connection_dropped()
            || e.is_connection_refusal()
            || e.is_timeout()
        {
            StoreError::Unavailable
        } else {
            StoreError::Backend(e.to_string())
        }
    }
}
