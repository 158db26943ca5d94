use crate::connector::Connector;
use crate::error::InvalidTarget;
use redis::aio::{ConnectionManager, ConnectionManagerConfig};
use redis::{Client, RedisError};
use std::time::Duration;

/// Opens a multiplexed, auto-reconnecting Redis connection.
///
/// The client's own retry loop is switched off; [`ReconnectingStore`](crate::ReconnectingStore)
/// owns the backoff during startup.
#[derive(Debug, Clone)]
pub struct RedisConnector {
    client: Client,
    target: String,
    connection_timeout: Duration,
    response_timeout: Duration,
}

impl RedisConnector {
    /// Accepts `host:port` or a full `redis://` URL.
    pub fn new(addr: &str) -> Result<Self, InvalidTarget> {
        let addr = addr.trim();
        if addr.is_empty() {
            return Err(InvalidTarget::new(addr, "address is empty"));
        }

        let url = if addr.contains("://") {
            addr.to_string()
        } else {
            format!("redis://{addr}")
        };
        let client = Client::open(url.as_str()).map_err(|e| InvalidTarget::new(addr, e))?;

        Ok(Self {
            client,
            target: addr.to_string(),
            connection_timeout: Duration::from_secs(5),
            response_timeout: Duration::from_secs(3),
        })
    }

    /// Bounds establishing the TCP connection. Default is 5 seconds.
    pub fn connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }

    /// Bounds waiting for a reply to any command. Default is 3 seconds.
    pub fn response_timeout(mut self, timeout: Duration) -> Self {
        self.response_timeout = timeout;
        self
    }
}

impl Connector for RedisConnector {
    type Connection = ConnectionManager;
    type Error = RedisError;

    fn target(&self) -> &str {
        &self.target
    }

    async fn open(&self) -> Result<ConnectionManager, RedisError> {
        let config = ConnectionManagerConfig::new()
            .set_number_of_retries(0)
            .set_connection_timeout(self.connection_timeout)
            .set_response_timeout(self.response_timeout);
        self.client.get_connection_manager_with_config(config).await
    }

    async fn ping(&self, connection: &ConnectionManager) -> Result<(), RedisError> {
        let mut connection = connection.clone();
        let _: String = redis::cmd("PING").query_async(&mut connection).await?;
        Ok(())
    }

    async fn close(&self, _connection: &ConnectionManager) {
        // No shutdown command exists for the manager; the socket closes when the
        // last handle clone drops it.
    }
}
