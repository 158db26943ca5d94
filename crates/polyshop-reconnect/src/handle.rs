use crate::connector::Connector;
use crate::error::PingError;
use crate::state::{ConnectState, ConnectionState};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// A live, verified connection to a store.
///
/// Cloning is cheap; every clone refers to the same pooled connection.
/// Requests share one handle without extra locking: the pool underneath is
/// safe for concurrent use.
pub struct Handle<C: Connector> {
    inner: Arc<Inner<C>>,
}

struct Inner<C: Connector> {
    name: String,
    connector: C,
    connection: C::Connection,
    ping_timeout: Duration,
    state: ConnectState,
    closed: AtomicBool,
}

impl<C: Connector> Clone for Handle<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C: Connector> Handle<C> {
    pub(crate) fn new(
        name: String,
        connector: C,
        connection: C::Connection,
        ping_timeout: Duration,
        state: ConnectState,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                name,
                connector,
                connection,
                ping_timeout,
                state,
                closed: AtomicBool::new(false),
            }),
        }
    }

    /// The pooled connection, for store-specific operations.
    pub fn connection(&self) -> &C::Connection {
        &self.inner.connection
    }

    /// Name from the [`ReconnectConfig`](crate::ReconnectConfig).
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Target the connection points at.
    pub fn target(&self) -> &str {
        self.inner.connector.target()
    }

    /// Connection state shared with the [`ReconnectingStore`](crate::ReconnectingStore) that built this handle.
    pub fn state(&self) -> ConnectionState {
        self.inner.state.state()
    }

    /// Attempts it took to establish the connection.
    pub fn attempts(&self) -> u32 {
        self.inner.state.attempts()
    }

    /// Re-verifies liveness, bounded by the ping timeout.
    pub async fn ping(&self) -> Result<(), PingError<C::Error>> {
        if self.is_closed() {
            return Err(PingError::Closed);
        }

        let timeout = self.inner.ping_timeout;
        match tokio::time::timeout(timeout, self.inner.connector.ping(&self.inner.connection)).await
        {
            Ok(Ok(())) => Ok(()),
            Ok(Err(error)) => Err(PingError::Store(error)),
            Err(_) => Err(PingError::Timeout(timeout)),
        }
    }

    /// Convenience wrapper over [`ping`](Self::ping) for health endpoints.
    pub async fn is_alive(&self) -> bool {
        self.ping().await.is_ok()
    }

    /// Returns true once [`close`](Self::close) has run.
    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::Acquire)
    }

    /// Releases pooled resources. Idempotent, and safe to call from any clone.
    ///
    /// After the first call every clone refuses `ping`, and store wrappers
    /// stop issuing commands. What the connector can release eagerly (a
    /// Postgres pool) is closed here. A multiplexed Redis connection has no
    /// explicit shutdown: its socket goes away when the last clone of the
    /// handle is dropped.
    pub async fn close(&self) {
        if self.inner.closed.swap(true, Ordering::AcqRel) {
            return;
        }

        tracing::info!(
            store = %self.inner.name,
            endpoint = %self.inner.connector.target(),
            "closing store connection"
        );
        self.inner.connector.close(&self.inner.connection).await;
        self.inner.state.mark_disconnected();
    }
}

impl<C: Connector> std::fmt::Debug for Handle<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Handle")
            .field("name", &self.inner.name)
            .field("target", &self.inner.connector.target())
            .field("closed", &self.is_closed())
            .finish()
    }
}
