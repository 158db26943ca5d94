use std::future::Future;

/// The capability set a backing store must expose to be connected with backoff.
///
/// Implementations are cheap wrappers around a client or pool factory for one
/// kind of store (key-value, relational). The connection they produce is
/// shared by every request, so it must be safe for concurrent use on its own.
pub trait Connector: Send + Sync + 'static {
    /// Pooled connection handed out once the liveness check passes.
    type Connection: Send + Sync + 'static;

    /// Error produced by the store client.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Human-readable target for logs. Must not contain credentials.
    fn target(&self) -> &str;

    /// Opens (or builds) the pooled connection.
    fn open(&self) -> impl Future<Output = Result<Self::Connection, Self::Error>> + Send;

    /// Runs a minimal round trip proving the connection is usable.
    fn ping(&self, connection: &Self::Connection)
    -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Releases pooled resources. Called at most once per connection.
    ///
    /// Anything not released here is freed when the connection is dropped.
    fn close(&self, connection: &Self::Connection) -> impl Future<Output = ()> + Send;
}
