use super::FlakyConnector;
use polyshop_reconnect::{ConnectionState, Connector, PingError, ReconnectConfig, connect};
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

async fn established(connector: FlakyConnector) -> polyshop_reconnect::Handle<FlakyConnector> {
    let config = ReconnectConfig::builder()
        .ping_timeout(Duration::from_secs(2))
        .build();
    connect(connector, config, &CancellationToken::new())
        .await
        .unwrap()
}

#[tokio::test(start_paused = true)]
async fn ping_reflects_store_reachability() {
    let connector = FlakyConnector::refusing(0);
    let handle = established(connector.clone()).await;

    assert!(handle.ping().await.is_ok());
    connector.set_fail_ping(true);
    assert!(matches!(handle.ping().await, Err(PingError::Store(_))));
    assert!(!handle.is_alive().await);
}

#[tokio::test(start_paused = true)]
async fn ping_is_bounded_by_its_own_timeout() {
    let connector = FlakyConnector::refusing(0);
    let handle = established(connector.clone()).await;
    connector.set_hang_ping(true);

    let start = tokio::time::Instant::now();
    let result = handle.ping().await;

    assert!(matches!(result, Err(PingError::Timeout(d)) if d == Duration::from_secs(2)));
    assert!(start.elapsed() >= Duration::from_secs(2));
    assert!(start.elapsed() < Duration::from_secs(3));
}

#[tokio::test(start_paused = true)]
async fn close_is_idempotent_across_clones() {
    let connector = FlakyConnector::refusing(0);
    let handle = established(connector.clone()).await;
    let other = handle.clone();

    handle.close().await;
    other.close().await;
    handle.close().await;

    assert_eq!(connector.closes(), 1);
    assert!(other.is_closed());
    assert_eq!(handle.state(), ConnectionState::Disconnected);
    assert!(matches!(other.ping().await, Err(PingError::Closed)));
}

#[tokio::test(start_paused = true)]
async fn concurrent_pings_share_one_handle() {
    let handle = established(FlakyConnector::refusing(0)).await;

    let pings = (0..16).map(|_| {
        let handle = handle.clone();
        tokio::spawn(async move { handle.ping().await.is_ok() })
    });
    for ping in futures::future::join_all(pings).await {
        assert!(ping.unwrap());
    }
}

/// Connection that counts itself while alive, like a socket held by a
/// multiplexed client with no explicit shutdown.
struct Socket(Arc<AtomicU32>);

impl Drop for Socket {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[derive(Default)]
struct SocketConnector {
    open_sockets: Arc<AtomicU32>,
}

impl Connector for SocketConnector {
    type Connection = Socket;
    type Error = io::Error;

    fn target(&self) -> &str {
        "socket:6379"
    }

    async fn open(&self) -> Result<Socket, io::Error> {
        self.open_sockets.fetch_add(1, Ordering::SeqCst);
        Ok(Socket(Arc::clone(&self.open_sockets)))
    }

    async fn ping(&self, _connection: &Socket) -> Result<(), io::Error> {
        Ok(())
    }

    async fn close(&self, _connection: &Socket) {}
}

#[tokio::test(start_paused = true)]
async fn connection_is_released_when_last_clone_drops() {
    let connector = SocketConnector::default();
    let open_sockets = Arc::clone(&connector.open_sockets);
    let handle = connect(connector, ReconnectConfig::default(), &CancellationToken::new())
        .await
        .unwrap();
    let other = handle.clone();
    assert_eq!(open_sockets.load(Ordering::SeqCst), 1);

    handle.close().await;
    assert!(matches!(other.ping().await, Err(PingError::Closed)));
    assert_eq!(open_sockets.load(Ordering::SeqCst), 1);

    drop(handle);
    assert_eq!(open_sockets.load(Ordering::SeqCst), 1);
    drop(other);
    assert_eq!(open_sockets.load(Ordering::SeqCst), 0);
}
