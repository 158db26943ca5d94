//! Connection state tracking for connection establishment.

use std::sync::Arc;
use std::sync::atomic::{AtomicU8, AtomicU32, Ordering};

/// Lifecycle of a store connection.
///
/// `Disconnected -> Connecting -> Connected`, or `Disconnected -> Connecting
/// -> Failed` once the attempts are exhausted. `Failed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// No attempt in flight; also the state while waiting out a backoff delay.
    Disconnected,

    /// An attempt (open plus liveness check) is in flight.
    Connecting,

    /// The liveness check passed.
    Connected,

    /// Attempts exhausted or cancelled.
    Failed,
}

/// Shared, lock-free view of a connection's state and attempt counter.
#[derive(Clone)]
pub struct ConnectState {
    state: Arc<AtomicU8>,
    attempts: Arc<AtomicU32>,
}

impl ConnectState {
    /// Create a new state in [`ConnectionState::Disconnected`].
    pub fn new() -> Self {
        Self {
            state: Arc::new(AtomicU8::new(Self::encode(ConnectionState::Disconnected))),
            attempts: Arc::new(AtomicU32::new(0)),
        }
    }

    /// Get the current connection state.
    pub fn state(&self) -> ConnectionState {
        Self::decode(self.state.load(Ordering::Acquire))
    }

    /// Number of attempts started so far.
    pub fn attempts(&self) -> u32 {
        self.attempts.load(Ordering::Acquire)
    }

    /// Records the start of a new attempt and returns its 1-indexed number.
    pub(crate) fn begin_attempt(&self) -> u32 {
        self.set(ConnectionState::Connecting);
        self.attempts.fetch_add(1, Ordering::AcqRel) + 1
    }

    pub(crate) fn mark_connected(&self) {
        self.set(ConnectionState::Connected);
    }

    pub(crate) fn mark_disconnected(&self) {
        self.set(ConnectionState::Disconnected);
    }

    pub(crate) fn mark_failed(&self) {
        self.set(ConnectionState::Failed);
    }

    fn set(&self, state: ConnectionState) {
        self.state.store(Self::encode(state), Ordering::Release);
    }

    fn encode(state: ConnectionState) -> u8 {
        match state {
            ConnectionState::Disconnected => 0,
            ConnectionState::Connecting => 1,
            ConnectionState::Connected => 2,
            ConnectionState::Failed => 3,
        }
    }

    fn decode(encoded: u8) -> ConnectionState {
        match encoded {
            0 => ConnectionState::Disconnected,
            1 => ConnectionState::Connecting,
            2 => ConnectionState::Connected,
            _ => ConnectionState::Failed,
        }
    }
}

impl Default for ConnectState {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ConnectState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectState")
            .field("state", &self.state())
            .field("attempts", &self.attempts())
            .finish()
    }
}
