use std::time::Duration;

/// Why a single connection attempt failed.
#[derive(Debug, thiserror::Error)]
pub enum AttemptFailure<E> {
    /// The store client reported an error while opening or pinging.
    #[error(transparent)]
    Store(E),

    /// Opening plus the liveness check did not finish within the attempt timeout.
    #[error("connection attempt timed out after {0:?}")]
    TimedOut(Duration),
}

/// Errors returned by [`ReconnectingStore::connect`](crate::ReconnectingStore::connect).
#[derive(Debug, thiserror::Error)]
pub enum ConnectError<E> {
    /// Every attempt failed. Fatal: the service must not start.
    #[error("failed to connect to {target} after {attempts} attempts: {last}")]
    Exhausted {
        target: String,
        attempts: u32,
        #[source]
        last: AttemptFailure<E>,
    },

    /// The cancellation token fired before a connection was established.
    #[error("connection to {target} cancelled after {attempts} attempts")]
    Cancelled { target: String, attempts: u32 },

    /// The overall connect deadline passed before a connection was established.
    #[error("connection to {target} exceeded its deadline after {attempts} attempts")]
    DeadlineElapsed { target: String, attempts: u32 },
}

impl<E> ConnectError<E> {
    /// Number of attempts started before giving up.
    pub fn attempts(&self) -> u32 {
        match self {
            ConnectError::Exhausted { attempts, .. }
            | ConnectError::Cancelled { attempts, .. }
            | ConnectError::DeadlineElapsed { attempts, .. } => *attempts,
        }
    }

    /// Returns true when the retries ran out, as opposed to the caller stopping them.
    pub fn is_exhausted(&self) -> bool {
        matches!(self, ConnectError::Exhausted { .. })
    }
}

/// Errors returned by [`Handle::ping`](crate::Handle::ping).
#[derive(Debug, thiserror::Error)]
pub enum PingError<E> {
    /// The liveness check did not answer within the ping timeout.
    #[error("ping timed out after {0:?}")]
    Timeout(Duration),

    /// The handle has been closed.
    #[error("connection is closed")]
    Closed,

    /// The store answered with an error.
    #[error(transparent)]
    Store(E),
}

/// A connection target that cannot be parsed. Configuration error, never retried.
#[derive(Debug, thiserror::Error)]
#[error("invalid store target {target:?}: {reason}")]
pub struct InvalidTarget {
    target: String,
    reason: String,
}

impl InvalidTarget {
    /// Creates an error for `target` with a reason suitable for logs.
    pub fn new(target: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self {
            target: target.into(),
            reason: reason.to_string(),
        }
    }

    /// The rejected target.
    pub fn target(&self) -> &str {
        &self.target
    }
}
