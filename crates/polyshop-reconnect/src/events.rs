use polyshop_core::events::ObservedEvent;
use std::time::{Duration, Instant};

/// Events emitted while establishing a store connection.
#[derive(Debug, Clone)]
pub enum ConnectEvent {
    /// An attempt is starting.
    Attempt {
        source: String,
        timestamp: Instant,
        attempt: u32,
    },
    /// An attempt failed and another will follow after `delay`.
    Failure {
        source: String,
        timestamp: Instant,
        attempt: u32,
        delay: Duration,
        error: String,
    },
    /// The liveness check passed.
    Success {
        source: String,
        timestamp: Instant,
        attempts: u32,
    },
    /// The last allowed attempt failed.
    Exhausted {
        source: String,
        timestamp: Instant,
        attempts: u32,
        error: String,
    },
    /// Cancellation or the connect deadline stopped the retries.
    Cancelled {
        source: String,
        timestamp: Instant,
        attempts: u32,
    },
}

impl ObservedEvent for ConnectEvent {
    fn event_type(&self) -> &'static str {
        match self {
            ConnectEvent::Attempt { .. } => "store.connect.attempt",
            ConnectEvent::Failure { .. } => "store.connect.failure",
            ConnectEvent::Success { .. } => "store.connect.success",
            ConnectEvent::Exhausted { .. } => "store.connect.exhausted",
            ConnectEvent::Cancelled { .. } => "store.connect.cancelled",
        }
    }

    fn timestamp(&self) -> Instant {
        match self {
            ConnectEvent::Attempt { timestamp, .. }
            | ConnectEvent::Failure { timestamp, .. }
            | ConnectEvent::Success { timestamp, .. }
            | ConnectEvent::Exhausted { timestamp, .. }
            | ConnectEvent::Cancelled { timestamp, .. } => *timestamp,
        }
    }

    fn source(&self) -> &str {
        match self {
            ConnectEvent::Attempt { source, .. }
            | ConnectEvent::Failure { source, .. }
            | ConnectEvent::Success { source, .. }
            | ConnectEvent::Exhausted { source, .. }
            | ConnectEvent::Cancelled { source, .. } => source,
        }
    }

    fn attributes(&self) -> Vec<(&'static str, String)> {
        match self {
            ConnectEvent::Attempt { attempt, .. } => vec![("attempt", attempt.to_string())],
            ConnectEvent::Failure {
                attempt,
                delay,
                error,
                ..
            } => vec![
                ("attempt", attempt.to_string()),
                ("delay_ms", delay.as_millis().to_string()),
                ("error", error.clone()),
            ],
            ConnectEvent::Success { attempts, .. } | ConnectEvent::Cancelled { attempts, .. } => {
                vec![("attempts", attempts.to_string())]
            }
            ConnectEvent::Exhausted {
                attempts, error, ..
            } => vec![
                ("attempts", attempts.to_string()),
                ("error", error.clone()),
            ],
        }
    }
}
