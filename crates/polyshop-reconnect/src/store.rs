use crate::config::ReconnectConfig;
use crate::connector::Connector;
use crate::error::{AttemptFailure, ConnectError};
use crate::events::ConnectEvent;
use crate::handle::Handle;
use crate::state::ConnectState;
use polyshop_retry::compute_delay;
use std::time::Instant;
use tokio::time::Instant as TokioInstant;
use tokio_util::sync::CancellationToken;

#[cfg(feature = "metrics")]
use metrics::counter;

/// Wraps a [`Connector`] and establishes its connection with bounded
/// exponential backoff before handing out a [`Handle`].
pub struct ReconnectingStore<C: Connector> {
    connector: C,
    config: ReconnectConfig,
    state: ConnectState,
}

impl<C: Connector> ReconnectingStore<C> {
    /// Creates a store wrapper in [`ConnectionState::Disconnected`](crate::ConnectionState::Disconnected).
    pub fn new(connector: C, config: ReconnectConfig) -> Self {
        Self {
            connector,
            config,
            state: ConnectState::new(),
        }
    }

    /// Shared view of the connection state, usable while `connect` runs.
    pub fn state(&self) -> ConnectState {
        self.state.clone()
    }

    /// Opens the connection and verifies it, retrying with backoff.
    ///
    /// Attempt 1 runs immediately. After attempt `k` fails, the call waits
    /// [`compute_delay(policy, k)`](polyshop_retry::compute_delay) before
    /// attempt `k + 1`, up to `max_attempts` attempts in total. Cancelling
    /// `cancel` or passing the configured deadline ends the call at once,
    /// even in the middle of a backoff sleep.
    ///
    /// [`ConnectError::Exhausted`] is fatal: the caller must not start serving.
    pub async fn connect(
        self,
        cancel: &CancellationToken,
    ) -> Result<Handle<C>, ConnectError<C::Error>> {
        let deadline = self
            .config
            .deadline
            .map(|budget| TokioInstant::now() + budget);
        let max_attempts = self.config.policy.max_attempts();

        loop {
            let attempt = self.state.begin_attempt();
            self.emit(ConnectEvent::Attempt {
                source: self.config.name.clone(),
                timestamp: Instant::now(),
                attempt,
            });

            #[cfg(feature = "metrics")]
            counter!("store_connect_attempts_total", "store" => self.config.name.clone())
                .increment(1);

            let outcome = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(self.cancelled(attempt, false)),
                _ = sleep_until(deadline) => return Err(self.cancelled(attempt, true)),
                outcome = self.try_once() => outcome,
            };

            let failure = match outcome {
                Ok(connection) => return Ok(self.connected(connection, attempt)),
                Err(failure) => failure,
            };

            if attempt >= max_attempts {
                return Err(self.exhausted(attempt, failure));
            }

            let delay = compute_delay(&self.config.policy, attempt);
            self.state.mark_disconnected();
            tracing::warn!(
                store = %self.config.name,
                endpoint = %self.connector.target(),
                attempt,
                max_attempts,
                delay_ms = delay.as_millis() as u64,
                error = %failure,
                "store connection failed, retrying with backoff"
            );
            self.emit(ConnectEvent::Failure {
                source: self.config.name.clone(),
                timestamp: Instant::now(),
                attempt,
                delay,
                error: failure.to_string(),
            });

            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(self.cancelled(attempt, false)),
                _ = sleep_until(deadline) => return Err(self.cancelled(attempt, true)),
                _ = tokio::time::sleep(delay) => {}
            }
        }
    }

    async fn try_once(&self) -> Result<C::Connection, AttemptFailure<C::Error>> {
        let timeout = self.config.attempt_timeout;
        let attempt = async {
            let connection = self.connector.open().await.map_err(AttemptFailure::Store)?;
            if let Err(error) = self.connector.ping(&connection).await {
                self.connector.close(&connection).await;
                return Err(AttemptFailure::Store(error));
            }
            Ok(connection)
        };

        match tokio::time::timeout(timeout, attempt).await {
            Ok(result) => result,
            Err(_) => Err(AttemptFailure::TimedOut(timeout)),
        }
    }

    fn connected(self, connection: C::Connection, attempts: u32) -> Handle<C> {
        self.state.mark_connected();
        if attempts > 1 {
            tracing::info!(
                store = %self.config.name,
                endpoint = %self.connector.target(),
                attempts,
                "store connection established after retry"
            );
        } else {
            tracing::info!(
                store = %self.config.name,
                endpoint = %self.connector.target(),
                "store connection established"
            );
        }
        self.emit(ConnectEvent::Success {
            source: self.config.name.clone(),
            timestamp: Instant::now(),
            attempts,
        });

        #[cfg(feature = "metrics")]
        counter!("store_connect_success_total", "store" => self.config.name.clone())
            .increment(1);

        Handle::new(
            self.config.name,
            self.connector,
            connection,
            self.config.ping_timeout,
            self.state,
        )
    }

    fn exhausted(&self, attempts: u32, last: AttemptFailure<C::Error>) -> ConnectError<C::Error> {
        self.state.mark_failed();
        tracing::error!(
            store = %self.config.name,
            endpoint = %self.connector.target(),
            attempts,
            error = %last,
            "store connection attempts exhausted"
        );
        self.emit(ConnectEvent::Exhausted {
            source: self.config.name.clone(),
            timestamp: Instant::now(),
            attempts,
            error: last.to_string(),
        });

        #[cfg(feature = "metrics")]
        counter!("store_connect_exhausted_total", "store" => self.config.name.clone())
            .increment(1);

        ConnectError::Exhausted {
            target: self.connector.target().to_string(),
            attempts,
            last,
        }
    }

    fn cancelled(&self, attempts: u32, deadline: bool) -> ConnectError<C::Error> {
        self.state.mark_failed();
        tracing::warn!(
            store = %self.config.name,
            endpoint = %self.connector.target(),
            attempts,
            deadline,
            "store connection abandoned"
        );
        self.emit(ConnectEvent::Cancelled {
            source: self.config.name.clone(),
            timestamp: Instant::now(),
            attempts,
        });

        let target = self.connector.target().to_string();
        if deadline {
            ConnectError::DeadlineElapsed { target, attempts }
        } else {
            ConnectError::Cancelled { target, attempts }
        }
    }

    fn emit(&self, event: ConnectEvent) {
        self.config.event_listeners.emit(&event);
    }
}

/// Shorthand for `ReconnectingStore::new(connector, config).connect(cancel)`.
pub async fn connect<C: Connector>(
    connector: C,
    config: ReconnectConfig,
    cancel: &CancellationToken,
) -> Result<Handle<C>, ConnectError<C::Error>> {
    ReconnectingStore::new(connector, config).connect(cancel).await
}

async fn sleep_until(deadline: Option<TokioInstant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
