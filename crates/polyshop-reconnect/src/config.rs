use crate::events::ConnectEvent;
use polyshop_core::events::{EventListener, EventListeners, FnListener};
use polyshop_retry::RetryPolicy;
use std::time::Duration;

/// Configuration for connection establishment.
#[derive(Clone)]
pub struct ReconnectConfig {
    pub(crate) name: String,

    /// Backoff and attempt budget.
    pub(crate) policy: RetryPolicy,

    /// Bound on a single open-plus-liveness-check.
    pub(crate) attempt_timeout: Duration,

    /// Overall budget for the whole connect call. `None` means attempts alone bound it.
    pub(crate) deadline: Option<Duration>,

    /// Bound on [`Handle::ping`](crate::Handle::ping), independent of the policy.
    pub(crate) ping_timeout: Duration,

    pub(crate) event_listeners: EventListeners<ConnectEvent>,
}

impl std::fmt::Debug for ReconnectConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReconnectConfig")
            .field("name", &self.name)
            .field("policy", &self.policy)
            .field("attempt_timeout", &self.attempt_timeout)
            .field("deadline", &self.deadline)
            .field("ping_timeout", &self.ping_timeout)
            .field("listeners", &self.event_listeners.len())
            .finish()
    }
}

impl ReconnectConfig {
    /// Creates a new builder for configuring connection establishment.
    pub fn builder() -> ReconnectConfigBuilder {
        ReconnectConfigBuilder::default()
    }

    /// Name used in logs and events.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the retry policy.
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Returns the per-attempt timeout.
    pub fn attempt_timeout(&self) -> Duration {
        self.attempt_timeout
    }

    /// Returns the overall connect deadline, if any.
    pub fn deadline(&self) -> Option<Duration> {
        self.deadline
    }

    /// Returns the timeout applied to each on-demand ping.
    pub fn ping_timeout(&self) -> Duration {
        self.ping_timeout
    }
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        ReconnectConfigBuilder::default().build()
    }
}

/// Builder for constructing a [`ReconnectConfig`].
pub struct ReconnectConfigBuilder {
    name: String,
    policy: RetryPolicy,
    attempt_timeout: Duration,
    deadline: Option<Duration>,
    ping_timeout: Duration,
    event_listeners: EventListeners<ConnectEvent>,
}

impl Default for ReconnectConfigBuilder {
    fn default() -> Self {
        Self {
            name: "<unnamed>".to_string(),
            policy: RetryPolicy::default(),
            attempt_timeout: Duration::from_secs(5),
            deadline: None,
            ping_timeout: Duration::from_secs(2),
            event_listeners: EventListeners::new(),
        }
    }
}

impl std::fmt::Debug for ReconnectConfigBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReconnectConfigBuilder")
            .field("name", &self.name)
            .field("policy", &self.policy)
            .field("attempt_timeout", &self.attempt_timeout)
            .field("deadline", &self.deadline)
            .field("ping_timeout", &self.ping_timeout)
            .finish()
    }
}

impl ReconnectConfigBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the name used in logs and events.
    pub fn name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the retry policy.
    pub fn policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets the bound on a single attempt. Default is 5 seconds.
    pub fn attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = timeout;
        self
    }

    /// Sets the overall connect budget.
    ///
    /// # Examples
    ///
    /// ```
    /// use polyshop_reconnect::ReconnectConfig;
    /// use std::time::Duration;
    ///
    /// let config = ReconnectConfig::builder()
    ///     .deadline(Duration::from_secs(30))
    ///     .build();
    /// assert_eq!(config.deadline(), Some(Duration::from_secs(30)));
    /// ```
    pub fn deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Sets the timeout for on-demand pings. Default is 2 seconds.
    pub fn ping_timeout(mut self, timeout: Duration) -> Self {
        self.ping_timeout = timeout;
        self
    }

    /// Adds a listener receiving every [`ConnectEvent`].
    pub fn listener<L>(mut self, listener: L) -> Self
    where
        L: EventListener<ConnectEvent> + 'static,
    {
        self.event_listeners.add(listener);
        self
    }

    /// Registers a callback invoked when an attempt starts, with its 1-indexed number.
    pub fn on_attempt<F>(mut self, f: F) -> Self
    where
        F: Fn(u32) + Send + Sync + 'static,
    {
        self.event_listeners.add(FnListener::new(move |event| {
            if let ConnectEvent::Attempt { attempt, .. } = event {
                f(*attempt);
            }
        }));
        self
    }

    /// Registers a callback invoked after a failed attempt, before the backoff sleep.
    ///
    /// # Callback Signature
    /// `Fn(u32, Duration)` - the attempt that failed and the delay about to be applied.
    ///
    /// # Examples
    ///
    /// ```
    /// use polyshop_reconnect::ReconnectConfig;
    ///
    /// let config = ReconnectConfig::builder()
    ///     .on_retry(|attempt, delay| {
    ///         println!("attempt {} failed, waiting {:?}", attempt, delay);
    ///     })
    ///     .build();
    /// ```
    pub fn on_retry<F>(mut self, f: F) -> Self
    where
        F: Fn(u32, Duration) + Send + Sync + 'static,
    {
        self.event_listeners.add(FnListener::new(move |event| {
            if let ConnectEvent::Failure { attempt, delay, .. } = event {
                f(*attempt, *delay);
            }
        }));
        self
    }

    /// Registers a callback invoked once the connection is verified.
    pub fn on_connected<F>(mut self, f: F) -> Self
    where
        F: Fn(u32) + Send + Sync + 'static,
    {
        self.event_listeners.add(FnListener::new(move |event| {
            if let ConnectEvent::Success { attempts, .. } = event {
                f(*attempts);
            }
        }));
        self
    }

    /// Builds the `ReconnectConfig`.
    pub fn build(self) -> ReconnectConfig {
        ReconnectConfig {
            name: self.name,
            policy: self.policy,
            attempt_timeout: self.attempt_timeout,
            deadline: self.deadline,
            ping_timeout: self.ping_timeout,
            event_listeners: self.event_listeners,
        }
    }
}
