use crate::events::CartEvent;
use polyshop_core::events::{EventListener, EventListeners, FnListener};
use std::time::Duration;

/// Configuration for a [`CartAccumulator`](crate::CartAccumulator).
#[derive(Clone)]
pub struct CartConfig {
    pub(crate) name: String,
    pub(crate) call_timeout: Duration,
    pub(crate) event_listeners: EventListeners<CartEvent>,
}

impl CartConfig {
    /// Creates a new builder.
    pub fn builder() -> CartConfigBuilder {
        CartConfigBuilder::default()
    }

    /// Name used in logs and events.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Bound on each individual store call.
    pub fn call_timeout(&self) -> Duration {
        self.call_timeout
    }
}

impl Default for CartConfig {
    fn default() -> Self {
        CartConfigBuilder::default().build()
    }
}

impl std::fmt::Debug for CartConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartConfig")
            .field("name", &self.name)
            .field("call_timeout", &self.call_timeout)
            .field("listeners", &self.event_listeners.len())
            .finish()
    }
}

/// Builder for [`CartConfig`].
pub struct CartConfigBuilder {
    name: String,
    call_timeout: Duration,
    event_listeners: EventListeners<CartEvent>,
}

impl Default for CartConfigBuilder {
    fn default() -> Self {
        Self {
            name: "cart".to_string(),
            call_timeout: Duration::from_secs(3),
            event_listeners: EventListeners::new(),
        }
    }
}

impl CartConfigBuilder {
    /// Sets the name used in logs and events.
    pub fn name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the per-call store timeout. Default is 3 seconds.
    pub fn call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    /// Adds a listener receiving every [`CartEvent`].
    pub fn listener<L>(mut self, listener: L) -> Self
    where
        L: EventListener<CartEvent> + 'static,
    {
        self.event_listeners.add(listener);
        self
    }

    /// Registers a callback for entries skipped during a read.
    ///
    /// # Callback Signature
    /// `Fn(&str, &str, &str)` - user id, product id and the raw stored value.
    pub fn on_corrupt_entry<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, &str, &str) + Send + Sync + 'static,
    {
        self.event_listeners.add(FnListener::new(move |event| {
            if let CartEvent::CorruptEntry {
                user_id,
                product_id,
                raw,
                ..
            } = event
            {
                f(user_id, product_id, raw);
            }
        }));
        self
    }

    /// Builds the `CartConfig`.
    pub fn build(self) -> CartConfig {
        CartConfig {
            name: self.name,
            call_timeout: self.call_timeout,
            event_listeners: self.event_listeners,
        }
    }
}
