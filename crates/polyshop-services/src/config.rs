//! Command-line and environment configuration shared by both services.

use clap::{Args, Parser, ValueEnum};
use polyshop_reconnect::ReconnectConfig;
use polyshop_retry::{PolicyError, RetryPolicy};
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

/// Headroom on top of the store calls a single request may make.
const REQUEST_TIMEOUT_MARGIN: Duration = Duration::from_secs(1);

/// Whole-request bound for a service whose requests make at most two
/// sequential store calls of `store_call_timeout` each.
pub fn request_timeout(store_call_timeout: Duration) -> Duration {
    store_call_timeout.saturating_mul(2).saturating_add(REQUEST_TIMEOUT_MARGIN)
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Connection-establishment settings.
#[derive(Debug, Clone, Args)]
pub struct ConnectArgs {
    /// Base delay after the first failed attempt is twice this value
    #[arg(long, env = "CONNECT_INITIAL_DELAY_MS", default_value_t = 100)]
    pub connect_initial_delay_ms: u64,

    /// Upper bound on any single backoff delay
    #[arg(long, env = "CONNECT_MAX_DELAY_MS", default_value_t = 2000)]
    pub connect_max_delay_ms: u64,

    /// Total attempts, including the first
    #[arg(long, env = "CONNECT_MAX_ATTEMPTS", default_value_t = 6)]
    pub connect_max_attempts: u32,

    /// Jitter fraction in [0, 1)
    #[arg(long, env = "CONNECT_JITTER", default_value_t = 0.1)]
    pub connect_jitter: f64,

    /// Startup budget; the process exits if the store is not reachable by then
    #[arg(long, env = "STARTUP_BUDGET_SECS", default_value_t = 30)]
    pub startup_budget_secs: u64,
}

impl ConnectArgs {
    pub fn retry_policy(&self) -> Result<RetryPolicy, PolicyError> {
        RetryPolicy::builder()
            .initial_delay(Duration::from_millis(self.connect_initial_delay_ms))
            .max_delay(Duration::from_millis(self.connect_max_delay_ms))
            .max_attempts(self.connect_max_attempts)
            .jitter_fraction(self.connect_jitter)
            .build()
    }

    /// Builds the reconnect configuration for the store called `name`.
    pub fn reconnect_config(&self, name: &str) -> Result<ReconnectConfig, PolicyError> {
        Ok(ReconnectConfig::builder()
            .name(name)
            .policy(self.retry_policy()?)
            .deadline(Duration::from_secs(self.startup_budget_secs))
            .build())
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Args)]
pub struct ServerArgs {
    #[arg(long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// Time allowed for in-flight requests after a shutdown signal
    #[arg(long, env = "SHUTDOWN_GRACE_SECS", default_value_t = 5)]
    pub shutdown_grace_secs: u64,

    #[arg(long, env = "POD_NAME", default_value = "")]
    pub pod_name: String,

    #[arg(long, env = "NODE_NAME", default_value = "")]
    pub node_name: String,

    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

impl ServerArgs {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port))
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }
}

/// Configuration for `cart-service`.
#[derive(Debug, Clone, Parser)]
#[command(name = "cart-service", about = "Per-user shopping carts backed by Redis")]
pub struct CartServiceConfig {
    /// Redis address, `host:port` or a `redis://` URL
    #[arg(long, env = "REDIS_ADDR", default_value = "localhost:6379")]
    pub redis_addr: String,

    /// Bound on each Redis call made while serving a request
    #[arg(long, env = "STORE_CALL_TIMEOUT_MS", default_value_t = 3000)]
    pub store_call_timeout_ms: u64,

    #[command(flatten)]
    pub connect: ConnectArgs,

    #[command(flatten)]
    pub server: ServerArgs,
}

impl CartServiceConfig {
    pub fn store_call_timeout(&self) -> Duration {
        Duration::from_millis(self.store_call_timeout_ms)
    }
}

/// Configuration for `product-service`.
#[derive(Debug, Clone, Parser)]
#[command(name = "product-service", about = "Product catalog backed by PostgreSQL")]
pub struct ProductServiceConfig {
    /// PostgreSQL connection URL
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: String,

    /// Bound on each catalog query made while serving a request
    #[arg(long, env = "STORE_CALL_TIMEOUT_MS", default_value_t = 3000)]
    pub store_call_timeout_ms: u64,

    #[command(flatten)]
    pub connect: ConnectArgs,

    #[command(flatten)]
    pub server: ServerArgs,
}

impl ProductServiceConfig {
    pub fn store_call_timeout(&self) -> Duration {
        Duration::from_millis(self.store_call_timeout_ms)
    }
}
