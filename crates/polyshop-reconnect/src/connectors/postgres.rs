use crate::connector::Connector;
use crate::error::InvalidTarget;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use std::str::FromStr;
use std::time::Duration;

/// Pool sizing for [`PgConnector`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PgPoolSettings {
    pub max_connections: u32,
    pub min_connections: u32,
    pub max_lifetime: Duration,
    pub idle_timeout: Duration,
    pub acquire_timeout: Duration,
}

impl Default for PgPoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 25,
            min_connections: 5,
            max_lifetime: Duration::from_secs(30 * 60),
            idle_timeout: Duration::from_secs(5 * 60),
            acquire_timeout: Duration::from_secs(5),
        }
    }
}

/// Opens a PostgreSQL connection pool.
#[derive(Debug, Clone)]
pub struct PgConnector {
    options: PgConnectOptions,
    settings: PgPoolSettings,
    target: String,
}

impl PgConnector {
    /// Parses a `postgres://` URL. The password never appears in [`target`](Connector::target).
    pub fn new(url: &str) -> Result<Self, InvalidTarget> {
        let options = PgConnectOptions::from_str(url)
            .map_err(|e| InvalidTarget::new(redact(url), e))?;
        let target = format!(
            "{}:{}/{}",
            options.get_host(),
            options.get_port(),
            options.get_database().unwrap_or_default()
        );

        Ok(Self {
            options,
            settings: PgPoolSettings::default(),
            target,
        })
    }

    /// Overrides the pool sizing.
    pub fn settings(mut self, settings: PgPoolSettings) -> Self {
        self.settings = settings;
        self
    }
}

impl Connector for PgConnector {
    type Connection = PgPool;
    type Error = sqlx::Error;

    fn target(&self) -> &str {
        &self.target
    }

    async fn open(&self) -> Result<PgPool, sqlx::Error> {
        PgPoolOptions::new()
            .max_connections(self.settings.max_connections)
            .min_connections(self.settings.min_connections)
            .max_lifetime(self.settings.max_lifetime)
            .idle_timeout(self.settings.idle_timeout)
            .acquire_timeout(self.settings.acquire_timeout)
            .connect_with(self.options.clone())
            .await
    }

    async fn ping(&self, pool: &PgPool) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(pool).await?;
        Ok(())
    }

    async fn close(&self, pool: &PgPool) {
        pool.close().await;
    }
}

/// Strips everything before `@` so credentials stay out of errors.
fn redact(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme), Some(at)) if at > scheme => format!("{}://***{}", &url[..scheme], &url[at..]),
        _ => url.to_string(),
    }
}
