//! PostgreSQL pool settings for the note store.

use std::time::{Duration, Instant};

use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::{debug, info};

use echonotes_core::{Error, Result};

/// Connections kept open for request handlers.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Seconds a handler waits for a free connection before the store is
/// reported unavailable.
pub const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 30;

/// Sizing of the note store pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: DEFAULT_MAX_CONNECTIONS,
            acquire_timeout: Duration::from_secs(DEFAULT_ACQUIRE_TIMEOUT_SECS),
        }
    }
}

impl PoolConfig {
    /// Read `DB_MAX_CONNECTIONS` and `DB_CONNECT_TIMEOUT_SECS`.
    pub fn from_env() -> Self {
        Self::from_values(
            std::env::var("DB_MAX_CONNECTIONS").ok().as_deref(),
            std::env::var("DB_CONNECT_TIMEOUT_SECS").ok().as_deref(),
        )
    }

    /// Zero, negative and unparsable values keep the default.
    fn from_values(max_connections: Option<&str>, acquire_timeout_secs: Option<&str>) -> Self {
        let defaults = Self::default();
        Self {
            max_connections: positive(max_connections).unwrap_or(defaults.max_connections),
            acquire_timeout: positive(acquire_timeout_secs)
                .map(Duration::from_secs)
                .unwrap_or(defaults.acquire_timeout),
        }
    }

    /// Open the pool. The first connection is made eagerly so a bad
    /// `DATABASE_URL` fails at startup.
    pub async fn connect(&self, database_url: &str) -> Result<PgPool> {
        let start = Instant::now();
        let pool = PgPoolOptions::new()
            .max_connections(self.max_connections)
            .acquire_timeout(self.acquire_timeout)
            .connect(database_url)
            .await
            .map_err(Error::Database)?;

        info!(
            subsystem = "database",
            component = "pool",
            op = "connect",
            max_connections = self.max_connections,
            acquire_timeout_secs = self.acquire_timeout.as_secs(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Note store pool ready"
        );
        Ok(pool)
    }
}

fn positive<T: std::str::FromStr + PartialOrd + Default>(raw: Option<&str>) -> Option<T> {
    raw?.trim().parse::<T>().ok().filter(|v| *v > T::default())
}

/// Debug-log how many connections are open and idle.
pub fn log_pool_usage(pool: &PgPool) {
    debug!(
        subsystem = "database",
        component = "pool",
        op = "usage",
        pool_size = pool.size(),
        pool_idle = pool.num_idle(),
        "Note store pool usage"
    );
}
