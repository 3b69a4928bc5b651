//! PostgreSQL pool sizing and health snapshots.

use std::time::{Duration, Instant};

use serde::Serialize;
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::{debug, info, warn};

use notekeep_core::logging::{COMPONENT, DURATION_MS, OPERATION, SUBSYSTEM};
use notekeep_core::{Error, Result};

/// Settings applied when the note store opens its pool.
///
/// Every field maps to a `DB_*` variable read by the server config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    /// Upper bound on open connections (`DB_MAX_CONNECTIONS`).
    pub max_connections: u32,
    /// How long a query waits for a free connection (`DB_ACQUIRE_TIMEOUT_SECS`).
    pub acquire_timeout: Duration,
    /// Idle connections older than this are closed (`DB_IDLE_TIMEOUT_SECS`).
    pub idle_timeout: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: 10,
            acquire_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
        }
    }
}

impl PoolConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_connections(mut self, n: u32) -> Self {
        self.max_connections = n;
        self
    }

    pub fn acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }

    pub fn idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = timeout;
        self
    }

    /// sqlx options for these settings. A zero connection cap is raised to 1.
    fn options(&self) -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(self.max_connections.max(1))
            .acquire_timeout(self.acquire_timeout)
            .idle_timeout(self.idle_timeout)
    }
}

/// Open a pool against `database_url`.
pub async fn connect_pool(database_url: &str, config: &PoolConfig) -> Result<PgPool> {
    let start = Instant::now();
    let pool = config
        .options()
        .connect(database_url)
        .await
        .map_err(Error::Database)?;

    info!(
        { SUBSYSTEM } = "database",
        { COMPONENT } = "pool",
        { OPERATION } = "connect",
        max_connections = config.max_connections,
        acquire_timeout_secs = config.acquire_timeout.as_secs(),
        { DURATION_MS } = start.elapsed().as_millis() as u64,
        "Note store pool ready"
    );
    Ok(pool)
}

/// Point-in-time pool occupancy, reported by the health check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PoolStats {
    pub size: u32,
    pub idle: usize,
}

impl PoolStats {
    /// Every open connection is checked out.
    pub fn is_saturated(&self) -> bool {
        self.size > 0 && self.idle == 0
    }
}

/// Snapshot the pool, warning when no connection is idle.
pub fn pool_stats(pool: &PgPool) -> PoolStats {
    let stats = PoolStats {
        size: pool.size(),
        idle: pool.num_idle(),
    };

    if stats.is_saturated() {
        warn!(
            { SUBSYSTEM } = "database",
            { COMPONENT } = "pool",
            pool_size = stats.size,
            "No idle connections in note store pool"
        );
    } else {
        debug!(
            { SUBSYSTEM } = "database",
            { COMPONENT } = "pool",
            pool_size = stats.size,
            pool_idle = stats.idle,
            "Pool snapshot"
        );
    }
    stats
}
