//! Server configuration from environment variables.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `HOST` | `0.0.0.0` |
//! | `PORT` | `3000` |
//! | `STORE_BACKEND` | `postgres` (`memory` for an in-process store) |
//! | `DATABASE_URL` | `postgres://localhost/notekeep` |
//! | `DB_MAX_CONNECTIONS` | `10` |
//! | `DB_ACQUIRE_TIMEOUT_SECS` | `30` |
//! | `DB_IDLE_TIMEOUT_SECS` | `600` |
//! | `IDENTITY_HEADER` | `x-user-id` |
//! | `ALLOWED_ORIGINS` | `http://localhost:3000` (comma-separated) |
//! | `RATE_LIMIT_ENABLED` | `true` |
//! | `RATE_LIMIT_REQUESTS` | `100` |
//! | `RATE_LIMIT_PERIOD_SECS` | `60` |
//! | `MAX_BODY_BYTES` | `65536` |
//!
//! Unparseable numeric values fall back to the default with a warning.

use std::str::FromStr;
use std::time::Duration;

use axum::http::{HeaderName, HeaderValue};
use notekeep_core::defaults;
use notekeep_core::{Error, Result};
use notekeep_db::PoolConfig;

/// Which [`notekeep_core::NoteStore`] backs the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(StoreBackend::Postgres),
            "memory" | "mem" => Ok(StoreBackend::Memory),
            other => Err(Error::Config(format!(
                "unknown STORE_BACKEND '{}' (expected 'postgres' or 'memory')",
                other
            ))),
        }
    }
}

/// Runtime configuration for the API server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub backend: StoreBackend,
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub db_idle_timeout_secs: u64,
    pub identity_header: HeaderName,
    pub allowed_origins: Vec<HeaderValue>,
    pub rate_limit_enabled: bool,
    pub rate_limit_requests: u64,
    pub rate_limit_period_secs: u64,
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        let pool = PoolConfig::default();
        Self {
            host: defaults::SERVER_HOST.to_string(),
            port: defaults::SERVER_PORT,
            backend: StoreBackend::Postgres,
            database_url: "postgres://localhost/notekeep".to_string(),
            db_max_connections: pool.max_connections,
            db_acquire_timeout_secs: pool.acquire_timeout.as_secs(),
            db_idle_timeout_secs: pool.idle_timeout.as_secs(),
            identity_header: HeaderName::from_static(defaults::IDENTITY_HEADER),
            allowed_origins: vec![HeaderValue::from_static("http://localhost:3000")],
            rate_limit_enabled: true,
            rate_limit_requests: defaults::RATE_LIMIT_REQUESTS,
            rate_limit_period_secs: defaults::RATE_LIMIT_PERIOD_SECS,
            max_body_bytes: defaults::MAX_BODY_BYTES,
        }
    }
}

impl ServerConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, falling back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base = Self::default();

        let backend = match lookup("STORE_BACKEND") {
            Some(v) => v.parse()?,
            None => base.backend,
        };

        let identity_header = match lookup("IDENTITY_HEADER") {
            Some(v) => HeaderName::from_str(v.trim())
                .map_err(|e| Error::Config(format!("invalid IDENTITY_HEADER '{}': {}", v, e)))?,
            None => base.identity_header,
        };

        let allowed_origins = lookup("ALLOWED_ORIGINS")
            .map(|v| parse_allowed_origins(&v))
            .filter(|origins| !origins.is_empty())
            .unwrap_or(base.allowed_origins);

        Ok(Self {
            host: lookup("HOST").unwrap_or(base.host),
            port: parse_or(&lookup, "PORT", base.port),
            backend,
            database_url: lookup("DATABASE_URL").unwrap_or(base.database_url),
            db_max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", base.db_max_connections),
            db_acquire_timeout_secs: parse_or(
                &lookup,
                "DB_ACQUIRE_TIMEOUT_SECS",
                base.db_acquire_timeout_secs,
            ),
            db_idle_timeout_secs: parse_or(
                &lookup,
                "DB_IDLE_TIMEOUT_SECS",
                base.db_idle_timeout_secs,
            ),
            identity_header,
            allowed_origins,
            rate_limit_enabled: lookup("RATE_LIMIT_ENABLED")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(base.rate_limit_enabled),
            rate_limit_requests: parse_or(&lookup, "RATE_LIMIT_REQUESTS", base.rate_limit_requests),
            rate_limit_period_secs: parse_or(
                &lookup,
                "RATE_LIMIT_PERIOD_SECS",
                base.rate_limit_period_secs,
            ),
            max_body_bytes: parse_or(&lookup, "MAX_BODY_BYTES", base.max_body_bytes),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Pool settings for the PostgreSQL backend.
    pub fn pool_config(&self) -> PoolConfig {
        PoolConfig::new()
            .max_connections(self.db_max_connections)
            .acquire_timeout(Duration::from_secs(self.db_acquire_timeout_secs))
            .idle_timeout(Duration::from_secs(self.db_idle_timeout_secs))
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Copy + std::fmt::Display,
{
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid {} '{}', using default {}", key, raw, default);
            default
        }),
    }
}

/// Parse a comma-separated CORS origin list, skipping invalid entries.
fn parse_allowed_origins(origins_str: &str) -> Vec<HeaderValue> {
    origins_str
        .split(',')
        .filter_map(|s| {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            match trimmed.parse::<HeaderValue>() {
                Ok(v) => Some(v),
                Err(e) => {
                    tracing::warn!("Invalid CORS origin '{}': {}", trimmed, e);
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = ServerConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.backend, StoreBackend::Postgres);
        assert_eq!(config.identity_header.as_str(), "x-user-id");
        assert!(config.rate_limit_enabled);
        assert_eq!(config.bind_addr(), "0.0.0.0:3000");
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_lookup(lookup_from(&[
            ("PORT", "8080"),
            ("STORE_BACKEND", "memory"),
            ("IDENTITY_HEADER", "X-Auth-User"),
            ("RATE_LIMIT_ENABLED", "false"),
            ("ALLOWED_ORIGINS", "https://a.example, https://b.example"),
        ]))
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.backend, StoreBackend::Memory);
        assert_eq!(config.identity_header.as_str(), "x-auth-user");
        assert!(!config.rate_limit_enabled);
        assert_eq!(config.allowed_origins.len(), 2);
    }

    #[test]
    fn test_pool_settings_from_env() {
        let config = ServerConfig::from_lookup(lookup_from(&[
            ("DB_MAX_CONNECTIONS", "3"),
            ("DB_ACQUIRE_TIMEOUT_SECS", "7"),
            ("DB_IDLE_TIMEOUT_SECS", "120"),
        ]))
        .unwrap();
        assert_eq!(
            config.pool_config(),
            PoolConfig::new()
                .max_connections(3)
                .acquire_timeout(Duration::from_secs(7))
                .idle_timeout(Duration::from_secs(120))
        );
    }

    #[test]
    fn test_default_pool_settings_match_store_defaults() {
        let config = ServerConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.pool_config(), PoolConfig::default());
    }

    #[test]
    fn test_bad_number_falls_back() {
        let config = ServerConfig::from_lookup(lookup_from(&[("PORT", "eighty")])).unwrap();
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn test_unknown_backend_is_config_error() {
        let result = ServerConfig::from_lookup(lookup_from(&[("STORE_BACKEND", "mongo")]));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_empty_origins_use_default() {
        let config = ServerConfig::from_lookup(lookup_from(&[("ALLOWED_ORIGINS", " , ")])).unwrap();
        assert_eq!(config.allowed_origins.len(), 1);
    }
}
