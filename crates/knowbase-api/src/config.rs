//! Server configuration from environment variables.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `DATABASE_URL` | `postgres://localhost/knowbase` |
//! | `HOST` | `0.0.0.0` |
//! | `PORT` | `5000` |
//! | `ALLOWED_ORIGINS` | `http://localhost:3000` |
//! | `DB_MAX_CONNECTIONS` | `10` |
//! | `DB_ACQUIRE_TIMEOUT_SECS` | `30` |
//! | `RUN_MIGRATIONS` | `true` |
//! | `LOG_FORMAT` | `text` |
//! | `LOG_FILE` | unset (stdout) |
//! | `LOG_ANSI` | auto |
//!
//! Unparseable numbers and booleans fall back to the default with a warning.

use std::str::FromStr;

use axum::http::HeaderValue;
use knowbase_core::defaults;
use knowbase_db::pool::{DEFAULT_ACQUIRE_TIMEOUT_SECS, DEFAULT_MAX_CONNECTIONS};
use tracing::warn;

/// Runtime configuration for the HTTP server.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    /// Raw comma-separated origin list; see [`parse_allowed_origins`].
    pub allowed_origins: String,
    pub db_max_connections: u32,
    /// Seconds to wait for a pooled connection.
    pub db_acquire_timeout_secs: u64,
    pub run_migrations: bool,
    pub body_limit_bytes: usize,
    pub log: LogConfig,
}

/// Log output settings, read before anything else is logged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// "json" or "text".
    pub format: String,
    /// Log file path; enables daily rotation.
    pub file: Option<String>,
    /// Explicit ANSI color override.
    pub ansi: Option<bool>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            format: "text".to_string(),
            file: None,
            ansi: None,
        }
    }
}

impl LogConfig {
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            database_url: defaults::DATABASE_URL.to_string(),
            host: defaults::HOST.to_string(),
            port: defaults::PORT,
            allowed_origins: defaults::ALLOWED_ORIGINS.to_string(),
            db_max_connections: DEFAULT_MAX_CONNECTIONS,
            db_acquire_timeout_secs: DEFAULT_ACQUIRE_TIMEOUT_SECS,
            run_migrations: true,
            body_limit_bytes: defaults::BODY_LIMIT_BYTES,
            log: LogConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, which returns a variable's value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let base = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            database_url: non_empty("DATABASE_URL").unwrap_or(base.database_url),
            host: non_empty("HOST").unwrap_or(base.host),
            port: parse_or("PORT", non_empty("PORT"), base.port),
            allowed_origins: non_empty("ALLOWED_ORIGINS").unwrap_or(base.allowed_origins),
            db_max_connections: parse_or(
                "DB_MAX_CONNECTIONS",
                non_empty("DB_MAX_CONNECTIONS"),
                base.db_max_connections,
            ),
            db_acquire_timeout_secs: parse_or(
                "DB_ACQUIRE_TIMEOUT_SECS",
                non_empty("DB_ACQUIRE_TIMEOUT_SECS"),
                base.db_acquire_timeout_secs,
            ),
            run_migrations: non_empty("RUN_MIGRATIONS")
                .map(|v| parse_bool("RUN_MIGRATIONS", &v, base.run_migrations))
                .unwrap_or(base.run_migrations),
            body_limit_bytes: base.body_limit_bytes,
            log: LogConfig {
                format: non_empty("LOG_FORMAT").unwrap_or(base.log.format),
                file: non_empty("LOG_FILE"),
                ansi: non_empty("LOG_ANSI").map(|v| v == "true" || v == "1"),
            },
        }
    }

    /// `host:port` string for binding.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T: FromStr + Copy + std::fmt::Display>(key: &str, raw: Option<String>, default: T) -> T {
    match raw {
        Some(value) => value.trim().parse().unwrap_or_else(|_| {
            warn!(
                subsystem = "api",
                component = "config",
                key,
                value = %value,
                fallback = %default,
                "Invalid numeric configuration value, using default"
            );
            default
        }),
        None => default,
    }
}

fn parse_bool(key: &str, value: &str, default: bool) -> bool {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => true,
        "false" | "0" | "no" => false,
        _ => {
            warn!(
                subsystem = "api",
                component = "config",
                key,
                value = %value,
                fallback = default,
                "Invalid boolean configuration value, using default"
            );
            default
        }
    }
}

/// Parse a comma-separated origin list into CORS header values.
///
/// Blank entries and values that are not valid header values are skipped.
/// An empty or fully invalid list yields the default origin.
pub fn parse_allowed_origins(raw: &str) -> Vec<HeaderValue> {
    let origins: Vec<HeaderValue> = raw
        .split(',')
        .filter_map(|s| {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
                warn!("Invalid CORS origin '{}': missing http(s) scheme", trimmed);
                return None;
            }
            match trimmed.parse::<HeaderValue>() {
                Ok(v) => Some(v),
                Err(e) => {
                    warn!("Invalid CORS origin '{}': {}", trimmed, e);
                    None
                }
            }
        })
        .collect();

    if origins.is_empty() {
        return vec![HeaderValue::from_static(defaults::ALLOWED_ORIGINS)];
    }
    origins
}
