//! # API Configuration Module
//!
//! Loads the server configuration and the scheduling policy from
//! environment variables, falling back to defaults where sensible.
//!
//! ## Environment Variables
//!
//! - `API_HOST`: host address to bind to (default: "0.0.0.0")
//! - `API_PORT`: port to listen on (default: 3000)
//! - `DATABASE_URL`: PostgreSQL connection string; when unset the server
//!   runs on the in-memory store
//! - `LOG_LEVEL`: logging level (default: "info")
//! - `API_CORS_ORIGINS`: comma-separated list of allowed CORS origins
//! - `API_REQUEST_TIMEOUT_SECONDS`: per-request timeout (default: 30)
//! - `SCHEDULE_MAX_WINDOW_DAYS`: availability query horizon (default: 60)
//! - `SLOT_MIN_LEAD_MINUTES`: lead time for teacher-opened slots (default: 60)
//! - `SLOT_GRID_MINUTES`: slot grid (default: 30)
//! - `AVAILABILITY_LOOKAHEAD_MINUTES`: matching window width (default: 30)
//! - `WEEK_UTC_OFFSET_MINUTES`: offset of the week anchor from UTC (default: 0)

use std::env;
use std::str::FromStr;

use eyre::{Result, WrapErr};
use tracing::Level;
use tutorsync_core::policy::SchedulingPolicy;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,

    /// PostgreSQL connection string. `None` selects the in-memory store.
    pub database_url: Option<String>,

    pub log_level: Level,

    pub cors_origins: Option<Vec<String>>,

    /// Request timeout in seconds
    pub request_timeout: u64,

    pub policy: SchedulingPolicy,
}

impl ApiConfig {
    /// Creates a new ApiConfig from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error when a numeric variable is set but does not parse.
    pub fn from_env() -> Result<Self> {
        // Network settings
        let host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env_or("API_PORT", 3000u16)?;

        // Database settings
        let database_url = env::var("DATABASE_URL").ok().filter(|url| !url.trim().is_empty());

        // Logging settings
        let log_level = parse_log_level(&env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()));

        // CORS settings
        let cors_origins = env::var("API_CORS_ORIGINS").ok().map(|origins| {
            origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        });

        let request_timeout = env::var("API_REQUEST_TIMEOUT_SECONDS")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(30);

        // Scheduling rules
        let defaults = SchedulingPolicy::default();
        let policy = SchedulingPolicy {
            max_window_days: env_or("SCHEDULE_MAX_WINDOW_DAYS", defaults.max_window_days)?,
            min_lead_time_minutes: env_or("SLOT_MIN_LEAD_MINUTES", defaults.min_lead_time_minutes)?,
            slot_grid_minutes: env_or("SLOT_GRID_MINUTES", defaults.slot_grid_minutes)?,
            lookahead_minutes: env_or("AVAILABILITY_LOOKAHEAD_MINUTES", defaults.lookahead_minutes)?,
            week_utc_offset_minutes: env_or("WEEK_UTC_OFFSET_MINUTES", defaults.week_utc_offset_minutes)?,
        };
        if policy.slot_grid_minutes == 0 {
            eyre::bail!("SLOT_GRID_MINUTES must be positive");
        }

        Ok(Self {
            host,
            port,
            database_url,
            log_level,
            cors_origins,
            request_timeout,
            policy,
        })
    }

    /// Returns the server address as a string, e.g. "127.0.0.1:8080".
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

pub fn parse_log_level(value: &str) -> Level {
    match value.to_ascii_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

fn env_or<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .wrap_err_with(|| format!("Invalid {} value", name)),
        Err(_) => Ok(default),
    }
}
