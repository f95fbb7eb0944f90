use std::str::FromStr;

use studio_core::calendar::{StudioCalendar, DEFAULT_UTC_OFFSET_HOURS};

use crate::auth::jwt::JwtConfig;

/// Errors raised while reading configuration at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} has an invalid value '{value}'")]
    Invalid { key: &'static str, value: String },
}

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Credentials for the admin account created on first start.
#[derive(Debug, Clone)]
pub struct BootstrapAdmin {
    pub username: String,
    pub password: String,
}

/// Server configuration loaded from environment variables.
///
/// All fields except the database URL and JWT secret have defaults suitable
/// for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    pub database_url: String,
    /// Connection pool size (default: `20`).
    pub db_max_connections: u32,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
    /// Calendar used to turn timestamps into booking / attendance days.
    pub calendar: StudioCalendar,
    /// Minimum password length for new accounts (default: `8`).
    pub password_min_length: usize,
    pub bootstrap_admin: Option<BootstrapAdmin>,
    pub log_format: LogFormat,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                    | Default                 |
    /// |----------------------------|-------------------------|
    /// | `HOST`                     | `0.0.0.0`               |
    /// | `PORT`                     | `3000`                  |
    /// | `DATABASE_URL`             | **required**            |
    /// | `DB_MAX_CONNECTIONS`       | `20`                    |
    /// | `CORS_ORIGINS`             | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`     | `30`                    |
    /// | `JWT_SECRET`               | **required**            |
    /// | `JWT_EXPIRY_HOURS`         | `24`                    |
    /// | `STUDIO_UTC_OFFSET_HOURS`  | `7`                     |
    /// | `PASSWORD_MIN_LENGTH`      | `8`                     |
    /// | `BOOTSTRAP_ADMIN_USERNAME` | unset                   |
    /// | `BOOTSTRAP_ADMIN_PASSWORD` | unset                   |
    /// | `LOG_FORMAT`               | `text` (or `json`)      |
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port: u16 = env_or("PORT", 3000)?;

        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| ConfigError::Missing("DATABASE_URL"))?;
        let db_max_connections: u32 = env_or("DB_MAX_CONNECTIONS", 20)?;

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = env_or("REQUEST_TIMEOUT_SECS", 30)?;

        let jwt = JwtConfig::from_env()?;

        let offset_hours: i32 = env_or("STUDIO_UTC_OFFSET_HOURS", DEFAULT_UTC_OFFSET_HOURS)?;
        let calendar = StudioCalendar::from_utc_offset_hours(offset_hours).map_err(|_| {
            ConfigError::Invalid {
                key: "STUDIO_UTC_OFFSET_HOURS",
                value: offset_hours.to_string(),
            }
        })?;

        let password_min_length: usize = env_or("PASSWORD_MIN_LENGTH", 8)?;

        let bootstrap_admin = match (
            std::env::var("BOOTSTRAP_ADMIN_USERNAME"),
            std::env::var("BOOTSTRAP_ADMIN_PASSWORD"),
        ) {
            (Ok(username), Ok(password)) if !username.is_empty() && !password.is_empty() => {
                Some(BootstrapAdmin { username, password })
            }
            _ => None,
        };

        let log_format = match std::env::var("LOG_FORMAT").as_deref() {
            Err(_) | Ok("text") => LogFormat::Text,
            Ok("json") => LogFormat::Json,
            Ok(other) => {
                return Err(ConfigError::Invalid {
                    key: "LOG_FORMAT",
                    value: other.to_string(),
                })
            }
        };

        Ok(Self {
            host,
            port,
            database_url,
            db_max_connections,
            cors_origins,
            request_timeout_secs,
            jwt,
            calendar,
            password_min_length,
            bootstrap_admin,
            log_format,
        })
    }
}

/// Parse `key` from the environment, falling back to `default` when unset.
pub(crate) fn env_or<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(key) {
        Ok(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        Err(_) => Ok(default),
    }
}
