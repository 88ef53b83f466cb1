use std::str::FromStr;
use std::time::Duration;

use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub database_url: String,
    pub session_expiry_hours: i64,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub request_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup, falling back to defaults
    /// for missing keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Config {
            server_host: lookup("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            server_port: parse(&lookup, "SERVER_PORT", 8080)?,
            database_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| "sqlite://ekin.db?mode=rwc".to_string()),
            session_expiry_hours: parse(&lookup, "SESSION_EXPIRY_HOURS", 24 * 7)?,
            db_max_connections: parse(&lookup, "DB_MAX_CONNECTIONS", 20)?,
            db_min_connections: parse(&lookup, "DB_MIN_CONNECTIONS", 5)?,
            request_timeout_secs: parse(&lookup, "REQUEST_TIMEOUT_SECS", 30)?,
        };

        if config.session_expiry_hours <= 0 {
            return Err(AppError::Config(
                "SESSION_EXPIRY_HOURS must be positive".to_string(),
            ));
        }
        if config.db_min_connections > config.db_max_connections {
            return Err(AppError::Config(format!(
                "DB_MIN_CONNECTIONS ({}) exceeds DB_MAX_CONNECTIONS ({})",
                config.db_min_connections, config.db_max_connections
            )));
        }

        Ok(config)
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn parse<F, T>(lookup: &F, key: &str, default: T) -> Result<T, AppError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AppError::Config(format!("Invalid {}: {}", key, e))),
        None => Ok(default),
    }
}
