use std::str::FromStr;

const DEFAULT_CORS_ORIGIN: &str = "http://localhost:5173";

/// Failure to read server configuration from the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
}

/// Runtime settings for the board API.
///
/// Only `DATABASE_URL` is required:
///
/// | Variable               | Default                 |
/// |------------------------|-------------------------|
/// | `DATABASE_URL`         | none                    |
/// | `DB_MAX_CONNECTIONS`   | `20`                    |
/// | `HOST`                 | `0.0.0.0`               |
/// | `PORT`                 | `3000`                  |
/// | `CORS_ORIGINS`         | `http://localhost:5173` |
/// | `REQUEST_TIMEOUT_SECS` | `30`                    |
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub db_max_connections: u32,
    /// IP address to bind; hostnames are not resolved.
    pub host: String,
    pub port: u16,
    /// Comma-separated in the environment; blanks are dropped.
    pub cors_origins: Vec<String>,
    pub request_timeout_secs: u64,
}

impl ServerConfig {
    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url =
            std::env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;

        let cors_origins = std::env::var("CORS_ORIGINS")
            .map(|raw| split_origins(&raw))
            .unwrap_or_else(|_| vec![DEFAULT_CORS_ORIGIN.to_string()]);

        Ok(Self {
            database_url,
            db_max_connections: parse_or(
                "DB_MAX_CONNECTIONS",
                workdesk_db::DEFAULT_MAX_CONNECTIONS,
            )?,
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: parse_or("PORT", 3000)?,
            cors_origins,
            request_timeout_secs: parse_or("REQUEST_TIMEOUT_SECS", 30)?,
        })
    }
}

fn parse_or<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        Err(_) => Ok(default),
    }
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(String::from)
        .collect()
}
