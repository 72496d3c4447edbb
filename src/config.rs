use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, anyhow};
use dotenvy::dotenv;

#[derive(Clone, Debug)]
pub struct Config {
    pub server_addr: String,
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_busy_timeout: Duration,

    // Browser origins allowed to call the API; "*" allows any
    pub cors_origins: Vec<String>,

    // Rate limiting, per peer IP
    pub rate_per_min: u32,

    pub log_dir: String,
    pub log_level: tracing::Level,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv().ok();

        Ok(Self {
            server_addr: env::var("SERVER_ADDR").unwrap_or_else(|_| "127.0.0.1:8000".to_string()),
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://hrms.db?mode=rwc".to_string()),
            db_max_connections: env_or("DB_MAX_CONNECTIONS", 5)?,
            db_busy_timeout: Duration::from_secs(env_or("DB_BUSY_TIMEOUT_SECS", 5)?),
            cors_origins: parse_list(&env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string())),
            rate_per_min: env_or("RATE_PER_MIN", 600)?,
            log_dir: env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string()),
            log_level: env_or("LOG_LEVEL", tracing::Level::INFO)?,
        })
    }
}

/// Reads and parses `key`, falling back to `default` when unset.
fn env_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => parse_var(key, &raw),
        Err(env::VarError::NotPresent) => Ok(default),
        Err(e) => Err(e).with_context(|| format!("{} is not valid unicode", key)),
    }
}

/// Comma separated, blanks dropped.
fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn parse_var<T>(key: &str, raw: &str) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| anyhow!("{} has invalid value {:?}: {}", key, raw, e))
}
