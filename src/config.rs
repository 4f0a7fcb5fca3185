use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

#[derive(Clone, Debug)]
pub struct Config {
    pub server_addr: String,
    /// Base URL of the HRMS REST server.
    pub hrms_api_url: String,
    pub api_prefix: String,
    pub request_timeout: Duration,

    /// How long a form shows its success message before resetting.
    pub form_reset_delay: Duration,
    pub department_cache_ttl: Duration,

    // Rate limiting
    pub rate_console_per_min: u32,

    // Logging
    pub log_dir: String,
    pub log_level: tracing::Level,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            server_addr: env::var("SERVER_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string()),
            hrms_api_url: env::var("HRMS_API_URL")
                .unwrap_or_else(|_| "http://localhost:8000".to_string()),
            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api".to_string()),
            request_timeout: Duration::from_secs(parse_or("REQUEST_TIMEOUT_SECS", 10)?),

            form_reset_delay: Duration::from_millis(parse_or("FORM_RESET_DELAY_MS", 2000)?), // 2 s
            department_cache_ttl: Duration::from_secs(parse_or("DEPARTMENT_CACHE_TTL_SECS", 300)?),

            rate_console_per_min: parse_or("RATE_CONSOLE_PER_MIN", 600)?,

            log_dir: env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string()),
            log_level: parse_or("LOG_LEVEL", tracing::Level::DEBUG)?,
        })
    }
}

fn parse_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} has an invalid value: {raw:?}")),
        Err(_) => Ok(default),
    }
}
