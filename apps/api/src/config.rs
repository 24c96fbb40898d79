use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Everything has a default; the document service URL is optional.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Document service endpoint. Without it PDF requests fail with a conversion error.
    pub converter_url: Option<String>,
    pub converter_timeout_secs: u64,
    pub converter_max_in_flight: usize,
    pub converter_max_retries: u32,
    /// First retry delay; doubles on every further attempt.
    pub converter_retry_base_ms: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: parse_env("PORT", 8080).context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            converter_url: optional_env("CONVERTER_URL"),
            converter_timeout_secs: parse_env("CONVERTER_TIMEOUT_SECS", 30)?,
            converter_max_in_flight: parse_env("CONVERTER_MAX_IN_FLIGHT", 1)?,
            converter_max_retries: parse_env("CONVERTER_MAX_RETRIES", 2)?,
            converter_retry_base_ms: parse_env("CONVERTER_RETRY_BASE_MS", 500)?,
        })
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        None => Ok(default),
    }
}
