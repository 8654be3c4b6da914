use std::str::FromStr;

use anyhow::{Context, Result};

use crate::providers::{adzuna, arbeitnow, jsearch};

/// Application configuration loaded from environment variables.
///
/// Provider credentials are optional: a provider without them is left out of the
/// fallback chain. Malformed numeric values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub arbeitnow_base_url: String,
    pub adzuna: Option<AdzunaCredentials>,
    pub adzuna_base_url: String,
    pub jsearch_api_key: Option<String>,
    pub jsearch_base_url: String,
    pub jsearch_host: String,
    pub jsearch_max_pages: u32,
    /// Per-request timeout applied by the shared HTTP client.
    pub provider_timeout_secs: u64,
    /// Budget for one whole search across all providers.
    pub search_deadline_secs: u64,
}

#[derive(Debug, Clone)]
pub struct AdzunaCredentials {
    pub app_id: String,
    pub app_key: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let adzuna = match (optional_env("ADZUNA_APP_ID"), optional_env("ADZUNA_APP_KEY")) {
            (Some(app_id), Some(app_key)) => Some(AdzunaCredentials { app_id, app_key }),
            _ => None,
        };

        Ok(Config {
            port: parse_env("PORT", 8080).context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            arbeitnow_base_url: env_or("ARBEITNOW_BASE_URL", arbeitnow::DEFAULT_BASE_URL),
            adzuna,
            adzuna_base_url: env_or("ADZUNA_BASE_URL", adzuna::DEFAULT_BASE_URL),
            jsearch_api_key: optional_env("JSEARCH_API_KEY"),
            jsearch_base_url: env_or("JSEARCH_BASE_URL", jsearch::DEFAULT_BASE_URL),
            jsearch_host: env_or("JSEARCH_HOST", jsearch::DEFAULT_HOST),
            jsearch_max_pages: parse_env("JSEARCH_MAX_PAGES", 2)?,
            provider_timeout_secs: parse_env("PROVIDER_TIMEOUT_SECS", 30)?,
            search_deadline_secs: parse_env("SEARCH_DEADLINE_SECS", 12)?,
        })
    }
}

/// Set and non-blank, trimmed.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_or(key: &str, default: &str) -> String {
    optional_env(key)
        .map(|v| v.trim_end_matches('/').to_string())
        .unwrap_or_else(|| default.to_string())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
        None => Ok(default),
    }
}
