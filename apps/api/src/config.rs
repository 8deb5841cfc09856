use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::recommendations::invoker::InvocationParams;

const DEFAULT_DEPLOYMENT: &str = "gpt-4o-mini";
const DEFAULT_TIMEOUT_MS: u64 = 5000;
const DEFAULT_MAX_TOKENS: u32 = 800;
const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub model_endpoint: String,
    pub model_api_key: String,
    pub model_deployment: String,
    pub model_timeout_ms: u64,
    pub model_max_tokens: u32,
    pub model_temperature: f32,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            model_endpoint: require_env("MODEL_ENDPOINT")?,
            model_api_key: require_env("MODEL_API_KEY")?,
            model_deployment: std::env::var("MODEL_DEPLOYMENT")
                .unwrap_or_else(|_| DEFAULT_DEPLOYMENT.to_string()),
            model_timeout_ms: env_or("MODEL_TIMEOUT_MS", DEFAULT_TIMEOUT_MS)?,
            model_max_tokens: env_or("MODEL_MAX_TOKENS", DEFAULT_MAX_TOKENS)?,
            model_temperature: env_or("MODEL_TEMPERATURE", DEFAULT_TEMPERATURE)?,
            port: env_or("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Generation parameters handed to every model invocation.
    pub fn invocation_params(&self) -> InvocationParams {
        InvocationParams {
            max_tokens: self.model_max_tokens,
            temperature: self.model_temperature,
            timeout: Duration::from_millis(self.model_timeout_ms),
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => parse_value(key, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.trim()
        .parse::<T>()
        .with_context(|| format!("{key} has an invalid value '{raw}'"))
}
