use std::env;
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_WAREHOUSE_URL: &str = "sqlite:data/warehouse.db";
pub const DEFAULT_FEATURE_TABLE: &str = "features";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:5173";

const DEFAULT_QUERY_TIMEOUT_SECS: u64 = 10;
const DEFAULT_MODEL_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} not set")]
    Missing(&'static str),
    #[error("{name} must be a positive integer, got {value:?}")]
    InvalidNumber { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub warehouse_url: String,
    pub feature_table: String,
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub query_timeout: Duration,
    pub model_timeout: Duration,
    pub bind_addr: String,
    pub cors_origin: String,
}

impl AppConfig {
    /// Reads the configuration from the process environment.
    /// Call `dotenvy::dotenv()` first if a `.env` file should be honored.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let or_default =
            |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let gemini_api_key = lookup("GEMINI_API_KEY")
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigError::Missing("GEMINI_API_KEY"))?;

        Ok(Self {
            warehouse_url: or_default("WAREHOUSE_URL", DEFAULT_WAREHOUSE_URL),
            feature_table: or_default("FEATURE_TABLE", DEFAULT_FEATURE_TABLE),
            gemini_api_key,
            gemini_model: or_default("GEMINI_MODEL", DEFAULT_GEMINI_MODEL),
            gemini_base_url: or_default("GEMINI_BASE_URL", DEFAULT_GEMINI_BASE_URL),
            query_timeout: secs(
                "QUERY_TIMEOUT_SECS",
                lookup("QUERY_TIMEOUT_SECS"),
                DEFAULT_QUERY_TIMEOUT_SECS,
            )?,
            model_timeout: secs(
                "MODEL_TIMEOUT_SECS",
                lookup("MODEL_TIMEOUT_SECS"),
                DEFAULT_MODEL_TIMEOUT_SECS,
            )?,
            bind_addr: or_default("BIND_ADDR", DEFAULT_BIND_ADDR),
            cors_origin: or_default("CORS_ORIGIN", DEFAULT_CORS_ORIGIN),
        })
    }
}

fn secs(name: &'static str, raw: Option<String>, default: u64) -> Result<Duration, ConfigError> {
    let Some(value) = raw else {
        return Ok(Duration::from_secs(default));
    };

    match value.trim().parse::<u64>() {
        Ok(n) if n > 0 => Ok(Duration::from_secs(n)),
        _ => Err(ConfigError::InvalidNumber { name, value }),
    }
}
