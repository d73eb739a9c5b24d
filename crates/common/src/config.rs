//! Configuration management following 12-factor app principles
//!
//! All configuration is loaded from environment variables to ensure
//! clean separation between code and config. Every value has a default
//! suitable for a single-user local session.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;

/// Default SQLite database location
const DEFAULT_DATABASE_URL: &str = "sqlite://shipwright.db?mode=rwc";

/// Default upload limit for ZIP imports (25 MiB)
const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(anyhow::anyhow!(
                "Unknown LOG_FORMAT '{}'. Supported formats: pretty, json",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// SQLite connection URL
    pub database_url: String,

    /// Runtime configuration
    pub rust_log: String,
    pub log_format: LogFormat,
    pub port: u16,

    /// Comma-separated list of allowed origins, or "*"
    pub cors_allowed_origins: String,

    /// Maximum request body size in bytes
    pub max_upload_bytes: usize,

    /// Number of project transcripts kept in memory
    pub chat_cache_capacity: usize,

    /// Messages kept per project transcript
    pub chat_max_messages: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            rust_log: "shipwright=debug,tower_http=info".to_string(),
            log_format: LogFormat::Pretty,
            port: 3000,
            cors_allowed_origins: "*".to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            chat_cache_capacity: 64,
            chat_max_messages: 200,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        let defaults = Self::default();

        let log_format = match env::var("LOG_FORMAT") {
            Ok(value) => value.parse()?,
            Err(_) => defaults.log_format,
        };

        let config = Self {
            database_url: env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            rust_log: env::var("RUST_LOG").unwrap_or(defaults.rust_log),
            log_format,
            port: parse_var("PORT", defaults.port)?,
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .unwrap_or(defaults.cors_allowed_origins),
            max_upload_bytes: parse_var("MAX_UPLOAD_BYTES", defaults.max_upload_bytes)?,
            chat_cache_capacity: parse_var("CHAT_CACHE_CAPACITY", defaults.chat_cache_capacity)?,
            chat_max_messages: parse_var("CHAT_MAX_MESSAGES", defaults.chat_max_messages)?,
        };

        if config.chat_cache_capacity == 0 {
            return Err(anyhow::anyhow!("CHAT_CACHE_CAPACITY must be at least 1"));
        }

        Ok(config)
    }
}

/// Parse an optional numeric variable, falling back to a default when unset
fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("{} must be a number: {}", name, e)),
        Err(_) => Ok(default),
    }
}
