use std::env;

use crate::errors::{Result, ServiceError};

const DEFAULT_PORT: u16 = 3978;

#[derive(Debug, Clone)]
pub struct RedisConfig {
    pub url: String,
}

impl RedisConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            url: env::var("REDIS_URL")
                .map_err(|_| ServiceError::Config("REDIS_URL not set".to_string()))?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    Redis,
}

impl std::str::FromStr for StorageBackend {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "memory" | "inmemory" => Ok(StorageBackend::Memory),
            "redis" => Ok(StorageBackend::Redis),
            other => Err(ServiceError::Config(format!(
                "Invalid STORAGE_BACKEND: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "compact" | "text" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            other => Err(ServiceError::Config(format!("Invalid LOG_FORMAT: {}", other))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BotConfig {
    pub port: u16,
    pub storage: StorageBackend,
    pub redis: Option<RedisConfig>,
    pub enable_telegram_polling: bool,
    pub telegram_token: Option<String>,
    pub metrics_port: Option<u16>,
    pub log_format: LogFormat,
}

impl BotConfig {
    pub fn from_env() -> Result<Self> {
        let port = env::var("PORT")
            .unwrap_or_else(|_| DEFAULT_PORT.to_string())
            .parse()
            .map_err(|e| ServiceError::Config(format!("Invalid PORT: {}", e)))?;

        let storage: StorageBackend = env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "memory".to_string())
            .parse()?;

        let redis = match storage {
            StorageBackend::Redis => Some(RedisConfig::from_env()?),
            StorageBackend::Memory => None,
        };

        let enable_telegram_polling = env::var("ENABLE_TELEGRAM_POLLING")
            .unwrap_or_else(|_| "false".to_string())
            .to_lowercase()
            == "true";

        let telegram_token = env::var("TELOXIDE_TOKEN").ok();
        if enable_telegram_polling && telegram_token.is_none() {
            return Err(ServiceError::Config(
                "TELOXIDE_TOKEN must be set when ENABLE_TELEGRAM_POLLING=true".to_string(),
            ));
        }

        let metrics_port = match env::var("METRICS_PORT") {
            Ok(value) => Some(
                value
                    .parse()
                    .map_err(|e| ServiceError::Config(format!("Invalid METRICS_PORT: {}", e)))?,
            ),
            Err(_) => None,
        };

        let log_format = env::var("LOG_FORMAT")
            .unwrap_or_else(|_| "compact".to_string())
            .parse()?;

        Ok(Self {
            port,
            storage,
            redis,
            enable_telegram_polling,
            telegram_token,
            metrics_port,
            log_format,
        })
    }
}
