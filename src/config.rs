//! # Configuration Module
//!
//! Process configuration read from the environment (optionally seeded from a
//! `.env` file), plus the lifecycle limits shared by the bot components.

use std::env;

use crate::errors::ConfigError;

// Constants for lifecycle configuration
pub const DEFAULT_CATALOG_PATH: &str = "dishes.json";
pub const DEFAULT_HISTORY_CAPACITY: usize = 400;
pub const DEFAULT_DELETE_CHUNK_SIZE: usize = 100;
/// Telegram's `deleteMessages` accepts at most 100 ids per call
pub const MAX_DELETE_CHUNK_SIZE: usize = 100;

/// Limits applied to each conversation's message bookkeeping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifecycleConfig {
    /// Maximum number of tracked message references per conversation
    pub history_capacity: usize,
    /// Number of references per bulk delete call
    pub delete_chunk_size: usize,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            delete_chunk_size: DEFAULT_DELETE_CHUNK_SIZE,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Complete process configuration
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub token: String,
    pub catalog_path: String,
    pub lifecycle: LifecycleConfig,
    pub log_format: LogFormat,
}

impl BotConfig {
    /// Read configuration from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = lookup("TELEGRAM_BOT_TOKEN")
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or(ConfigError::MissingToken)?;

        let catalog_path =
            lookup("CATALOG_PATH").unwrap_or_else(|| DEFAULT_CATALOG_PATH.to_string());

        let history_capacity = parse_positive(
            "HISTORY_CAPACITY",
            lookup("HISTORY_CAPACITY"),
            DEFAULT_HISTORY_CAPACITY,
        )?;
        let delete_chunk_size = parse_positive(
            "DELETE_CHUNK_SIZE",
            lookup("DELETE_CHUNK_SIZE"),
            DEFAULT_DELETE_CHUNK_SIZE,
        )?
        .min(MAX_DELETE_CHUNK_SIZE);

        let log_format = match lookup("LOG_FORMAT").as_deref() {
            Some(f) if f.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        Ok(Self {
            token,
            catalog_path,
            lifecycle: LifecycleConfig {
                history_capacity,
                delete_chunk_size,
            },
            log_format,
        })
    }
}

fn parse_positive(
    name: &'static str,
    value: Option<String>,
    default: usize,
) -> Result<usize, ConfigError> {
    match value {
        None => Ok(default),
        Some(raw) => match raw.trim().parse::<usize>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Err(ConfigError::InvalidNumber { name, value: raw }),
        },
    }
}
