//! # Error Types Module
//!
//! Error taxonomy for the dish picker bot. Each error names the failure class
//! the bot recovers from (or refuses to start on), so callers can match on the
//! variant rather than on message text.

use thiserror::Error;

/// Errors raised while loading the dish catalog. Fatal at startup.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog file could not be read
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// The catalog is not valid JSON or a record lacks required fields
    #[error("malformed catalog: {0}")]
    Parse(#[from] serde_json::Error),
    /// A record has a blank name or category
    #[error("record #{index} has an empty {field}")]
    InvalidRecord { index: usize, field: &'static str },
    /// A record uses the category name reserved for "all categories"
    #[error("record #{index} uses the reserved category name {name:?}")]
    ReservedCategory { index: usize, name: String },
}

/// Raised when a random pick is requested from a catalog with no entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("the catalog has no dishes")]
pub struct EmptyCatalogError;

/// Any failure of a send, edit or delete call against the chat surface.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("telegram request failed: {0}")]
    Request(#[from] teloxide::RequestError),
    /// Rejection reported by a non-Telegram transport
    #[error("transport rejected the call: {0}")]
    Rejected(String),
}

/// Errors while decoding a button payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntentError {
    #[error("unknown payload {0:?}")]
    Unknown(String),
    #[error("invalid count {0:?}")]
    InvalidCount(String),
    #[error("empty category in payload")]
    EmptyCategory,
}

/// Errors while reading process configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("TELEGRAM_BOT_TOKEN must be set")]
    MissingToken,
    #[error("{name} must be a positive integer, got {value:?}")]
    InvalidNumber { name: &'static str, value: String },
}
