//! Feed-Harvest: incremental record collection from growing result feeds
//!
//! This crate drives paginated or infinite-scroll result feeds, extracts
//! structured records from each newly visible item, deduplicates them, and
//! stops once a target count is reached or the feed stops growing.

pub mod collect;
pub mod config;
pub mod diagnostics;
pub mod model;
pub mod output;
pub mod server;
pub mod service;
pub mod source;

use thiserror::Error;

/// Main error type for Feed-Harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("Plugin not found for site: {0}")]
    UnknownSource(String),

    #[error("Source '{id}' is unavailable: {reason}")]
    Unavailable { id: String, reason: String },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Errors raised by a feed view while reading or advancing
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Unexpected status {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("Malformed feed payload from {origin}: {message}")]
    Decode { origin: String, message: String },

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Per-item extraction failures
///
/// These never abort a run; the collection loop logs and skips the item.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("item {handle} is not a JSON object")]
    NotAnObject { handle: String },

    #[error("item {handle} has none of the expected fields")]
    NoFields { handle: String },
}

/// Result type alias for Feed-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for feed view operations
pub type SourceResult<T> = std::result::Result<T, SourceError>;

// Re-export commonly used types
pub use collect::{collect, CollectionResult, StopPolicy, StopReason};
pub use config::Config;
pub use diagnostics::Diagnostics;
pub use model::{RawItem, Record, RunRequest};
