//! Seoul catalog harvester: metadata export for the Seoul Open Data Plaza
//!
//! This crate pages through the open-data platform's service catalog, optionally
//! fetches the declared input/output parameters of every listed service, and
//! writes both datasets as JSON Lines and CSV.

pub mod api;
pub mod config;
pub mod fetch;
pub mod harvester;
pub mod ids;
pub mod output;

use thiserror::Error;

/// A single upstream row: field name to JSON value, in upstream field order
pub type Record = serde_json::Map<String, serde_json::Value>;

/// Main error type for harvester operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("GET failed after {attempts} attempts: {url}: {source}")]
    Transport {
        url: String,
        attempts: u32,
        source: reqwest::Error,
    },

    #[error("API error: {code} {message} (url={url})")]
    Api {
        code: String,
        message: String,
        url: String,
    },

    #[error("API key missing. Set --key or export SEOUL_API_KEY.")]
    MissingApiKey,

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),
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

/// Result type alias for harvester operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use api::{normalize, NormalizedPage, PageRequest};
pub use config::HarvestConfig;
pub use fetch::{fetch_full_catalog, fetch_io_params, HttpTransport, RetryPolicy, Transport};
pub use harvester::{HarvestPlan, Harvester};
pub use ids::{extract_service_ids, ServiceId};
