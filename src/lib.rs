//! Railsnap: an append-only ingestor for real-time transit arrivals
//!
//! This crate pulls paginated arrival records from an upstream open-data API,
//! stores every fetched record losslessly keyed by content hash, and enforces
//! a daily call-volume budget against an append-only call ledger.

pub mod budget;
pub mod canonical;
pub mod config;
pub mod provider;
pub mod runner;
pub mod storage;
pub mod window;

use thiserror::Error;

/// Main error type for Railsnap operations
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Fetch error: {0}")]
    Fetch(#[from] provider::FetchError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

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

    #[error("Invalid base URL in config: {0}")]
    InvalidUrl(String),

    #[error("Unknown timezone: {0}")]
    InvalidTimezone(String),
}

/// Result type alias for Railsnap operations
pub type Result<T> = std::result::Result<T, IngestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use budget::Plan;
pub use canonical::{canonical_form, payload_hash, Payload};
pub use config::Config;
pub use runner::{RunStatus, RunSummary};
pub use window::PageWindow;
