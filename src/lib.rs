//! cardlens: browser-driven card catalog extraction
//!
//! This crate drives a headless browser against a JavaScript-rendered trading
//! card catalog and turns whatever it finds (embedded client-side state, DOM
//! markup, plain page text) into typed card records.

pub mod browser;
pub mod catalog;
pub mod config;
pub mod extract;
pub mod model;
pub mod navigation;

use thiserror::Error;

/// Main error type for cardlens operations
#[derive(Debug, Error)]
pub enum CardError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("{resource} was not found")]
    NotFound { resource: String },

    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),

    /// Any failure the navigation layer could not classify, message preserved
    #[error("{0}")]
    Other(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Coarse classification of a [`CardError`], as seen by callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidParameter,
    NotFound,
    Timeout,
    Network,
    Other,
}

impl ErrorKind {
    /// HTTP-style status an outer API layer reports for this kind
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidParameter => 400,
            Self::NotFound => 404,
            Self::Timeout => 408,
            Self::Network => 503,
            Self::Other => 500,
        }
    }

    /// Machine-readable code paired with [`ErrorKind::status_code`]
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidParameter => "INVALID_PARAMETER",
            Self::NotFound => "NOT_FOUND",
            Self::Timeout => "TIMEOUT",
            Self::Network => "NETWORK_ERROR",
            Self::Other => "SERVER_ERROR",
        }
    }
}

impl CardError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidParameter(_) => ErrorKind::InvalidParameter,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Timeout(_) => ErrorKind::Timeout,
            Self::Network(_) => ErrorKind::Network,
            Self::Other(_) | Self::Config(_) | Self::Io(_) | Self::Json(_) => ErrorKind::Other,
        }
    }
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

/// Result type alias for cardlens operations
pub type Result<T> = std::result::Result<T, CardError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use catalog::Catalog;
pub use config::Config;
pub use model::{CardDetail, CardId, CardSummary, Category, Move, SearchQuery};
