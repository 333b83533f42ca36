//! Configuration module for cardlens
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! A missing file is not an error at this layer: callers fall back to
//! [`Config::default`], which targets the public catalog with a one-second
//! request cadence.
//!
//! # Example
//!
//! ```no_run
//! use cardlens::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("cardlens.toml")).unwrap();
//! println!("Navigation timeout: {:?}", config.timing.navigation_timeout());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    BrowserConfig, Config, DiagnosticsConfig, SiteConfig, TimingConfig, DEFAULT_USER_AGENT,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
