//! Browser module: the seam between extraction logic and a real browser
//!
//! This module contains:
//! - The [`BrowserEngine`] / [`PageHandle`] traits every browser backend implements
//! - [`EngineLauncher`], which starts an engine on demand
//! - The [`SessionManager`] owning the process-wide engine
//! - The fixed-delay [`RateLimiter`]
//! - A Chromium backend built on chromiumoxide
//! - Network-quiet detection used to decide when a load has settled
//! - The page scripts used to read embedded state and drive forms

mod chromium;
pub mod idle;
mod rate_limit;
pub mod scripts;
mod session;

pub use chromium::{ChromiumEngine, ChromiumLauncher, ChromiumPage};
pub use rate_limit::RateLimiter;
pub use session::SessionManager;

use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Failures reported by a browser backend
///
/// Messages are kept verbatim: the navigation layer classifies failures by
/// inspecting them.
#[derive(Debug, Clone, Error)]
pub enum BrowserError {
    #[error("failed to launch browser: {0}")]
    Launch(String),

    #[error("navigation failed: {0}")]
    Navigation(String),

    #[error("script evaluation failed: {0}")]
    Evaluation(String),

    #[error("browser operation failed: {0}")]
    Protocol(String),

    #[error("browser has been shut down")]
    Closed,
}

impl BrowserError {
    /// The raw message without the variant prefix
    pub fn message(&self) -> &str {
        match self {
            Self::Launch(m) | Self::Navigation(m) | Self::Evaluation(m) | Self::Protocol(m) => m,
            Self::Closed => "browser has been shut down",
        }
    }
}

/// Result type for browser operations
pub type BrowserResult<T> = Result<T, BrowserError>;

/// A single isolated page context (tab)
#[async_trait]
pub trait PageHandle: Send + Sync {
    /// Presents `user_agent` on every subsequent request from this page
    async fn set_user_agent(&self, user_agent: &str) -> BrowserResult<()>;

    /// Loads `url` and waits until the page has settled: the load event has
    /// fired and the network has gone quiet (see [`idle`])
    ///
    /// No timeout is applied here; callers bound the call themselves.
    async fn goto(&self, url: &str) -> BrowserResult<()>;

    /// Current document title
    async fn title(&self) -> BrowserResult<String>;

    /// Current URL
    async fn url(&self) -> BrowserResult<String>;

    /// Serialized DOM of the current document
    async fn content(&self) -> BrowserResult<String>;

    /// Evaluates a script and returns its JSON-converted result
    ///
    /// `undefined` and `null` both come back as `Value::Null`.
    async fn evaluate(&self, script: &str) -> BrowserResult<serde_json::Value>;

    /// Writes a PNG screenshot of the viewport to `path`
    async fn screenshot(&self, path: &Path) -> BrowserResult<()>;

    /// Closes the page context
    async fn close(self: Box<Self>) -> BrowserResult<()>;
}

/// A running browser process able to open page contexts
#[async_trait]
pub trait BrowserEngine: Send + Sync {
    async fn new_page(&self) -> BrowserResult<Box<dyn PageHandle>>;

    /// Terminates the browser process
    async fn shutdown(&self) -> BrowserResult<()>;
}

/// Starts a [`BrowserEngine`]
#[async_trait]
pub trait EngineLauncher: Send + Sync {
    async fn launch(&self) -> BrowserResult<Arc<dyn BrowserEngine>>;
}
