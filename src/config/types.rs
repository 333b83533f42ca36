use crate::model::CardId;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Default client signature presented to the catalog site
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Main configuration structure for cardlens
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub browser: BrowserConfig,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub diagnostics: DiagnosticsConfig,
}

/// Target site routing conventions
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Scheme and host of the catalog, without trailing slash
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Path of the search page
    #[serde(rename = "search-path")]
    pub search_path: String,

    /// Path prefix of card detail pages; the card id and a slash are appended
    #[serde(rename = "detail-path")]
    pub detail_path: String,

    /// Regulation segment used when the caller does not pass one
    #[serde(rename = "default-regulation")]
    pub default_regulation: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.pokemon-card.com".to_string(),
            search_path: "/card-search/".to_string(),
            detail_path: "/card-search/details.php/card/".to_string(),
            default_regulation: "SV".to_string(),
        }
    }
}

impl SiteConfig {
    /// URL of the search page
    pub fn search_url(&self) -> String {
        format!("{}{}", self.base_url, self.search_path)
    }

    /// URL of a card's detail page
    ///
    /// An empty `regulation` omits the `regu/` segment.
    pub fn detail_url(&self, card_id: &CardId, regulation: &str) -> String {
        let mut url = format!("{}{}{}/", self.base_url, self.detail_path, card_id);
        if !regulation.is_empty() {
            url.push_str("regu/");
            url.push_str(regulation);
            url.push('/');
        }
        url
    }

    /// Resolves a site-relative path or URL against the base URL
    ///
    /// Returns `None` if either side cannot be parsed.
    pub fn absolute_url(&self, href: &str) -> Option<String> {
        let base = Url::parse(&self.base_url).ok()?;
        base.join(href.trim()).ok().map(String::from)
    }
}

/// Browser process configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// User-agent string set on every page context
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Run without a visible window
    pub headless: bool,

    /// Explicit Chrome/Chromium binary; auto-detected when absent
    pub executable: Option<PathBuf>,

    /// Additional command-line switches passed to the browser
    #[serde(rename = "extra-args")]
    pub extra_args: Vec<String>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            headless: true,
            executable: None,
            extra_args: Vec::new(),
        }
    }
}

/// Request cadence and wait bounds
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Fixed delay before each navigation and each polling cycle (milliseconds)
    #[serde(rename = "request-delay-ms")]
    pub request_delay_ms: u64,

    /// Upper bound on a single page load (milliseconds)
    #[serde(rename = "navigation-timeout-ms")]
    pub navigation_timeout_ms: u64,

    /// Spacing between polling attempts (milliseconds)
    #[serde(rename = "poll-interval-ms")]
    pub poll_interval_ms: u64,

    /// Maximum number of polling attempts
    #[serde(rename = "poll-attempts")]
    pub poll_attempts: u32,
}

impl TimingConfig {
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_millis(self.navigation_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            request_delay_ms: 1000,
            navigation_timeout_ms: 30_000,
            poll_interval_ms: 1000,
            poll_attempts: 5,
        }
    }
}

/// Debugging aids for empty search results
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DiagnosticsConfig {
    /// Where to save a screenshot when a search comes back empty
    #[serde(rename = "screenshot-on-empty")]
    pub screenshot_on_empty: Option<PathBuf>,
}
