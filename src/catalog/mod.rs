//! Catalog module: the public search and detail operations
//!
//! A [`Catalog`] wires the session manager, navigation controller, polling
//! and extraction together. Every operation opens its own page context and
//! closes it before returning, whatever the outcome.

mod detail;
mod search;

use crate::browser::{ChromiumLauncher, EngineLauncher, PageHandle, RateLimiter, SessionManager};
use crate::config::Config;
use crate::extract::PageSnapshot;
use crate::navigation::{classify_failure, poll_until, NavigationController};
use crate::Result;
use std::sync::Arc;

/// Entry point for catalog lookups
pub struct Catalog {
    config: Arc<Config>,
    session: Arc<SessionManager>,
    navigator: NavigationController,
}

impl Catalog {
    /// Creates a catalog whose browser engine is started by `launcher`
    ///
    /// Nothing is launched until the first operation runs.
    pub fn new(config: Config, launcher: Arc<dyn EngineLauncher>) -> Self {
        let session = SessionManager::new(launcher, config.browser.user_agent.clone());
        let navigator = NavigationController::new(RateLimiter::new(config.timing.request_delay()));

        Self {
            config: Arc::new(config),
            session: Arc::new(session),
            navigator,
        }
    }

    /// Creates a catalog backed by a local Chrome/Chromium
    pub fn with_chromium(config: Config) -> Self {
        let launcher = ChromiumLauncher::new(config.browser.clone());
        Self::new(config, Arc::new(launcher))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    /// Tears down the browser engine; later operations relaunch it
    pub async fn shutdown(&self) -> Result<()> {
        self.session.release().await
    }

    /// Waits, boundedly, for the page to show any heading or a title
    ///
    /// Returns the first ready snapshot, or a fresh one when none became
    /// ready. Exhausting the attempts is not an error: extraction then runs
    /// on whatever is there.
    async fn wait_for_content(&self, page: &dyn PageHandle) -> Result<PageSnapshot> {
        self.navigator.limiter().throttle().await;

        let timing = &self.config.timing;
        let outcome = poll_until(timing.poll_interval(), timing.poll_attempts, || async move {
            let snapshot = capture(page).await.ok()?;
            let ready = snapshot.document().has_content_marker();
            ready.then_some(snapshot)
        })
        .await;

        match outcome.into_option() {
            Some(snapshot) => Ok(snapshot),
            None => {
                tracing::debug!("No content marker appeared, extracting anyway");
                capture(page).await
            }
        }
    }
}

/// Captures a snapshot, classifying browser failures
async fn capture(page: &dyn PageHandle) -> Result<PageSnapshot> {
    PageSnapshot::capture(page).await.map_err(|e| {
        tracing::debug!("Snapshot failed: {}", e);
        classify_failure(e.message())
    })
}

/// Closes a page context, logging rather than propagating failures
async fn close_page(page: Box<dyn PageHandle>) {
    if let Err(e) = page.close().await {
        tracing::warn!("Failed to close page: {}", e);
    }
}
