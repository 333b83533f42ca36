//! Page loading and failure classification

use crate::browser::{PageHandle, RateLimiter};
use crate::CardError;
use std::time::Duration;

/// Title fragments the catalog shows on its "missing page" responses
const NOT_FOUND_MARKERS: [&str; 2] = ["404", "見つかりません"];

/// Classifies a raw navigation failure message
///
/// | Message contains | Result |
/// |------------------|--------|
/// | `timeout` / `Timeout` / `timed out` | `CardError::Timeout` |
/// | `net::ERR` / `ECONNREFUSED` | `CardError::Network` |
/// | anything else | `CardError::Other`, message unchanged |
pub fn classify_failure(message: &str) -> CardError {
    if message.contains("timeout") || message.contains("Timeout") || message.contains("timed out")
    {
        CardError::Timeout(message.to_string())
    } else if message.contains("net::ERR") || message.contains("ECONNREFUSED") {
        CardError::Network(message.to_string())
    } else {
        CardError::Other(message.to_string())
    }
}

/// Returns true if a page title reports a missing resource
pub fn is_not_found_title(title: &str) -> bool {
    NOT_FOUND_MARKERS.iter().any(|marker| title.contains(marker))
}

/// Loads URLs into page contexts with a bounded wait
#[derive(Debug, Clone, Copy)]
pub struct NavigationController {
    limiter: RateLimiter,
}

impl NavigationController {
    pub fn new(limiter: RateLimiter) -> Self {
        Self { limiter }
    }

    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    /// Loads `url` into `page`
    ///
    /// Throttles first, then waits for the page to settle for at most
    /// `timeout`. Never retries.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The page loaded and does not report itself missing
    /// * `Err(CardError::NotFound)` - The page title carries a not-found marker
    /// * `Err(CardError::Timeout)` - The load exceeded `timeout` or reported a timeout
    /// * `Err(CardError::Network)` - Transport-level failure
    /// * `Err(CardError::Other)` - Any other failure, message preserved
    pub async fn navigate(
        &self,
        page: &dyn PageHandle,
        url: &str,
        timeout: Duration,
    ) -> Result<(), CardError> {
        self.limiter.throttle().await;

        tracing::debug!("Navigating to {}", url);
        match tokio::time::timeout(timeout, page.goto(url)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                tracing::warn!("Navigation to {} failed: {}", url, e);
                return Err(classify_failure(e.message()));
            }
            Err(_) => {
                tracing::warn!("Navigation to {} exceeded {:?}", url, timeout);
                return Err(CardError::Timeout(format!(
                    "navigation to {} exceeded {}ms",
                    url,
                    timeout.as_millis()
                )));
            }
        }

        let title = page
            .title()
            .await
            .map_err(|e| classify_failure(e.message()))?;
        tracing::debug!("Loaded {} (title: {:?})", url, title);

        if is_not_found_title(&title) {
            return Err(CardError::NotFound {
                resource: url.to_string(),
            });
        }

        Ok(())
    }
}
