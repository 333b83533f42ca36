use super::{capture, close_page, Catalog};
use crate::browser::{scripts, PageHandle};
use crate::extract::{extract_summaries, plan_form, PageSnapshot};
use crate::model::{CardSummary, SearchQuery};
use crate::navigation::poll_until;
use crate::{CardError, Result};
use serde_json::Value;

impl Catalog {
    /// Searches the catalog
    ///
    /// Loads the search page, enters the query through the page's form and
    /// polls until results render. An empty list means nothing matched (or
    /// nothing rendered in time); a missing search page is reported the same
    /// way rather than as `NotFound`.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<CardSummary>)` - Matching cards, possibly none
    /// * `Err(CardError::Timeout)` - The search page did not load in time
    /// * `Err(CardError::Network)` - The browser could not be started or reached the site
    /// * `Err(CardError::Other)` - Any other browser failure
    pub async fn search(&self, query: &SearchQuery) -> Result<Vec<CardSummary>> {
        tracing::info!("Searching catalog for {:?}", query);

        let page = self.session.new_page_context().await?;
        let result = self.search_on(page.as_ref(), query).await;
        close_page(page).await;

        match &result {
            Ok(cards) => tracing::info!("Search returned {} cards", cards.len()),
            Err(e) => tracing::warn!("Search failed: {}", e),
        }
        result
    }

    async fn search_on(&self, page: &dyn PageHandle, query: &SearchQuery) -> Result<Vec<CardSummary>> {
        let url = self.config.site.search_url();
        let timeout = self.config.timing.navigation_timeout();

        match self.navigator.navigate(page, &url, timeout).await {
            Ok(()) => {}
            Err(CardError::NotFound { resource }) => {
                tracing::warn!("Search page {} reported not found", resource);
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        }

        let form_page = self.wait_for_content(page).await?;
        self.submit_query(page, &form_page, query).await;

        match self.poll_results(page).await {
            Some(cards) => Ok(cards),
            None => {
                self.report_empty(page).await;
                Ok(Vec::new())
            }
        }
    }

    /// Fills in and submits the search form
    ///
    /// Failures are logged and otherwise ignored; the results poll that
    /// follows decides what the search returns.
    async fn submit_query(&self, page: &dyn PageHandle, form_page: &PageSnapshot, query: &SearchQuery) {
        let actions = plan_form(&form_page.document(), query);
        if actions.is_empty() {
            tracing::debug!("Nothing to enter into the search form");
            return;
        }

        for action in &actions {
            match page.evaluate(&action.script()).await {
                Ok(Value::Bool(false)) | Ok(Value::Null) => {
                    tracing::warn!("Form action had no effect: {:?}", action)
                }
                Ok(_) => tracing::debug!("Form action applied: {:?}", action),
                Err(e) => tracing::warn!("Form action {:?} failed: {}", action, e),
            }
        }
    }

    /// Throttles, then polls until the page yields at least one result
    async fn poll_results(&self, page: &dyn PageHandle) -> Option<Vec<CardSummary>> {
        self.navigator.limiter().throttle().await;

        let site = &self.config.site;
        let timing = &self.config.timing;
        let outcome = poll_until(timing.poll_interval(), timing.poll_attempts, || async move {
            let snapshot = capture(page).await.ok()?;
            let cards = extract_summaries(&snapshot.document(), site);
            (!cards.is_empty()).then_some(cards)
        })
        .await;

        tracing::debug!("Result polling finished after {} attempts", outcome.attempts());
        outcome.into_option()
    }

    /// Logs what the page looked like when no results were found and, if
    /// configured, saves a screenshot
    async fn report_empty(&self, page: &dyn PageHandle) {
        match page.evaluate(scripts::PAGE_DIAGNOSTICS).await {
            Ok(info) => tracing::debug!("No results; page diagnostics: {}", info),
            Err(e) => tracing::debug!("No results; diagnostics unavailable: {}", e),
        }

        if let Some(path) = &self.config.diagnostics.screenshot_on_empty {
            match page.screenshot(path).await {
                Ok(()) => tracing::info!("Saved empty-result screenshot to {}", path.display()),
                Err(e) => tracing::warn!("Failed to save screenshot to {}: {}", path.display(), e),
            }
        }
    }
}
