use super::{close_page, Catalog};
use crate::browser::PageHandle;
use crate::extract::extract_detail;
use crate::model::{CardDetail, CardId};
use crate::{CardError, Result};

impl Catalog {
    /// Fetches the full record of one card
    ///
    /// `regulation` selects the `regu/` URL segment; `None` uses the
    /// configured default and an empty string leaves the segment out.
    ///
    /// # Returns
    ///
    /// * `Ok(CardDetail)` - The card, `card_id` equal to the input
    /// * `Err(CardError::NotFound)` - The site has no page for this card
    /// * `Err(CardError::Timeout)` - The page did not load in time
    /// * `Err(CardError::Network)` - The browser could not be started or reached the site
    /// * `Err(CardError::Other)` - Any other browser failure
    pub async fn detail(&self, card_id: &CardId, regulation: Option<&str>) -> Result<CardDetail> {
        let regulation = regulation.unwrap_or(self.config.site.default_regulation.as_str());
        let url = self.config.site.detail_url(card_id, regulation);
        tracing::info!("Fetching card {} from {}", card_id, url);

        let page = self.session.new_page_context().await?;
        let result = self.detail_on(page.as_ref(), card_id, url).await;
        close_page(page).await;

        match &result {
            Ok(detail) => tracing::info!(
                "Card {} extracted: {} ({} moves)",
                card_id,
                detail.full_name,
                detail.moves.len()
            ),
            Err(e) => tracing::warn!("Detail for card {} failed: {}", card_id, e),
        }
        result
    }

    async fn detail_on(&self, page: &dyn PageHandle, card_id: &CardId, url: String) -> Result<CardDetail> {
        let timeout = self.config.timing.navigation_timeout();

        self.navigator
            .navigate(page, &url, timeout)
            .await
            .map_err(|e| match e {
                CardError::NotFound { .. } => CardError::NotFound {
                    resource: format!("card {}", card_id),
                },
                other => other,
            })?;

        let snapshot = self.wait_for_content(page).await?;
        let detail = extract_detail(&snapshot.document(), card_id, url, &self.config.site);
        Ok(detail)
    }
}
