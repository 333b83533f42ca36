use crate::model::category::search_token;
use crate::model::CardId;
use serde::Serialize;

/// Filters for a catalog search
///
/// At least one field should be set; enforcing that is the caller's job
/// (see [`SearchQuery::is_empty`]).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    /// Substring of the card name
    pub name: Option<String>,
    /// Exact card id
    pub card_id: Option<CardId>,
    /// Category name, either a known label or free text passed through as-is
    pub category: Option<String>,
}

impl SearchQuery {
    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Returns true if no filter is set
    pub fn is_empty(&self) -> bool {
        self.name.as_deref().map_or(true, |n| n.trim().is_empty())
            && self.card_id.is_none()
            && self.category.as_deref().map_or(true, |c| c.trim().is_empty())
    }

    /// The category as the site's search form expects it
    pub fn category_token(&self) -> Option<String> {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(|c| search_token(c).to_string())
    }
}
