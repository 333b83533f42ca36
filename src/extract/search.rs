//! Search result extraction
//!
//! Two passes, tried in order:
//!
//! 1. The embedded state object, when it carries a name listing. This is
//!    what the site's own client code renders from, so it is the most
//!    complete source.
//! 2. Result rows in the DOM, with nested selector fallbacks per field.

use crate::config::SiteConfig;
use crate::extract::document::{element_text, PageDocument};
use crate::extract::selector::{closest, first_within};
use crate::extract::state::{StateField, StructuredState};
use crate::model::{base_name, CardId, CardSummary, Category};
use regex::Regex;
use scraper::ElementRef;
use std::collections::HashSet;
use std::sync::LazyLock;

static CARD_LINK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"/card/([0-9]{5})/").unwrap());

/// Elements that make up one search result
const RESULT_ROWS: &str =
    ".card-item, .search-result-item, [data-card-id], .result-item, .card-list-item, tr[data-card-id]";

/// Row container searched upwards from a card's anchor element
const ROW_CONTAINERS: &str = ".card-item, .search-result-item, .result-item";

const NAME: &[&str] = &[".card-name", ".name", "h3", "h4", ".card-title", "td"];
const FULL_NAME: &[&str] = &[".full-name", ".card-full-name", ".card-name-full"];
const CATEGORY: &[&str] = &[".category", ".card-type", ".card-category"];
const DETAIL_LINK: &str = "a[href*=\"/card/\"]";

/// Extracts every card summary the page shows
///
/// Returns an empty list when the page has no results (yet); the caller
/// decides whether to poll again.
pub fn extract_summaries(doc: &PageDocument, site: &SiteConfig) -> Vec<CardSummary> {
    let summaries = match doc.state() {
        Some(state) if state.has_listing() => {
            let summaries = from_state(doc, state, site);
            tracing::debug!("Read {} summaries from embedded state", summaries.len());
            summaries
        }
        _ => {
            let summaries = from_rows(doc, site);
            tracing::debug!("Read {} summaries from result rows", summaries.len());
            summaries
        }
    };

    dedup_by_id(summaries)
}

fn from_state(doc: &PageDocument, state: &StructuredState, site: &SiteConfig) -> Vec<CardSummary> {
    state
        .card_ids()
        .filter_map(|raw| {
            let Ok(card_id) = CardId::parse(raw) else {
                tracing::debug!("Skipping malformed card id {:?} in state", raw);
                return None;
            };

            let alt_name = state.get(StateField::AltName, raw);
            let full_name = state
                .get(StateField::Name, raw)
                .or(alt_name)
                .unwrap_or_default()
                .to_string();
            let name = alt_name
                .map(str::to_string)
                .unwrap_or_else(|| base_name(&full_name).to_string());

            Some(CardSummary {
                image_url: state
                    .get(StateField::Picture, raw)
                    .and_then(|path| site.absolute_url(path)),
                detail_url: site.detail_url(&card_id, ""),
                category: category_near(doc, &card_id),
                card_id,
                name,
                full_name,
            })
        })
        .collect()
}

/// Category text of the result row holding `card_id`, if the DOM has one
fn category_near(doc: &PageDocument, card_id: &CardId) -> Category {
    let anchors = [
        format!("[data-card-id=\"{}\"]", card_id),
        format!("a[href*=\"/card/{}/\"]", card_id),
    ];

    anchors
        .iter()
        .find_map(|selector| doc.select_first(selector))
        .and_then(|anchor| closest(anchor, ROW_CONTAINERS))
        .and_then(|row| first_within(row, CATEGORY))
        .map(|el| Category::from_label_or_unknown(&element_text(el)))
        .unwrap_or(Category::Unknown)
}

fn from_rows(doc: &PageDocument, site: &SiteConfig) -> Vec<CardSummary> {
    doc.select_all(RESULT_ROWS)
        .into_iter()
        .filter_map(|row| {
            let summary = summary_from_row(doc, row, site);
            if summary.is_none() {
                tracing::trace!("Skipping result row without a card id");
            }
            summary
        })
        .collect()
}

fn summary_from_row(doc: &PageDocument, row: ElementRef<'_>, site: &SiteConfig) -> Option<CardSummary> {
    let link = first_within(row, &[DETAIL_LINK]);
    let card_id = row_card_id(row, link)?;

    let name = first_within(row, NAME).map(element_text).unwrap_or_default();
    let full_name = first_within(row, FULL_NAME)
        .map(element_text)
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| name.clone());
    let name = if name.is_empty() {
        base_name(&full_name).to_string()
    } else {
        name
    };

    let category = first_within(row, CATEGORY)
        .map(|el| Category::from_label_or_unknown(&element_text(el)))
        .unwrap_or(Category::Unknown);

    let state_picture = doc
        .state()
        .and_then(|state| state.get(StateField::Picture, card_id.as_str()));
    let image_url = state_picture
        .or_else(|| row_image(row))
        .and_then(|src| site.absolute_url(src));

    let detail_url = link
        .and_then(|a| a.value().attr("href"))
        .and_then(|href| site.absolute_url(href))
        .unwrap_or_else(|| site.detail_url(&card_id, ""));

    Some(CardSummary {
        card_id,
        name,
        full_name,
        category,
        image_url,
        detail_url,
    })
}

/// `data-card-id` on the row, else the id embedded in its detail link
fn row_card_id(row: ElementRef<'_>, link: Option<ElementRef<'_>>) -> Option<CardId> {
    let from_attr = row
        .value()
        .attr("data-card-id")
        .map(str::trim)
        .and_then(|raw| CardId::parse(raw).ok());

    from_attr.or_else(|| {
        let href = link?.value().attr("href")?;
        let captures = CARD_LINK.captures(href)?;
        CardId::parse(&captures[1]).ok()
    })
}

fn row_image<'a>(row: ElementRef<'a>) -> Option<&'a str> {
    let img = first_within(row, &["img"])?;
    let attrs = img.value();
    attrs
        .attr("src")
        .filter(|src| !src.trim().is_empty())
        .or_else(|| attrs.attr("data-src"))
        .filter(|src| !src.trim().is_empty())
}

/// Nested rows (a `.card-item` that also carries `data-card-id`, say)
/// report the same card twice; keep the first
fn dedup_by_id(summaries: Vec<CardSummary>) -> Vec<CardSummary> {
    let mut seen = HashSet::new();
    summaries
        .into_iter()
        .filter(|summary| seen.insert(summary.card_id.clone()))
        .collect()
}
