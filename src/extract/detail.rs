//! Card detail extraction
//!
//! The detail page is parsed once; independent sub-extractors (moves, basic
//! attributes, defense row, set info) each read the same document and their
//! results are merged into one [`CardDetail`]. None of them fail: anything
//! the page does not show is left empty.

use crate::config::SiteConfig;
use crate::extract::attributes::{extract_basic, extract_defense, extract_set_info};
use crate::extract::document::{element_text, PageDocument};
use crate::extract::moves::extract_moves;
use crate::extract::selector::{Locator, Match, SelectorResolver};
use crate::extract::state::StateField;
use crate::model::{base_name, CardDetail, CardId, Category, CategorySource};

const CATEGORY: &[&str] = &[".category", ".card-type", ".card-category"];

/// Builds the detail record for `card_id` from its parsed page
pub fn extract_detail(
    doc: &PageDocument,
    card_id: &CardId,
    detail_url: String,
    site: &SiteConfig,
) -> CardDetail {
    let moves = extract_moves(doc);
    let basic = extract_basic(doc);
    let defense = extract_defense(doc);
    let set = extract_set_info(doc);

    let full_name = full_name(doc);
    let (category, category_source) = match page_category(doc) {
        Some(category) => (category, CategorySource::Page),
        None if basic.hp.is_some() || !moves.is_empty() => {
            (Category::Pokemon, CategorySource::Inferred)
        }
        None => (Category::Unknown, CategorySource::Inferred),
    };
    tracing::debug!(
        "Card {} category {} ({:?})",
        card_id,
        category,
        category_source
    );

    CardDetail {
        card_id: card_id.clone(),
        name: base_name(&full_name).to_string(),
        image_url: image_url(doc, card_id, site),
        full_name,
        category,
        category_source,
        detail_url,
        card_type: basic.card_type,
        hp: basic.hp,
        evolution_stage: basic.evolution_stage,
        weakness: defense.weakness,
        resistance: defense.resistance,
        retreat_cost: defense.retreat_cost,
        set_name: set.set_name,
        set_code: set.set_code,
        card_number: set.card_number,
        rarity: set.rarity,
        moves,
    }
}

/// `h1`, then `.card-name`, then the leading segment of the page title
fn full_name(doc: &PageDocument) -> String {
    SelectorResolver::new(doc)
        .resolve_text(&[Locator::Css("h1"), Locator::Css(".card-name")])
        .unwrap_or_else(|| {
            doc.title()
                .split(['|', '｜'])
                .next()
                .unwrap_or_default()
                .trim()
                .to_string()
        })
}

fn image_url(doc: &PageDocument, card_id: &CardId, site: &SiteConfig) -> Option<String> {
    let resolved = SelectorResolver::new(doc).resolve_first(&[
        Locator::State {
            field: StateField::Picture,
            card_id: card_id.as_str(),
        },
        Locator::Css("img.fit"),
        Locator::Css(".card-image img"),
        Locator::Css("img[src*='card_images']"),
    ])?;

    let src = match resolved.matched {
        Match::State(path) => path,
        Match::Element(img) => img.value().attr("src")?,
        Match::Text(_) => return None,
    };
    site.absolute_url(src)
}

/// A category shown on the page: a dedicated element, or a section heading
/// that is exactly a category label
fn page_category(doc: &PageDocument) -> Option<Category> {
    let from_element = SelectorResolver::new(doc)
        .first_css(CATEGORY)
        .and_then(|(_, el)| Category::from_label(&element_text(el)))
        .filter(Category::is_known);

    from_element.or_else(|| {
        doc.select_all("h2")
            .into_iter()
            .find_map(|h2| Category::from_label(&element_text(h2)).filter(Category::is_known))
    })
}
