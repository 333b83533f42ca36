//! Scalar attributes of a card detail page: HP, stage, type, defense, set

use crate::extract::document::{element_text, parse_selector, PageDocument};
use crate::extract::moves::icon_type;
use crate::extract::selector::{Locator, SelectorResolver};
use crate::model::EvolutionStage;
use regex::Regex;
use scraper::ElementRef;
use std::sync::LazyLock;

static HP: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"HP\s*([0-9]+)").unwrap());
static STAGE2: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"2\s*進化").unwrap());
static STAGE1: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"1\s*進化").unwrap());
static BASIC: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bたね\b").unwrap());
static SET_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Z][0-9]+[a-z]?)\s*([0-9]+/[0-9]+)").unwrap());
static LEADING_DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]+").unwrap());

/// HP, evolution stage and type
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BasicAttributes {
    pub hp: Option<u32>,
    pub evolution_stage: Option<EvolutionStage>,
    pub card_type: Option<String>,
}

/// Weakness, resistance and retreat cost
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Defense {
    pub weakness: Option<String>,
    pub resistance: Option<String>,
    pub retreat_cost: Option<u32>,
}

/// Expansion and rarity
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetInfo {
    pub set_name: Option<String>,
    pub set_code: Option<String>,
    pub card_number: Option<String>,
    pub rarity: Option<String>,
}

pub fn extract_basic(doc: &PageDocument) -> BasicAttributes {
    let resolver = SelectorResolver::new(doc);

    // a candidate without digits falls through to the next
    let hp = [Locator::Css("span.hp-num"), Locator::Text(&HP)]
        .iter()
        .find_map(|candidate| {
            let text = resolver.resolve_text(std::slice::from_ref(candidate))?;
            LEADING_DIGITS.find(&text)?.as_str().parse().ok()
        });

    BasicAttributes {
        hp,
        evolution_stage: evolution_stage(doc),
        card_type: card_type(doc),
    }
}

/// The stage label element wins; otherwise the page text is searched for
/// the most evolved stage mentioned
fn evolution_stage(doc: &PageDocument) -> Option<EvolutionStage> {
    if let Some(stage) = doc
        .select_first("span.type")
        .and_then(|el| EvolutionStage::from_site_label(&element_text(el)))
    {
        return Some(stage);
    }

    let text = doc.body_text();
    [
        (&*STAGE2, EvolutionStage::Stage2),
        (&*STAGE1, EvolutionStage::Stage1),
        (&*BASIC, EvolutionStage::Base),
    ]
    .into_iter()
    .find(|(pattern, _)| pattern.is_match(text))
    .map(|(_, stage)| stage)
}

fn card_type(doc: &PageDocument) -> Option<String> {
    let icon = doc.select_first(".type-icon, .pokemon-type")?;
    let suffix = icon.value().classes().find_map(icon_type)?;
    Some(type_name(suffix).to_string())
}

/// Display name of an energy type icon suffix; unknown suffixes pass through
pub fn type_name(suffix: &str) -> &str {
    match suffix {
        "grass" => "Grass",
        "fire" => "Fire",
        "water" => "Water",
        "lightning" => "Lightning",
        "psychic" => "Psychic",
        "fighting" => "Fighting",
        "dark" => "Darkness",
        "metal" => "Metal",
        "colorless" => "Colorless",
        "dragon" => "Dragon",
        "fairy" => "Fairy",
        other => other,
    }
}

/// Reads the weakness/resistance/retreat row
///
/// Only the second row of the first table is read, and only when it has at
/// least three cells.
pub fn extract_defense(doc: &PageDocument) -> Defense {
    let (Some(rows), Some(cells)) = (parse_selector("tr"), parse_selector("td")) else {
        return Defense::default();
    };

    let row = doc.select_first("table").and_then(|table| {
        let row = table.select(&rows).nth(1)?;
        let cells: Vec<ElementRef<'_>> = row.select(&cells).collect();
        (cells.len() >= 3).then_some(cells)
    });

    let Some(cells) = row else {
        tracing::debug!("No defense table on page");
        return Defense::default();
    };

    Defense {
        weakness: non_empty(element_text(cells[0])),
        resistance: non_empty(element_text(cells[1])),
        retreat_cost: retreat_cost(cells[2]),
    }
}

/// Leading number of the cell, else the number of energy icons in it
fn retreat_cost(cell: ElementRef<'_>) -> Option<u32> {
    if let Some(digits) = LEADING_DIGITS.find(&element_text(cell)) {
        return digits.as_str().parse().ok();
    }

    let icons = parse_selector("span.icon").map_or(0, |sel| cell.select(&sel).count());
    (icons > 0).then_some(icons as u32)
}

pub fn extract_set_info(doc: &PageDocument) -> SetInfo {
    let resolver = SelectorResolver::new(doc);

    let set_name = resolver.resolve_text(&[Locator::Css(".set-info"), Locator::Css(".card-set")]);
    let (set_code, card_number) = set_name
        .as_deref()
        .and_then(|text| SET_CODE.captures(text))
        .map(|c| (Some(c[1].to_string()), Some(c[2].to_string())))
        .unwrap_or_default();

    SetInfo {
        set_code,
        card_number,
        set_name,
        rarity: resolver.resolve_text(&[Locator::Css(".rarity"), Locator::Css(".card-rarity")]),
    }
}

fn non_empty(text: String) -> Option<String> {
    (!text.is_empty()).then_some(text)
}
