//! Move (waza) section of a card detail page

use crate::extract::document::{element_text, PageDocument};
use crate::model::Move;
use regex::Regex;
use scraper::ElementRef;
use std::sync::LazyLock;

static DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]+").unwrap());
static ICON_TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"icon-[a-z]+").unwrap());
static TRAILING_DAMAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]+)\s*[+×]?$").unwrap());

/// Heading text that opens the move section
const SECTION_MARKER: &str = "ワザ";
/// Text that marks the evolution section, which ends the move section
const EVOLUTION_MARKER: &str = "進化";

/// Extracts moves in page order
///
/// Starts at the first `h2` mentioning the move section and walks its
/// following siblings until a table or the evolution section. Each `h4` on
/// the way is one move; a `p` directly after it is the effect text.
pub fn extract_moves(doc: &PageDocument) -> Vec<Move> {
    let Some(section) = doc
        .select_all("h2")
        .into_iter()
        .find(|h2| element_text(*h2).contains(SECTION_MARKER))
    else {
        tracing::debug!("No move section on page");
        return Vec::new();
    };

    let mut moves = Vec::new();
    for sibling in section.next_siblings().filter_map(ElementRef::wrap) {
        if sibling.value().name() == "table" || element_text(sibling).contains(EVOLUTION_MARKER) {
            break;
        }
        if sibling.value().name() == "h4" {
            moves.push(parse_move(sibling));
        }
    }

    tracing::debug!("Extracted {} moves", moves.len());
    moves
}

fn parse_move(heading: ElementRef<'_>) -> Move {
    let name = element_text(heading);

    let damage = TRAILING_DAMAGE
        .captures(&name)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok());

    let effect = heading
        .next_siblings()
        .find_map(ElementRef::wrap)
        .filter(|next| next.value().name() == "p")
        .map(element_text)
        .unwrap_or_default();

    Move {
        clean_name: clean_move_name(&name),
        energy_cost: energy_cost(heading),
        damage,
        effect,
        name,
    }
}

/// Energy types from the `span.icon` elements of a move heading, in order
fn energy_cost(heading: ElementRef<'_>) -> Vec<String> {
    let Some(selector) = crate::extract::document::parse_selector("span.icon") else {
        return Vec::new();
    };

    heading
        .select(&selector)
        .filter_map(|span| span.value().classes().find_map(icon_type))
        .map(str::to_string)
        .collect()
}

/// `icon-fire` → `fire`; `None` for any other class
pub(crate) fn icon_type(class: &str) -> Option<&str> {
    class
        .strip_prefix("icon-")
        .filter(|t| !t.is_empty() && t.bytes().all(|b| b.is_ascii_lowercase()))
}

/// Strips damage digits, icon class tokens and trailing damage modifiers
/// from a move heading
///
/// Applying it to its own output changes nothing.
///
/// ```
/// use cardlens::extract::clean_move_name;
///
/// assert_eq!(clean_move_name("icon-fire icon-colorless かえんほうしゃ 60"), "かえんほうしゃ");
/// assert_eq!(clean_move_name("でんげき 30+"), "でんげき");
/// ```
pub fn clean_move_name(raw: &str) -> String {
    let mut current = raw.to_string();
    loop {
        let next = clean_once(&current);
        if next == current {
            return next;
        }
        current = next;
    }
}

fn clean_once(text: &str) -> String {
    let text = DIGITS.replace_all(text, "");
    let text = ICON_TOKEN.replace_all(&text, "");
    let text = text
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    text.trim_end_matches(|c: char| c == '+' || c == '×' || c.is_whitespace())
        .to_string()
}
