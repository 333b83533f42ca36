//! Card records produced by extraction

use crate::model::Category;
use crate::CardError;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A catalog card identifier: exactly five ASCII digits
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CardId(String);

impl CardId {
    /// Validates and wraps a card id
    ///
    /// # Example
    ///
    /// ```
    /// use cardlens::CardId;
    ///
    /// assert!(CardId::parse("46326").is_ok());
    /// assert!(CardId::parse("4632").is_err());
    /// ```
    pub fn parse(raw: &str) -> Result<Self, CardError> {
        if Self::is_valid(raw) {
            Ok(Self(raw.to_string()))
        } else {
            Err(CardError::InvalidParameter(format!(
                "card id must be exactly 5 digits, got '{}'",
                raw
            )))
        }
    }

    /// Returns true if `raw` has the shape of a card id
    pub fn is_valid(raw: &str) -> bool {
        raw.len() == 5 && raw.bytes().all(|b| b.is_ascii_digit())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for CardId {
    type Err = CardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for CardId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// A search result entry
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardSummary {
    pub card_id: CardId,
    pub name: String,
    pub full_name: String,
    pub category: Category,
    pub image_url: Option<String>,
    pub detail_url: String,
}

/// Evolution stage of a Pokémon card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EvolutionStage {
    Base,
    Stage1,
    Stage2,
}

impl EvolutionStage {
    /// Parses the stage label printed on a card ("たね", "1進化", "2進化")
    pub fn from_site_label(text: &str) -> Option<Self> {
        let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
        match compact.as_str() {
            "たね" => Some(Self::Base),
            "1進化" => Some(Self::Stage1),
            "2進化" => Some(Self::Stage2),
            _ => None,
        }
    }
}

/// Where a detail record's category came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CategorySource {
    /// Read from a category element on the page
    Page,
    /// Guessed from other evidence (HP, moves); not confirmed by the page
    Inferred,
}

/// One move (waza) printed on a card
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Move {
    /// Heading text as extracted, damage digits included
    pub name: String,
    pub clean_name: String,
    pub energy_cost: Vec<String>,
    pub damage: Option<u32>,
    pub effect: String,
}

/// Full record for a single card
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardDetail {
    pub card_id: CardId,
    pub name: String,
    pub full_name: String,
    pub category: Category,
    pub category_source: CategorySource,
    pub image_url: Option<String>,
    pub detail_url: String,
    #[serde(rename = "type")]
    pub card_type: Option<String>,
    pub hp: Option<u32>,
    pub evolution_stage: Option<EvolutionStage>,
    pub weakness: Option<String>,
    pub resistance: Option<String>,
    pub retreat_cost: Option<u32>,
    pub set_name: Option<String>,
    pub set_code: Option<String>,
    pub card_number: Option<String>,
    pub rarity: Option<String>,
    pub moves: Vec<Move>,
}

/// Returns the part of a full card name before its first parenthesis
///
/// Both ASCII `(` and full-width `（` count.
///
/// ```
/// use cardlens::model::base_name;
///
/// assert_eq!(base_name("ピカチュウex (SV8 033/106)"), "ピカチュウex");
/// assert_eq!(base_name("Pikachu"), "Pikachu");
/// ```
pub fn base_name(full_name: &str) -> &str {
    full_name
        .split(['(', '（'])
        .next()
        .unwrap_or_default()
        .trim()
}
