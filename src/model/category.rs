//! Card categories and the label/token mapping the catalog site uses

use serde::{Serialize, Serializer};
use std::fmt;

/// The kind of card a record describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Pokemon,
    Goods,
    Tool,
    Supporter,
    Stadium,
    Energy,
    /// No category could be recovered from the page
    Unknown,
}

impl Category {
    /// The six categories a card can actually belong to
    pub const ALL: [Category; 6] = [
        Self::Pokemon,
        Self::Goods,
        Self::Tool,
        Self::Supporter,
        Self::Stadium,
        Self::Energy,
    ];

    /// Human-readable label, also used for serialization
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pokemon => "Pokémon",
            Self::Goods => "Goods",
            Self::Tool => "Tool",
            Self::Supporter => "Supporter",
            Self::Stadium => "Stadium",
            Self::Energy => "Energy",
            Self::Unknown => "unknown",
        }
    }

    /// The label the catalog site itself prints
    pub fn site_label(&self) -> Option<&'static str> {
        match self {
            Self::Pokemon => Some("ポケモン"),
            Self::Goods => Some("グッズ"),
            Self::Tool => Some("ポケモンのどうぐ"),
            Self::Supporter => Some("サポート"),
            Self::Stadium => Some("スタジアム"),
            Self::Energy => Some("エネルギー"),
            Self::Unknown => None,
        }
    }

    /// Token the site's search form expects for this category
    pub fn site_token(&self) -> Option<&'static str> {
        match self {
            Self::Pokemon => Some("pokemon"),
            Self::Goods => Some("goods"),
            Self::Tool => Some("tool"),
            Self::Supporter => Some("support"),
            Self::Stadium => Some("stadium"),
            Self::Energy => Some("energy"),
            Self::Unknown => None,
        }
    }

    /// Parses a category from any of its labels or its site token
    ///
    /// Matching ignores surrounding whitespace and ASCII case. Returns `None`
    /// for text that names no known category.
    pub fn from_label(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        Self::ALL.into_iter().find(|category| {
            category.label().eq_ignore_ascii_case(text)
                || category.site_label() == Some(text)
                || category
                    .site_token()
                    .is_some_and(|token| token.eq_ignore_ascii_case(text))
        })
        .or_else(|| {
            // "Pokemon" without the accent
            text.eq_ignore_ascii_case("pokemon").then_some(Self::Pokemon)
        })
    }

    /// Like [`Category::from_label`], with unrecognized text mapped to `Unknown`
    pub fn from_label_or_unknown(text: &str) -> Self {
        Self::from_label(text).unwrap_or(Self::Unknown)
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

/// Maps a caller-supplied category name to the site's search token
///
/// Names that match no category are passed through unchanged.
pub fn search_token(name: &str) -> &str {
    Category::from_label(name)
        .and_then(|c| c.site_token())
        .unwrap_or(name)
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}
