//! The catalog's embedded client-side state object

use serde_json::Value;
use std::collections::BTreeMap;

/// Sub-fields of the embedded state that are keyed by card id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateField {
    /// Full card name, set suffix included
    Name,
    /// Short display name
    AltName,
    /// Site-relative image path
    Picture,
}

/// What the page's embedded state object knows about cards
///
/// Each map is keyed by card id. `names` is `None` when the page defined no
/// name listing at all, which is different from an empty listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructuredState {
    names: Option<BTreeMap<String, String>>,
    alt_names: BTreeMap<String, String>,
    pictures: BTreeMap<String, String>,
}

impl StructuredState {
    /// Builds the state from the value returned by
    /// [`STRUCTURED_STATE`](crate::browser::scripts::STRUCTURED_STATE)
    ///
    /// Returns `None` when the page had no state object. Entries whose value
    /// is not a string are dropped.
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;

        Some(Self {
            names: object.get("names").and_then(string_map),
            alt_names: object
                .get("altNames")
                .and_then(string_map)
                .unwrap_or_default(),
            pictures: object
                .get("pictures")
                .and_then(string_map)
                .unwrap_or_default(),
        })
    }

    /// Returns true if the page published a name listing (possibly empty)
    pub fn has_listing(&self) -> bool {
        self.names.is_some()
    }

    /// Card ids in the name listing, in ascending order
    pub fn card_ids(&self) -> impl Iterator<Item = &str> {
        self.names.iter().flat_map(|names| names.keys().map(String::as_str))
    }

    /// Looks up a non-empty field value for `card_id`
    pub fn get(&self, field: StateField, card_id: &str) -> Option<&str> {
        let map = match field {
            StateField::Name => self.names.as_ref()?,
            StateField::AltName => &self.alt_names,
            StateField::Picture => &self.pictures,
        };

        map.get(card_id)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    }
}

fn string_map(value: &Value) -> Option<BTreeMap<String, String>> {
    let object = value.as_object()?;

    Some(
        object
            .iter()
            .filter_map(|(key, value)| Some((key.clone(), value.as_str()?.to_string())))
            .collect(),
    )
}
