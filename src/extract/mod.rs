//! Extraction module: turning rendered pages into typed records
//!
//! This module contains:
//! - Page snapshots and parsed documents ([`PageSnapshot`], [`PageDocument`])
//! - The embedded state object ([`StructuredState`])
//! - Ordered selector fallbacks ([`SelectorResolver`], [`Locator`])
//! - Search result and card detail extractors
//! - Search form planning
//!
//! Everything here is synchronous and works on an already captured page, so
//! it can be tested against plain HTML.

mod attributes;
mod detail;
mod document;
mod form;
mod moves;
mod search;
mod selector;
mod state;

pub use attributes::{
    extract_basic, extract_defense, extract_set_info, type_name, BasicAttributes, Defense, SetInfo,
};
pub use detail::extract_detail;
pub use document::{element_text, parse_selector, PageDocument, PageSnapshot};
pub use form::{plan_form, FormAction};
pub use moves::{clean_move_name, extract_moves};
pub use search::extract_summaries;
pub use selector::{closest, first_within, Locator, Match, Resolved, SelectorResolver};
pub use state::{StateField, StructuredState};
