//! Ordered fallback resolution of logical fields
//!
//! A field is described by a list of [`Locator`]s in priority order. The
//! conventional ordering is embedded state first, DOM selectors second and
//! whole-page text patterns last, so extraction degrades gradually as the
//! site's markup drifts.

use crate::extract::document::{element_text, parse_selector, PageDocument};
use crate::extract::state::StateField;
use regex::Regex;
use scraper::ElementRef;

/// One strategy for locating a field
#[derive(Debug, Clone, Copy)]
pub enum Locator<'a> {
    /// A field of the embedded state object, keyed by card id
    State { field: StateField, card_id: &'a str },
    /// A CSS selector against the DOM
    Css(&'a str),
    /// A pattern against the whole page text; yields capture group 1 when
    /// the pattern has one, else the whole match
    Text(&'a Regex),
}

/// What a locator found
#[derive(Debug, Clone)]
pub enum Match<'d> {
    State(&'d str),
    Element(ElementRef<'d>),
    Text(String),
}

impl<'d> Match<'d> {
    /// The matched value as text
    pub fn text(&self) -> String {
        match self {
            Self::State(value) => value.to_string(),
            Self::Element(element) => element_text(*element),
            Self::Text(text) => text.clone(),
        }
    }

    pub fn element(&self) -> Option<ElementRef<'d>> {
        match self {
            Self::Element(element) => Some(*element),
            _ => None,
        }
    }
}

/// A successful resolution
#[derive(Debug, Clone)]
pub struct Resolved<'d> {
    /// Position of the winning locator in the candidate list
    pub index: usize,
    pub matched: Match<'d>,
}

/// Resolves candidate locators against one parsed page
pub struct SelectorResolver<'d> {
    doc: &'d PageDocument,
}

impl<'d> SelectorResolver<'d> {
    pub fn new(doc: &'d PageDocument) -> Self {
        Self { doc }
    }

    /// Returns the match of the first candidate that matches anything
    ///
    /// Later candidates are never consulted once an earlier one matches.
    pub fn resolve_first(&self, candidates: &[Locator<'_>]) -> Option<Resolved<'d>> {
        candidates.iter().enumerate().find_map(|(index, locator)| {
            let matched = self.try_locator(locator)?;
            tracing::trace!("Resolved {:?} at candidate {}", locator, index);
            Some(Resolved { index, matched })
        })
    }

    /// Like [`SelectorResolver::resolve_first`], but a candidate only counts
    /// when its matched text is non-empty
    pub fn resolve_text(&self, candidates: &[Locator<'_>]) -> Option<String> {
        candidates.iter().find_map(|locator| {
            let text = self.try_locator(locator)?.text();
            (!text.is_empty()).then_some(text)
        })
    }

    /// Returns the first CSS selector (and its element) that matches
    ///
    /// Used when the winning selector itself is needed, e.g. to act on the
    /// element in a live page.
    pub fn first_css<'s>(&self, selectors: &[&'s str]) -> Option<(&'s str, ElementRef<'d>)> {
        selectors
            .iter()
            .find_map(|selector| Some((*selector, self.doc.select_first(selector)?)))
    }

    fn try_locator(&self, locator: &Locator<'_>) -> Option<Match<'d>> {
        match *locator {
            Locator::State { field, card_id } => {
                let value = self.doc.state()?.get(field, card_id)?;
                Some(Match::State(value))
            }
            Locator::Css(selector) => self.doc.select_first(selector).map(Match::Element),
            Locator::Text(pattern) => {
                let captures = pattern.captures(self.doc.body_text())?;
                let text = captures.get(1).or_else(|| captures.get(0))?;
                Some(Match::Text(text.as_str().to_string()))
            }
        }
    }
}

/// First descendant of `scope` matching any of `selectors`, tried in order
pub fn first_within<'a>(scope: ElementRef<'a>, selectors: &[&str]) -> Option<ElementRef<'a>> {
    selectors.iter().find_map(|selector| {
        let selector = parse_selector(selector)?;
        let found = scope.select(&selector).next();
        found
    })
}

/// Nearest element, starting with `element` itself, matching `selector`
pub fn closest<'a>(element: ElementRef<'a>, selector: &str) -> Option<ElementRef<'a>> {
    let selector = parse_selector(selector)?;
    std::iter::once(element)
        .chain(element.ancestors().filter_map(ElementRef::wrap))
        .find(|candidate| selector.matches(candidate))
}
