//! Planning how to drive the search form
//!
//! The search page is parsed once, each form control is located through an
//! ordered list of selectors, and the result is a list of [`FormAction`]s
//! the catalog replays against the live page as scripts.

use crate::browser::scripts;
use crate::extract::document::PageDocument;
use crate::extract::selector::SelectorResolver;
use crate::model::SearchQuery;

const NAME_INPUT: &[&str] = &[
    r#"input[name="card_name"]"#,
    r#"input[name="name"]"#,
    r#"input[placeholder*="カード名"]"#,
    "#card_name",
    "#name",
    r#"input[type="text"]"#,
];

const ID_INPUT: &[&str] = &[
    r#"input[name="card_id"]"#,
    r#"input[name="cardId"]"#,
    r#"input[placeholder*="カードID"]"#,
    "#card_id",
    "#cardId",
];

const CATEGORY_SELECT: &[&str] = &[
    r#"select[name="card_type"]"#,
    r#"select[name="category"]"#,
    r#"select[name="type"]"#,
    "#card_type",
    "#category",
];

const SUBMIT_BUTTON: &[&str] = &[
    r#"button[type="submit"]"#,
    r#"input[type="submit"]"#,
    "button.search-button",
    "button.btn-search",
    ".search-button",
    ".btn-search",
    r#"input[value*="検索"]"#,
];

/// One step of filling in and submitting the search form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormAction {
    Fill { selector: String, value: String },
    /// Choose the first option matching any candidate, in order
    Select { selector: String, candidates: Vec<String> },
    Click { selector: String },
    SubmitForm,
}

impl FormAction {
    /// The page script performing this action
    pub fn script(&self) -> String {
        match self {
            Self::Fill { selector, value } => scripts::fill_input(selector, value),
            Self::Select {
                selector,
                candidates,
            } => {
                let candidates: Vec<&str> = candidates.iter().map(String::as_str).collect();
                scripts::select_option(selector, &candidates)
            }
            Self::Click { selector } => scripts::click(selector),
            Self::SubmitForm => scripts::SUBMIT_FIRST_FORM.to_string(),
        }
    }
}

/// Works out the actions that submit `query` through the page's form
///
/// Filters whose control cannot be found are skipped with a warning. When
/// no filter could be entered the plan is empty.
pub fn plan_form(doc: &PageDocument, query: &SearchQuery) -> Vec<FormAction> {
    let resolver = SelectorResolver::new(doc);
    let mut actions = Vec::new();

    if let Some(name) = query.name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
        match resolver.first_css(NAME_INPUT) {
            Some((selector, _)) => actions.push(FormAction::Fill {
                selector: selector.to_string(),
                value: name.to_string(),
            }),
            None => tracing::warn!("No card name input on search page"),
        }
    }

    if let Some(card_id) = &query.card_id {
        match resolver.first_css(ID_INPUT) {
            Some((selector, _)) => actions.push(FormAction::Fill {
                selector: selector.to_string(),
                value: card_id.to_string(),
            }),
            None => tracing::warn!("No card id input on search page"),
        }
    }

    if let Some(token) = query.category_token() {
        match resolver.first_css(CATEGORY_SELECT) {
            Some((selector, _)) => {
                let mut candidates = vec![token];
                if let Some(raw) = query.category.as_deref().map(str::trim) {
                    if !candidates.iter().any(|c| c == raw) {
                        candidates.push(raw.to_string());
                    }
                }
                actions.push(FormAction::Select {
                    selector: selector.to_string(),
                    candidates,
                });
            }
            None => tracing::warn!("No category select on search page"),
        }
    }

    if actions.is_empty() {
        return actions;
    }

    match resolver.first_css(SUBMIT_BUTTON) {
        Some((selector, _)) => actions.push(FormAction::Click {
            selector: selector.to_string(),
        }),
        None => {
            tracing::debug!("No search button found, submitting the form directly");
            actions.push(FormAction::SubmitForm);
        }
    }

    actions
}
