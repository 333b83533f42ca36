//! Page snapshots and the parsed documents extraction runs over

use crate::browser::{scripts, BrowserResult, PageHandle};
use crate::extract::state::StructuredState;
use scraper::{ElementRef, Html, Selector};

/// Everything read from a live page in one pass
///
/// Plain owned data, so it can cross await points; parse it into a
/// [`PageDocument`] once all browser calls are done.
#[derive(Debug, Clone, Default)]
pub struct PageSnapshot {
    pub url: String,
    pub title: String,
    pub html: String,
    pub state: Option<StructuredState>,
}

impl PageSnapshot {
    /// Reads markup, title and embedded state from `page`
    ///
    /// A failing state script only means "no state"; markup and title
    /// failures are returned.
    pub async fn capture(page: &dyn PageHandle) -> BrowserResult<Self> {
        let html = page.content().await?;
        let title = page.title().await?;
        let url = page.url().await.unwrap_or_default();

        let state = match page.evaluate(scripts::STRUCTURED_STATE).await {
            Ok(value) => StructuredState::from_value(&value),
            Err(e) => {
                tracing::debug!("Embedded state unavailable on {}: {}", url, e);
                None
            }
        };

        Ok(Self {
            url,
            title,
            html,
            state,
        })
    }

    pub fn document(&self) -> PageDocument {
        PageDocument::parse(&self.html)
            .with_title(&self.title)
            .with_state(self.state.clone())
    }
}

/// A parsed page: DOM, title, plain text and embedded state
pub struct PageDocument {
    html: Html,
    title: String,
    body_text: String,
    state: Option<StructuredState>,
}

impl PageDocument {
    /// Parses markup; the title defaults to the document's `<title>`
    pub fn parse(markup: &str) -> Self {
        let html = Html::parse_document(markup);
        let title = parse_selector("title")
            .and_then(|sel| html.select(&sel).next().map(element_text))
            .unwrap_or_default();
        let body_text = page_text(&html);

        Self {
            html,
            title,
            body_text,
            state: None,
        }
    }

    /// Overrides the title when `title` is non-empty
    pub fn with_title(mut self, title: &str) -> Self {
        if !title.trim().is_empty() {
            self.title = title.trim().to_string();
        }
        self
    }

    pub fn with_state(mut self, state: Option<StructuredState>) -> Self {
        self.state = state;
        self
    }

    pub fn html(&self) -> &Html {
        &self.html
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn state(&self) -> Option<&StructuredState> {
        self.state.as_ref()
    }

    /// Visible text of the body, one line per text node
    pub fn body_text(&self) -> &str {
        &self.body_text
    }

    /// First element matching a CSS selector; `None` for invalid selectors
    pub fn select_first(&self, selector: &str) -> Option<ElementRef<'_>> {
        let selector = parse_selector(selector)?;
        self.html.select(&selector).next()
    }

    /// All elements matching a CSS selector, in document order
    pub fn select_all(&self, selector: &str) -> Vec<ElementRef<'_>> {
        match parse_selector(selector) {
            Some(selector) => self.html.select(&selector).collect(),
            None => Vec::new(),
        }
    }

    /// Coarse "something rendered" check: a heading or a non-empty title
    pub fn has_content_marker(&self) -> bool {
        self.select_first("h1, h2").is_some() || !self.title.is_empty()
    }
}

/// Parses a CSS selector, logging and discarding invalid ones
pub fn parse_selector(selector: &str) -> Option<Selector> {
    match Selector::parse(selector) {
        Ok(selector) => Some(selector),
        Err(e) => {
            tracing::trace!("Ignoring invalid selector {:?}: {:?}", selector, e);
            None
        }
    }
}

/// Text content of an element with whitespace runs collapsed
pub fn element_text(element: ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<String>())
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Text nodes under `<body>` outside scripts and styles, joined by newlines
fn page_text(html: &Html) -> String {
    let root = parse_selector("body")
        .and_then(|sel| html.select(&sel).next())
        .unwrap_or_else(|| html.root_element());

    root.descendants()
        .filter_map(|node| {
            let text = node.value().as_text()?;
            let parent_is_code = node
                .parent()
                .and_then(|p| p.value().as_element().map(|e| e.name()))
                .is_some_and(|name| matches!(name, "script" | "style" | "noscript"));
            if parent_is_code {
                return None;
            }
            let text = text.trim();
            (!text.is_empty()).then_some(text)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
