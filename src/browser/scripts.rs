//! Page scripts evaluated through [`PageHandle::evaluate`](super::PageHandle::evaluate)
//!
//! Arguments are embedded as JSON literals so selectors and user input never
//! need manual escaping.

use serde_json::json;

/// Reads the catalog's embedded client-side state (`window.PCGDECK`)
///
/// Evaluates to `null` when the object is absent. Each map is `null` when the
/// page did not define it.
pub const STRUCTURED_STATE: &str = r#"(() => {
  const deck = window.PCGDECK;
  if (!deck) return null;
  const pick = (v) => (v && typeof v === 'object') ? v : null;
  return {
    names: pick(deck.searchItemName),
    altNames: pick(deck.searchItemNameAlt),
    pictures: pick(deck.searchItemCardPict),
  };
})()"#;

/// Summarizes the page for logging when a search comes back empty
pub const PAGE_DIAGNOSTICS: &str = r#"(() => ({
  url: window.location.href,
  title: document.title,
  hasState: !!window.PCGDECK,
  stateKeys: window.PCGDECK ? Object.keys(window.PCGDECK) : [],
  resultRows: document.querySelectorAll('.card-item, .search-result, [data-card-id], .result-item, table tbody tr').length,
  tables: document.querySelectorAll('table').length,
  lists: document.querySelectorAll('ul, ol').length,
  bodyText: document.body ? document.body.innerText.substring(0, 500) : '',
}))()"#;

/// Sets the value of the first element matching `selector`
///
/// Fires `input` and `change` so client-side handlers see the new value.
/// Evaluates to `true` if the element existed.
pub fn fill_input(selector: &str, value: &str) -> String {
    format!(
        r#"((selector, value) => {{
  const el = document.querySelector(selector);
  if (!el) return false;
  el.scrollIntoView({{ block: 'center' }});
  el.value = value;
  el.dispatchEvent(new Event('input', {{ bubbles: true }}));
  el.dispatchEvent(new Event('change', {{ bubbles: true }}));
  return true;
}})({}, {})"#,
        json!(selector),
        json!(value)
    )
}

/// Selects the first option of a `<select>` whose value or label matches
/// one of `candidates`, tried in order
///
/// Evaluates to the chosen option value, or `null` if nothing matched.
pub fn select_option(selector: &str, candidates: &[&str]) -> String {
    format!(
        r#"((selector, candidates) => {{
  const el = document.querySelector(selector);
  if (!el || !el.options) return null;
  for (const wanted of candidates) {{
    const option = Array.from(el.options).find(
      (o) => o.value === wanted || o.textContent.trim() === wanted
    );
    if (option) {{
      el.value = option.value;
      el.dispatchEvent(new Event('change', {{ bubbles: true }}));
      return option.value;
    }}
  }}
  return null;
}})({}, {})"#,
        json!(selector),
        json!(candidates)
    )
}

/// Clicks the first element matching `selector`
///
/// Evaluates to `true` if the element existed.
pub fn click(selector: &str) -> String {
    format!(
        r#"((selector) => {{
  const el = document.querySelector(selector);
  if (!el) return false;
  el.scrollIntoView({{ block: 'center' }});
  el.click();
  return true;
}})({})"#,
        json!(selector)
    )
}

/// Submits the first form on the page
pub const SUBMIT_FIRST_FORM: &str = r#"(() => {
  const form = document.querySelector('form');
  if (!form) return false;
  if (typeof form.requestSubmit === 'function') form.requestSubmit(); else form.submit();
  return true;
})()"#;
