//! Navigation module: getting a page loaded and ready for extraction
//!
//! - [`NavigationController`] loads a URL under a timeout and classifies failures
//! - [`poll_until`] waits, boundedly, for client-side rendering to produce data

mod controller;
mod polling;

pub use controller::{classify_failure, is_not_found_title, NavigationController};
pub use polling::{poll_until, PollOutcome};
