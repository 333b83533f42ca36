//! Integration tests for the catalog
//!
//! These tests run the full search and detail flows against an in-process
//! fake browser serving HTML fixtures, with tokio's clock paused so throttle
//! and polling delays are observable without waiting.

mod detail_tests;
mod search_tests;
mod session_tests;
mod support;
