//! Network-quiet detection for page loads
//!
//! A page counts as settled once no more than a couple of requests have been
//! in flight for a short window after the load event.

use futures::{Stream, StreamExt};
use std::collections::HashSet;
use std::time::Duration;

/// Requests that may stay open while the page still counts as quiet
pub const MAX_INFLIGHT: usize = 2;

/// How long the in-flight count must stay at or below [`MAX_INFLIGHT`]
pub const QUIET_WINDOW: Duration = Duration::from_millis(500);

/// Request lifecycle notification, keyed by the browser's request id
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestEvent {
    Started(String),
    Finished(String),
}

/// Set of requests started but not yet finished or failed
#[derive(Debug, Default)]
pub struct InflightRequests {
    pending: HashSet<String>,
}

impl InflightRequests {
    pub fn apply(&mut self, event: RequestEvent) {
        match event {
            RequestEvent::Started(id) => {
                self.pending.insert(id);
            }
            RequestEvent::Finished(id) => {
                self.pending.remove(&id);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn is_quiet(&self, max_inflight: usize) -> bool {
        self.pending.len() <= max_inflight
    }
}

/// Consumes `events` until at most `max_inflight` requests have been open for
/// a full `window`
///
/// Every event restarts the window. An ended stream means nothing more can
/// arrive, so it returns at once. No overall deadline is applied here.
pub async fn wait_for_network_quiet<S>(
    mut inflight: InflightRequests,
    mut events: S,
    max_inflight: usize,
    window: Duration,
) where
    S: Stream<Item = RequestEvent> + Unpin,
{
    loop {
        let next = if inflight.is_quiet(max_inflight) {
            tokio::select! {
                event = events.next() => event,
                _ = tokio::time::sleep(window) => {
                    tracing::debug!("Network quiet with {} requests in flight", inflight.len());
                    return;
                }
            }
        } else {
            events.next().await
        };

        match next {
            Some(event) => inflight.apply(event),
            None => {
                tracing::debug!("Request event stream ended");
                return;
            }
        }
    }
}
