//! Bounded, interval-spaced readiness polling

use std::future::Future;
use std::time::Duration;

/// Outcome of [`poll_until`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome<T> {
    /// The probe produced a value on attempt number `attempts` (1-based)
    Ready { value: T, attempts: u32 },
    /// Every attempt came back empty
    Exhausted { attempts: u32 },
}

impl<T> PollOutcome<T> {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready { .. })
    }

    pub fn attempts(&self) -> u32 {
        match self {
            Self::Ready { attempts, .. } | Self::Exhausted { attempts } => *attempts,
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Ready { value, .. } => Some(value),
            Self::Exhausted { .. } => None,
        }
    }
}

/// Evaluates `probe` until it yields `Some`, at most `max_attempts` times
///
/// Sleeps `interval` between attempts, never before the first and never
/// after the last. Exhaustion is a normal outcome, not an error. A
/// `max_attempts` of zero never calls the probe.
///
/// # Example
///
/// ```
/// use cardlens::navigation::{poll_until, PollOutcome};
/// use std::time::Duration;
///
/// # tokio_test_block(async {
/// let mut calls = 0;
/// let outcome = poll_until(Duration::ZERO, 5, || {
///     calls += 1;
///     let ready = calls == 3;
///     async move { ready.then_some("done") }
/// })
/// .await;
/// assert_eq!(outcome, PollOutcome::Ready { value: "done", attempts: 3 });
/// # });
/// # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Builder::new_current_thread().enable_time().build().unwrap().block_on(f)
/// # }
/// ```
pub async fn poll_until<T, F, Fut>(interval: Duration, max_attempts: u32, mut probe: F) -> PollOutcome<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Option<T>>,
{
    for attempt in 1..=max_attempts {
        if let Some(value) = probe().await {
            tracing::debug!("Poll satisfied on attempt {}/{}", attempt, max_attempts);
            return PollOutcome::Ready {
                value,
                attempts: attempt,
            };
        }

        if attempt < max_attempts {
            tracing::debug!("Poll attempt {}/{} empty, waiting {:?}", attempt, max_attempts, interval);
            tokio::time::sleep(interval).await;
        }
    }

    tracing::debug!("Poll exhausted after {} attempts", max_attempts);
    PollOutcome::Exhausted {
        attempts: max_attempts,
    }
}
