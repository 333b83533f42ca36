use std::time::Duration;

/// Fixed-delay throttle applied before every navigation and polling cycle
///
/// There is no burst allowance and no adaptation: every call to
/// [`RateLimiter::throttle`] sleeps for the same interval, whatever happened
/// before. Nothing about previous calls is remembered.
#[derive(Debug, Clone, Copy)]
pub struct RateLimiter {
    delay: Duration,
}

impl RateLimiter {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Suspends the caller for the configured delay
    pub async fn throttle(&self) {
        if self.delay.is_zero() {
            return;
        }
        tracing::trace!("Throttling for {:?}", self.delay);
        tokio::time::sleep(self.delay).await;
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}
