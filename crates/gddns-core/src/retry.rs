//! Retry policy for pipeline calls
//!
//! Retries are owned by the reconciler. Providers and IP sources make exactly
//! one request per call and report failures; the policy decides whether a
//! failed call is attempted again.

use crate::error::Result;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Bounded retry for transient failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Additional attempts after the first one
    pub max_retries: usize,
    /// Delay before each retry
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: usize, delay: Duration) -> Self {
        Self { max_retries, delay }
    }

    /// Single attempt, no retry
    pub fn none() -> Self {
        Self::new(0, Duration::ZERO)
    }

    /// Run `op`, retrying transient errors up to `max_retries` times
    ///
    /// Non-transient errors are returned immediately.
    pub async fn run<T, F, Fut>(&self, what: &str, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 0;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_transient() && attempt < self.max_retries => {
                    attempt += 1;
                    warn!(
                        "{} failed (attempt {} of {}): {}",
                        what,
                        attempt,
                        self.max_retries + 1,
                        e
                    );
                    if !self.delay.is_zero() {
                        tokio::time::sleep(self.delay).await;
                    }
                }
                Err(e) => return Err(e),
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(1, Duration::from_secs(1))
    }
}
