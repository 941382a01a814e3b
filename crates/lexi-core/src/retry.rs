//! Fixed-count exponential backoff shared by the page layer and the popup.

use std::future::Future;
use lexi_types::Result;
use crate::ports::TimerPort;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub multiplier: u64,
}

impl RetryPolicy {
    /// Content scripts: 3 attempts, 100ms then 200ms between them.
    pub const fn content_script() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 100,
            multiplier: 2,
        }
    }

    /// Popup: 3 attempts, 200ms then 400ms between them.
    pub const fn popup() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 200,
            multiplier: 2,
        }
    }

    /// Delay slept after the failed attempt `attempt` (0-based).
    pub fn delay_after(&self, attempt: u32) -> u64 {
        self.base_delay_ms
            .saturating_mul(self.multiplier.saturating_pow(attempt))
    }

    /// Run `op` until it succeeds, fails with a non-transport error,
    /// or `max_attempts` transport failures have been seen.
    /// No sleep follows the final attempt.
    pub async fn run<T, F, Fut>(&self, timer: &dyn TimerPort, mut op: F) -> Result<T>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let attempts = self.max_attempts.max(1);
        let mut attempt = 0;
        loop {
            match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_transport() && attempt + 1 < attempts => {
                    let delay = self.delay_after(attempt);
                    log::warn!(
                        "Message attempt {} failed ({}), retrying in {}ms",
                        attempt + 1,
                        e,
                        delay
                    );
                    timer.sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::content_script()
    }
}
