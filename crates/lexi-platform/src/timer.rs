use async_trait::async_trait;
use gloo_timers::future::TimeoutFuture;

use lexi_core::ports::TimerPort;

/// `setTimeout`-backed sleeps for retry backoff.
#[derive(Debug, Default, Clone, Copy)]
pub struct GlooTimer;

#[async_trait(?Send)]
impl TimerPort for GlooTimer {
    async fn sleep(&self, ms: u64) {
        TimeoutFuture::new(u32::try_from(ms).unwrap_or(u32::MAX)).await;
    }
}
