//! Minimum spacing between requests to the same host.

use std::time::{Duration, Instant};

use dashmap::DashMap;

/// Keeps requests to one host at least `min_delay` apart.
pub struct RateLimiter {
    min_delay: Duration,
    last_request: DashMap<String, Instant>,
}

impl RateLimiter {
    pub fn new(min_delay: Duration) -> Self {
        Self {
            min_delay,
            last_request: DashMap::new(),
        }
    }

    /// A limiter that never waits.
    pub fn disabled() -> Self {
        Self::new(Duration::ZERO)
    }

    pub fn min_delay(&self) -> Duration {
        self.min_delay
    }

    /// How long a request to `host` would have to wait right now.
    pub fn remaining(&self, host: &str) -> Duration {
        self.last_request
            .get(host)
            .map(|last| self.min_delay.saturating_sub(last.elapsed()))
            .unwrap_or(Duration::ZERO)
    }

    /// Sleep until `host` may be contacted again, then mark it as used.
    pub async fn wait(&self, host: &str) {
        if self.min_delay.is_zero() {
            return;
        }

        let pause = self.remaining(host);
        if !pause.is_zero() {
            tracing::debug!(host, wait_ms = pause.as_millis() as u64, "rate limiting");
            tokio::time::sleep(pause).await;
        }

        self.last_request.insert(host.to_string(), Instant::now());
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(Duration::from_millis(200))
    }
}
