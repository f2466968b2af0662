//! Outbound request spacing for the Overpass backend.
//!
//! [`RequestGate`] keeps one piece of state, the instant the last request was
//! let through, and one operation, [`RequestGate::wait_turn`]. Every outbound
//! call path goes through it, so requests from one service instance are at
//! least `min_interval` apart no matter how many callers are waiting.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

/// Default spacing between two outbound requests.
pub const DEFAULT_MIN_REQUEST_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug)]
pub struct RequestGate {
    min_interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl RequestGate {
    #[must_use]
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_request: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Waits until `min_interval` has passed since the previous permitted
    /// request, then stamps the current instant.
    ///
    /// The lock is held across the sleep, so concurrent callers queue up and
    /// leave the gate one interval apart.
    pub async fn wait_turn(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.min_interval {
                let wait = self.min_interval - elapsed;
                tracing::debug!(
                    wait_ms = u64::try_from(wait.as_millis()).unwrap_or(u64::MAX),
                    "rate limiter delaying outbound request"
                );
                tokio::time::sleep(wait).await;
            }
        }
        *last = Some(Instant::now());
    }
}

impl Default for RequestGate {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_REQUEST_INTERVAL)
    }
}
