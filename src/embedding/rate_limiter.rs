// Request pacing for remote embedding calls.
//
// Hosted embedding APIs throttle per key. Each caller reserves the next free
// slot under a short lock, then sleeps outside it, so concurrent callers are
// spaced `interval` apart in arrival order. The wait counts against the
// engine's embedding timeout: a saturated limiter shows up as degraded
// scoring, not as a stalled request.

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::Mutex;
use tokio::time::{Duration, Instant};

/// Slowest pacing accepted: one request per hour.
pub const MAX_INTERVAL: Duration = Duration::from_secs(3600);

/// Spacing between requests for `requests_per_second`; zero means unlimited.
///
/// Rejects negative and non-finite rates, and rates so low the spacing would
/// exceed [`MAX_INTERVAL`].
pub fn interval_for(requests_per_second: f64) -> Result<Duration> {
    if !requests_per_second.is_finite() || requests_per_second < 0.0 {
        anyhow::bail!("request rate must be a non-negative number, got {requests_per_second}");
    }
    if requests_per_second == 0.0 {
        return Ok(Duration::ZERO);
    }
    match Duration::try_from_secs_f64(1.0 / requests_per_second) {
        Ok(interval) if interval <= MAX_INTERVAL => Ok(interval),
        _ => anyhow::bail!(
            "request rate {requests_per_second}/s is too low; the slowest allowed is one request per {}s",
            MAX_INTERVAL.as_secs()
        ),
    }
}

#[derive(Clone)]
pub struct RateLimiter {
    interval: Duration,
    /// Earliest instant the next request may start
    next_slot: Arc<Mutex<Option<Instant>>>,
}

impl RateLimiter {
    /// A limiter admitting `requests_per_second`. Zero disables it.
    pub fn new(requests_per_second: f64) -> Result<Self> {
        Ok(Self {
            interval: interval_for(requests_per_second)?,
            next_slot: Arc::new(Mutex::new(None)),
        })
    }

    pub fn is_unlimited(&self) -> bool {
        self.interval.is_zero()
    }

    /// Wait for this caller's slot.
    pub async fn acquire(&self) {
        if self.is_unlimited() {
            return;
        }

        let slot = {
            let mut next = self.next_slot.lock().await;
            let now = Instant::now();
            let slot = next.map_or(now, |n| n.max(now));
            *next = Some(slot + self.interval);
            slot
        };

        tokio::time::sleep_until(slot).await;
    }
}
