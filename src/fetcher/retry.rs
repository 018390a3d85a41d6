//! Rate-limit handling: the backoff applied after a throttled request and the
//! pacing kept between consecutive requests.

use bon::Builder;
use std::time::Duration;
use tokio::time::{sleep, Instant};

/// Bounded exponential backoff for throttled (HTTP 429) requests.
///
/// Attempt `n` (1-based) waits `initial_backoff * multiplier^(n-1)`, capped at
/// `max_backoff`. After `max_attempts` throttled attempts the request is given up.
///
/// # Examples
///
/// ```
/// use noaa_history::RetryPolicy;
/// use std::time::Duration;
///
/// let policy = RetryPolicy::builder()
///     .initial_backoff(Duration::from_secs(10))
///     .max_backoff(Duration::from_secs(60))
///     .build();
/// assert_eq!(policy.backoff(1), Duration::from_secs(10));
/// assert_eq!(policy.backoff(2), Duration::from_secs(20));
/// assert_eq!(policy.backoff(4), Duration::from_secs(60));
/// ```
#[derive(Debug, Clone, PartialEq, Builder)]
pub struct RetryPolicy {
    #[builder(default = 6)]
    pub max_attempts: u32,
    #[builder(default = Duration::from_secs(30))]
    pub initial_backoff: Duration,
    #[builder(default = 2.0)]
    pub multiplier: f64,
    #[builder(default = Duration::from_secs(300))]
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl RetryPolicy {
    /// The wait before retrying after the `attempt`-th throttled response.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
        let secs = self.initial_backoff.as_secs_f64() * self.multiplier.powi(exponent);
        Duration::try_from_secs_f64(secs)
            .unwrap_or(self.max_backoff)
            .min(self.max_backoff)
    }

    /// The wait after the `attempt`-th throttled response, honoring the server's
    /// `Retry-After` hint. Never longer than `max_backoff`.
    pub fn wait_for(&self, attempt: u32, retry_after: Option<Duration>) -> Duration {
        self.backoff(attempt)
            .max(retry_after.unwrap_or_default())
            .min(self.max_backoff)
    }

    /// Whether another attempt is allowed after `attempts` throttled ones.
    pub fn should_retry(&self, attempts: u32) -> bool {
        attempts < self.max_attempts
    }
}

/// Keeps consecutive requests at least `delay` apart.
#[derive(Debug)]
pub struct RequestPacer {
    delay: Duration,
    last_request: Option<Instant>,
}

impl RequestPacer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            last_request: None,
        }
    }

    /// Waits until the next request may be sent and records it as sent.
    pub async fn wait(&mut self) {
        if let Some(last) = self.last_request {
            let elapsed = last.elapsed();
            if elapsed < self.delay {
                sleep(self.delay - elapsed).await;
            }
        }
        self.last_request = Some(Instant::now());
    }
}
