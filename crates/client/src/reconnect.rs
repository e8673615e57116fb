//! Exponential-backoff tuning for the jobs event stream.
//!
//! When the connection drops unexpectedly, the
//! [`ConnectionManager`](crate::manager::ConnectionManager) waits the
//! current delay before retrying, then widens it via [`next_delay`]. The
//! delay returns to [`ReconnectConfig::initial_delay`] only after a
//! connection successfully opens.

use std::time::Duration;

/// Tunable parameters for the exponential-backoff strategy.
#[derive(Debug, Clone)]
pub struct ReconnectConfig {
    /// Delay before the first reconnection attempt.
    pub initial_delay: Duration,
    /// Upper bound on the delay between attempts.
    pub max_delay: Duration,
    /// Factor by which the delay grows after each failure.
    pub multiplier: f64,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(2000),
            max_delay: Duration::from_millis(30_000),
            multiplier: 2.0,
        }
    }
}

/// Calculate the next backoff delay from the current delay and config.
///
/// The result is clamped to [`ReconnectConfig::max_delay`].
pub fn next_delay(current: Duration, config: &ReconnectConfig) -> Duration {
    let next_ms = (current.as_millis() as f64 * config.multiplier) as u64;
    Duration::from_millis(next_ms).min(config.max_delay)
}
