use chrono::TimeDelta;

use crate::server::util::time::delta_seconds;

/// Attempt cap and backoff schedule for failed deliveries.
///
/// The wait after the n-th failed attempt is `base * 2^(n-1)` seconds, capped at
/// `max_backoff_seconds`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts before a message is marked FAILED
    pub max_attempts: i32,
    /// Wait after the first failed attempt (seconds)
    pub base_seconds: u64,
    /// Upper bound for any single wait (seconds)
    pub max_backoff_seconds: u64,
}

impl RetryPolicy {
    pub const DEFAULT_MAX_ATTEMPTS: i32 = 5;
    pub const DEFAULT_BASE_SECONDS: u64 = 30;
    pub const DEFAULT_MAX_BACKOFF_SECONDS: u64 = 30 * 60;

    pub fn new(max_attempts: i32, base_seconds: u64, max_backoff_seconds: u64) -> Self {
        Self {
            max_attempts,
            base_seconds,
            max_backoff_seconds,
        }
    }

    /// Wait before the next attempt after `attempts` failed attempts.
    pub fn backoff(&self, attempts: i32) -> TimeDelta {
        let exponent = attempts.saturating_sub(1).clamp(0, 63) as u32;
        let seconds = self
            .base_seconds
            .saturating_mul(1_u64 << exponent)
            .min(self.max_backoff_seconds);

        delta_seconds(seconds)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(
            Self::DEFAULT_MAX_ATTEMPTS,
            Self::DEFAULT_BASE_SECONDS,
            Self::DEFAULT_MAX_BACKOFF_SECONDS,
        )
    }
}
