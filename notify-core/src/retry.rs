//! Reconnect policy for the live channel.

use std::time::Duration;

/// Default delay between a drop and the next connection attempt.
pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Backoff {
    /// Every attempt waits `interval`.
    Fixed,
    /// `interval * multiplier^(attempt - 1)`, capped at `max`.
    Exponential { multiplier: f64, max: Duration },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    pub interval: Duration,
    /// `None` retries forever.
    pub max_attempts: Option<u32>,
    pub backoff: Backoff,
    /// Upper bound of random delay added on top of the base delay.
    pub jitter: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            interval: DEFAULT_RETRY_INTERVAL,
            max_attempts: None,
            backoff: Backoff::Fixed,
            jitter: Duration::ZERO,
        }
    }
}

impl RetryPolicy {
    pub fn fixed(interval: Duration) -> Self {
        Self {
            interval,
            ..Self::default()
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    pub fn is_unbounded(&self) -> bool {
        self.max_attempts.is_none()
    }

    /// Base delay before retry number `attempt` (1-based), or `None` once
    /// the policy is exhausted.
    pub fn delay_for(&self, attempt: u32) -> Option<Duration> {
        if attempt == 0 {
            return Some(Duration::ZERO);
        }
        if let Some(max) = self.max_attempts {
            if attempt > max {
                return None;
            }
        }
        let delay = match self.backoff {
            Backoff::Fixed => self.interval,
            Backoff::Exponential { multiplier, max } => {
                let exponent = i32::try_from(attempt - 1).unwrap_or(i32::MAX);
                let scaled_ms = self.interval.as_millis() as f64 * multiplier.powi(exponent);
                if !scaled_ms.is_finite() || scaled_ms >= max.as_millis() as f64 {
                    max
                } else {
                    Duration::from_millis(scaled_ms.round() as u64).max(self.interval)
                }
            }
        };
        Some(delay)
    }
}
