//! Poll interval growth.
//!
//! Polling backoff differs from retry backoff: the remote operation is
//! known to be running, so intervals grow deterministically and carry no
//! jitter.

use std::time::Duration;

use crate::config::PollConfig;

/// Capped exponential backoff between poll attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollBackoff {
    /// Delay after the first attempt.
    pub initial: Duration,

    /// Maximum delay.
    pub max: Duration,

    /// Growth factor per attempt.
    pub multiplier: u32,
}

impl PollBackoff {
    /// Create a doubling backoff.
    pub fn new(initial: Duration, max: Duration) -> Self {
        Self {
            initial,
            max,
            multiplier: 2,
        }
    }

    /// Calculate the delay after the given zero-based attempt.
    ///
    /// The sequence starts at `initial`, never decreases, and never
    /// exceeds `max`.
    pub fn delay(&self, attempt: u32) -> Duration {
        self.multiplier
            .checked_pow(attempt)
            .and_then(|factor| self.initial.checked_mul(factor))
            .map_or(self.max, |delay| delay.min(self.max))
    }
}

impl From<&PollConfig> for PollBackoff {
    fn from(config: &PollConfig) -> Self {
        Self::new(config.initial_period(), config.max_period())
    }
}
