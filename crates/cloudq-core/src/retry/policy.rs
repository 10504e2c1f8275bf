use std::time::Duration;

use crate::config::RetryConfig;

/// Exponential backoff parameters for one decorated operation.
///
/// `tries` counts attempts, not retries: `tries = 10` means one initial
/// attempt plus up to nine retries. Every invocation builds its own budget
/// from these values, so a `Backoff` can be shared freely across threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    /// Number of attempts including the first. Zero behaves like one.
    pub tries: u32,
    /// Wait before the first retry.
    pub delay: Duration,
    /// Growth factor applied to the delay after each retry.
    pub backoff: u32,
}

impl Default for Backoff {
    fn default() -> Self {
        Self {
            tries: 10,
            delay: Duration::from_secs(3),
            backoff: 2,
        }
    }
}

impl From<&RetryConfig> for Backoff {
    fn from(cfg: &RetryConfig) -> Self {
        Self::new(cfg.tries, cfg.delay_secs, cfg.backoff)
    }
}

impl Backoff {
    pub fn new(tries: u32, delay_secs: u64, backoff: u32) -> Self {
        Self {
            tries,
            delay: Duration::from_secs(delay_secs),
            backoff,
        }
    }

    pub fn with_tries(mut self, tries: u32) -> Self {
        self.tries = tries;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_backoff(mut self, backoff: u32) -> Self {
        self.backoff = backoff;
        self
    }

    /// Effective attempt count (at least one).
    pub fn attempts(&self) -> u32 {
        self.tries.max(1)
    }

    /// The delays slept before each retry, in order, when every attempt but
    /// the last fails with a retryable error.
    pub fn delays(&self) -> impl Iterator<Item = Duration> {
        let mut budget = RetryBudget::new(self);
        std::iter::from_fn(move || budget.can_retry().then(|| budget.consume()))
    }

    /// Upper bound on total time spent sleeping for one invocation:
    /// `delay * (backoff^(tries-1) - 1) / (backoff - 1)`.
    pub fn max_total_delay(&self) -> Duration {
        self.delays()
            .fold(Duration::ZERO, |total, d| total.saturating_add(d))
    }
}

/// Remaining attempts and current delay for a single invocation.
#[derive(Debug)]
pub(crate) struct RetryBudget {
    remaining: u32,
    delay: Duration,
    backoff: u32,
}

impl RetryBudget {
    pub(crate) fn new(policy: &Backoff) -> Self {
        Self {
            remaining: policy.attempts(),
            delay: policy.delay,
            backoff: policy.backoff,
        }
    }

    /// More than one attempt left; the last attempt is never retried.
    pub(crate) fn can_retry(&self) -> bool {
        self.remaining > 1
    }

    /// Spend one attempt and return the delay to sleep before the next.
    pub(crate) fn consume(&mut self) -> Duration {
        let delay = self.delay;
        self.remaining = self.remaining.saturating_sub(1);
        self.delay = self.delay.saturating_mul(self.backoff);
        delay
    }
}
