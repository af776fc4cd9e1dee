use std::time::Duration;

/// Retry timing policy, injected into the fetcher so delays stay
/// configurable and testable without real sleeps.
#[derive(Debug, Clone, Copy)]
pub enum BackoffPolicy {
    /// Fixed delay between attempts. Matches the upstream service's
    /// expectation of a steady request cadence.
    Constant { delay: Duration },
    /// `base * 2^(attempt-1)`, capped at `max`.
    Exponential { base: Duration, max: Duration },
}

impl BackoffPolicy {
    /// Delay to wait after the given failed attempt (1-indexed).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        match *self {
            BackoffPolicy::Constant { delay } => delay,
            BackoffPolicy::Exponential { base, max } => {
                let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
                base.saturating_mul(factor).min(max)
            }
        }
    }
}
