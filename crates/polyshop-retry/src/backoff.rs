use crate::error::PolicyError;
use rand::Rng;
use std::time::Duration;

/// Reconnection contract: how long to wait between attempts and how many to make.
///
/// Invariants (checked by [`RetryPolicyBuilder::build`]):
/// `0 <= jitter_fraction < 1`, `initial_delay <= max_delay`, `max_attempts >= 1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    initial_delay: Duration,
    max_delay: Duration,
    max_attempts: u32,
    jitter_fraction: f64,
}

impl RetryPolicy {
    /// Creates a builder seeded with the defaults (100ms, 2s, 6 attempts, 0.1 jitter).
    pub fn builder() -> RetryPolicyBuilder {
        RetryPolicyBuilder::new()
    }

    /// Starting delay before doubling.
    pub fn initial_delay(&self) -> Duration {
        self.initial_delay
    }

    /// Upper bound on the pre-jitter delay.
    pub fn max_delay(&self) -> Duration {
        self.max_delay
    }

    /// Total attempts, the first one included.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Fraction by which each delay is perturbed in either direction.
    pub fn jitter_fraction(&self) -> f64 {
        self.jitter_fraction
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(2),
            max_attempts: 6,
            jitter_fraction: 0.1,
        }
    }
}

/// Builder for [`RetryPolicy`].
#[derive(Debug, Clone)]
pub struct RetryPolicyBuilder {
    initial_delay: Duration,
    max_delay: Duration,
    max_attempts: u32,
    jitter_fraction: f64,
}

impl Default for RetryPolicyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RetryPolicyBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        let defaults = RetryPolicy::default();
        Self {
            initial_delay: defaults.initial_delay,
            max_delay: defaults.max_delay,
            max_attempts: defaults.max_attempts,
            jitter_fraction: defaults.jitter_fraction,
        }
    }

    /// Sets the starting delay.
    pub fn initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Sets the cap on the pre-jitter delay.
    pub fn max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Sets the total number of attempts, including the first.
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Sets the jitter fraction. `0.1` means each delay lands in `[0.9d, 1.1d]`.
    pub fn jitter_fraction(mut self, fraction: f64) -> Self {
        self.jitter_fraction = fraction;
        self
    }

    /// Validates the invariants and builds the policy.
    pub fn build(self) -> Result<RetryPolicy, PolicyError> {
        // NaN fails both comparisons and is rejected here too.
        if !(self.jitter_fraction >= 0.0 && self.jitter_fraction < 1.0) {
            return Err(PolicyError::JitterOutOfRange(self.jitter_fraction));
        }
        if self.initial_delay > self.max_delay {
            return Err(PolicyError::InitialExceedsMax {
                initial: self.initial_delay,
                max: self.max_delay,
            });
        }
        if self.max_attempts == 0 {
            return Err(PolicyError::ZeroAttempts);
        }

        Ok(RetryPolicy {
            initial_delay: self.initial_delay,
            max_delay: self.max_delay,
            max_attempts: self.max_attempts,
            jitter_fraction: self.jitter_fraction,
        })
    }
}

/// Pre-jitter delay after attempt `attempt` (1-indexed) has failed:
/// `min(initial_delay * 2^attempt, max_delay)`.
///
/// Saturates at `max_delay` instead of overflowing for large attempt numbers.
pub fn base_delay(policy: &RetryPolicy, attempt: u32) -> Duration {
    let Some(factor) = 1u32.checked_shl(attempt) else {
        return policy.max_delay;
    };

    policy
        .initial_delay
        .checked_mul(factor)
        .map_or(policy.max_delay, |delay| delay.min(policy.max_delay))
}

/// Inclusive range the jittered delay may fall in for a given base delay.
pub fn jitter_bounds(policy: &RetryPolicy, base: Duration) -> (Duration, Duration) {
    let nanos = base.as_nanos() as f64;
    let low = (nanos * (1.0 - policy.jitter_fraction)).round();
    let high = (nanos * (1.0 + policy.jitter_fraction)).round();
    (
        Duration::from_nanos(low as u64),
        Duration::from_nanos(high.min(u64::MAX as f64) as u64),
    )
}

/// Jittered delay to wait after attempt `attempt` has failed, using the
/// thread-local RNG. Every call draws independently.
pub fn compute_delay(policy: &RetryPolicy, attempt: u32) -> Duration {
    compute_delay_with(policy, attempt, &mut rand::rng())
}

/// Same as [`compute_delay`] with a caller-supplied RNG.
pub fn compute_delay_with<R: Rng + ?Sized>(
    policy: &RetryPolicy,
    attempt: u32,
    rng: &mut R,
) -> Duration {
    let base = base_delay(policy, attempt);
    if policy.jitter_fraction == 0.0 || base.is_zero() {
        return base;
    }

    let (low, high) = jitter_bounds(policy, base);
    let low = low.as_nanos() as u64;
    let high = high.as_nanos() as u64;
    Duration::from_nanos(rng.random_range(low..=high))
}
