use std::time::Duration;

/// A [`RetryPolicy`](crate::RetryPolicy) that violates its invariants.
///
/// These are configuration errors: fatal at startup and never retried.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PolicyError {
    /// `jitter_fraction` must lie in `[0, 1)`.
    #[error("jitter fraction must be in [0, 1), got {0}")]
    JitterOutOfRange(f64),

    /// `initial_delay` must not exceed `max_delay`.
    #[error("initial delay {initial:?} exceeds max delay {max:?}")]
    InitialExceedsMax { initial: Duration, max: Duration },

    /// At least one attempt is required.
    #[error("max attempts must be at least 1")]
    ZeroAttempts,
}
