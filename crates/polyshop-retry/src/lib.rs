//! Retry policy and backoff computation for store connection establishment.
//!
//! A [`RetryPolicy`] is immutable configuration built once at startup. The
//! delay formula lives in free functions so it can be tested without any
//! connection attempt:
//!
//! ```
//! use polyshop_retry::{base_delay, RetryPolicy};
//! use std::time::Duration;
//!
//! let policy = RetryPolicy::builder()
//!     .initial_delay(Duration::from_millis(100))
//!     .max_delay(Duration::from_secs(2))
//!     .max_attempts(6)
//!     .jitter_fraction(0.1)
//!     .build()
//!     .unwrap();
//!
//! // Delay applied after attempt 1 fails, before attempt 2.
//! assert_eq!(base_delay(&policy, 1), Duration::from_millis(200));
//! assert_eq!(base_delay(&policy, 5), Duration::from_secs(2));
//! ```

mod backoff;
mod error;

pub use backoff::{
    RetryPolicy, RetryPolicyBuilder, base_delay, compute_delay, compute_delay_with, jitter_bounds,
};
pub use error::PolicyError;
