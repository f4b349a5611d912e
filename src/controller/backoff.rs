//! # Exponential Backoff
//!
//! Retry policy for remote secret fetches.
//!
//! Errors are classified as transient (throttling, temporary unavailability,
//! internal failure) or permanent. Transient errors are retried after an
//! exponential delay capped at a ceiling.
//!
//! ## Usage
//!
//! ```rust
//! use secrets_mount_provider::controller::backoff::ExponentialBackoff;
//! use std::time::Duration;
//!
//! let backoff = ExponentialBackoff::default(); // 1s base, 10s cap
//! assert_eq!(backoff.delay(0), Duration::from_secs(1));
//! assert_eq!(backoff.delay(1), Duration::from_secs(2));
//! assert_eq!(backoff.delay(2), Duration::from_secs(4));
//! assert_eq!(backoff.delay(3), Duration::from_secs(8));
//! assert_eq!(backoff.delay(4), Duration::from_secs(10));
//! ```

use crate::constants::{
    DEFAULT_BACKOFF_BASE_MS, DEFAULT_BACKOFF_MAX_MS, ERROR_CODE_INTERNAL_FAILURE,
    ERROR_CODE_REJECTED_THROTTLING, ERROR_CODE_SERVICE_UNAVAILABLE_TEMPORARY,
};
use crate::provider::BackendError;
use std::time::Duration;

/// Whether a failed call is worth retrying
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryClass {
    /// Throttling or a temporary backend fault
    Transient,
    /// Anything else
    Permanent,
}

impl RetryClass {
    #[must_use]
    pub fn is_transient(self) -> bool {
        self == RetryClass::Transient
    }
}

/// Classify a backend error for retry purposes
///
/// Only remote errors carrying one of the throttling, temporary-unavailable
/// or internal-failure codes are transient.
#[must_use]
pub fn classify(error: &BackendError) -> RetryClass {
    match error.code() {
        Some(
            ERROR_CODE_REJECTED_THROTTLING
            | ERROR_CODE_SERVICE_UNAVAILABLE_TEMPORARY
            | ERROR_CODE_INTERNAL_FAILURE,
        ) => RetryClass::Transient,
        _ => RetryClass::Permanent,
    }
}

/// Exponential backoff calculator
///
/// `delay(n) = min(base * 2^n, max)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExponentialBackoff {
    /// Delay for attempt zero
    base: Duration,
    /// Upper bound for any delay
    max: Duration,
}

impl Default for ExponentialBackoff {
    fn default() -> Self {
        Self::new(
            Duration::from_millis(DEFAULT_BACKOFF_BASE_MS),
            Duration::from_millis(DEFAULT_BACKOFF_MAX_MS),
        )
    }
}

impl ExponentialBackoff {
    /// Create a new backoff with the given base interval and ceiling
    ///
    /// # Example
    ///
    /// ```
    /// use secrets_mount_provider::controller::backoff::ExponentialBackoff;
    /// use std::time::Duration;
    ///
    /// let backoff = ExponentialBackoff::new(Duration::from_millis(100), Duration::from_secs(1));
    /// assert_eq!(backoff.delay(3), Duration::from_millis(800));
    /// assert_eq!(backoff.delay(4), Duration::from_secs(1));
    /// ```
    #[must_use]
    pub fn new(base: Duration, max: Duration) -> Self {
        Self { base, max }
    }

    /// Delay before retry number `attempt`
    #[must_use]
    pub fn delay(&self, attempt: u32) -> Duration {
        let factor = 2u32.checked_pow(attempt).unwrap_or(u32::MAX);
        self.base
            .checked_mul(factor)
            .map_or(self.max, |delay| delay.min(self.max))
    }

    #[must_use]
    pub fn base(&self) -> Duration {
        self.base
    }

    #[must_use]
    pub fn max(&self) -> Duration {
        self.max
    }
}
