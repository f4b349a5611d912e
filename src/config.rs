//! # Provider Configuration
//!
//! Process-level settings loaded from environment variables.

use crate::constants::{
    DEFAULT_BACKOFF_BASE_MS, DEFAULT_BACKOFF_MAX_MS, DEFAULT_KMS_RATE_LIMIT_BURST,
    DEFAULT_KMS_RATE_LIMIT_QPS, DEFAULT_OOS_RATE_LIMIT_BURST, DEFAULT_OOS_RATE_LIMIT_QPS,
    DEFAULT_RATE_LIMIT_WAIT_TIMEOUT_SECS,
};
use crate::controller::backoff::ExponentialBackoff;
use crate::controller::rate_limit::{BackendRateLimiter, RateLimit};
use crate::provider::BackendKind;
use std::time::Duration;

/// Provider-level configuration
///
/// All settings have sensible defaults and can be overridden via environment variables.
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    /// Sustained KMS request rate (requests per second)
    pub kms_rate_limit_qps: f64,
    /// KMS token bucket size
    pub kms_rate_limit_burst: u32,
    /// Sustained OOS request rate (requests per second)
    pub oos_rate_limit_qps: f64,
    /// OOS token bucket size
    pub oos_rate_limit_burst: u32,
    /// How long a fetch may wait for a rate-limit token (seconds)
    pub rate_limit_wait_timeout_secs: u64,
    /// Base interval of the retry backoff (milliseconds)
    pub backoff_base_ms: u64,
    /// Ceiling of the retry backoff (milliseconds)
    pub backoff_max_ms: u64,
    /// Global log level (ERROR, WARN, INFO, DEBUG, TRACE)
    pub log_level: String,
    /// Log format (json, text)
    pub log_format: String,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            kms_rate_limit_qps: DEFAULT_KMS_RATE_LIMIT_QPS,
            kms_rate_limit_burst: DEFAULT_KMS_RATE_LIMIT_BURST,
            oos_rate_limit_qps: DEFAULT_OOS_RATE_LIMIT_QPS,
            oos_rate_limit_burst: DEFAULT_OOS_RATE_LIMIT_BURST,
            rate_limit_wait_timeout_secs: DEFAULT_RATE_LIMIT_WAIT_TIMEOUT_SECS,
            backoff_base_ms: DEFAULT_BACKOFF_BASE_MS,
            backoff_max_ms: DEFAULT_BACKOFF_MAX_MS,
            log_level: "INFO".to_string(),
            log_format: "json".to_string(),
        }
    }
}

impl ProviderSettings {
    /// Load configuration from environment variables with defaults
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            kms_rate_limit_qps: env_var_or_default("KMS_RATE_LIMIT_QPS", DEFAULT_KMS_RATE_LIMIT_QPS),
            kms_rate_limit_burst: env_var_or_default(
                "KMS_RATE_LIMIT_BURST",
                DEFAULT_KMS_RATE_LIMIT_BURST,
            ),
            oos_rate_limit_qps: env_var_or_default("OOS_RATE_LIMIT_QPS", DEFAULT_OOS_RATE_LIMIT_QPS),
            oos_rate_limit_burst: env_var_or_default(
                "OOS_RATE_LIMIT_BURST",
                DEFAULT_OOS_RATE_LIMIT_BURST,
            ),
            rate_limit_wait_timeout_secs: env_var_or_default(
                "RATE_LIMIT_WAIT_TIMEOUT_SECS",
                DEFAULT_RATE_LIMIT_WAIT_TIMEOUT_SECS,
            ),
            backoff_base_ms: env_var_or_default("BACKOFF_BASE_MS", DEFAULT_BACKOFF_BASE_MS),
            backoff_max_ms: env_var_or_default("BACKOFF_MAX_MS", DEFAULT_BACKOFF_MAX_MS),
            log_level: env_var_or_default_str("LOG_LEVEL", "INFO"),
            log_format: env_var_or_default_str("LOG_FORMAT", "json"),
        }
    }

    /// Get rate-limit wait timeout duration
    #[must_use]
    pub fn rate_limit_wait_timeout(&self) -> Duration {
        Duration::from_secs(self.rate_limit_wait_timeout_secs)
    }

    /// Build the retry backoff policy
    #[must_use]
    pub fn backoff(&self) -> ExponentialBackoff {
        ExponentialBackoff::new(
            Duration::from_millis(self.backoff_base_ms),
            Duration::from_millis(self.backoff_max_ms),
        )
    }

    /// Build the shared per-backend rate limiter
    ///
    /// Construct this once per process and hand the same instance to every
    /// fetcher so concurrent mounts share the buckets.
    #[must_use]
    pub fn rate_limiter(&self) -> BackendRateLimiter {
        BackendRateLimiter::new()
            .with_limit(
                BackendKind::Kms,
                RateLimit::new(self.kms_rate_limit_qps, self.kms_rate_limit_burst),
            )
            .with_limit(
                BackendKind::Oos,
                RateLimit::new(self.oos_rate_limit_qps, self.oos_rate_limit_burst),
            )
    }
}

/// Read environment variable or return default value
fn env_var_or_default<T: std::str::FromStr>(key: &str, default: T) -> T
where
    <T as std::str::FromStr>::Err: std::fmt::Debug,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Read environment variable as string or return default
fn env_var_or_default_str(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
