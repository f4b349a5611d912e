//! # Rate Limiting
//!
//! Token-bucket rate limiting for remote secret fetches, one bucket per
//! backend kind.
//!
//! A `BackendRateLimiter` is cheap to clone; clones share the same buckets.
//! Build one per process (see [`crate::config::ProviderSettings::rate_limiter`])
//! and pass it to every fetcher so concurrent mount requests draw from the
//! same budget. Waiters are not served in any particular order.

use crate::provider::BackendKind;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

/// Refill rate and bucket size for one backend
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateLimit {
    /// Tokens added per second
    pub qps: f64,
    /// Maximum tokens held
    pub burst: u32,
}

impl RateLimit {
    #[must_use]
    pub fn new(qps: f64, burst: u32) -> Self {
        Self { qps, burst }
    }
}

/// Returned when no token became available before the deadline
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("no {backend} rate-limit token available after {waited:?}")]
pub struct RateLimitExceeded {
    pub backend: BackendKind,
    pub waited: Duration,
}

/// Token bucket for rate limiting.
#[derive(Debug)]
struct TokenBucket {
    /// Current number of tokens available
    tokens: f64,
    /// Maximum tokens in the bucket
    max_tokens: f64,
    /// Time of last token refill
    last_refill: Instant,
    /// Token refill rate (tokens per second)
    refill_rate_per_sec: f64,
}

impl TokenBucket {
    fn new(limit: RateLimit) -> Self {
        let max_tokens = f64::from(limit.burst.max(1));
        Self {
            tokens: max_tokens,
            max_tokens,
            last_refill: Instant::now(),
            refill_rate_per_sec: limit.qps.max(0.0),
        }
    }

    /// Try to consume a token from the bucket.
    ///
    /// Returns `Err(retry_after)` with the time until the next token if empty.
    fn try_consume(&mut self) -> Result<(), Duration> {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_refill).as_secs_f64();
        self.tokens = (self.tokens + elapsed * self.refill_rate_per_sec).min(self.max_tokens);
        self.last_refill = now;

        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            return Ok(());
        }

        if self.refill_rate_per_sec <= 0.0 {
            return Err(Duration::MAX);
        }
        let seconds_until_refill = (1.0 - self.tokens) / self.refill_rate_per_sec;
        Err(Duration::try_from_secs_f64(seconds_until_refill).unwrap_or(Duration::MAX))
    }
}

/// Per-backend rate limiter shared across reconciliation passes
///
/// Backends without a configured limit are not throttled.
#[derive(Debug, Clone, Default)]
pub struct BackendRateLimiter {
    buckets: HashMap<BackendKind, Arc<Mutex<TokenBucket>>>,
}

impl BackendRateLimiter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit requests to `backend`
    #[must_use]
    pub fn with_limit(mut self, backend: BackendKind, limit: RateLimit) -> Self {
        self.buckets
            .insert(backend, Arc::new(Mutex::new(TokenBucket::new(limit))));
        self
    }

    /// Wait until a token for `backend` is available or `timeout` elapses
    ///
    /// Returns how long the caller waited.
    ///
    /// # Errors
    ///
    /// Returns `RateLimitExceeded` when the timeout elapses first.
    pub async fn wait(
        &self,
        backend: BackendKind,
        timeout: Duration,
    ) -> Result<Duration, RateLimitExceeded> {
        let start = Instant::now();
        let Some(bucket) = self.buckets.get(&backend) else {
            return Ok(Duration::ZERO);
        };

        match tokio::time::timeout(timeout, Self::acquire(bucket)).await {
            Ok(()) => {
                let waited = start.elapsed();
                debug!(backend = %backend, waited_ms = waited.as_millis(), "Acquired rate-limit token");
                Ok(waited)
            }
            Err(_elapsed) => Err(RateLimitExceeded {
                backend,
                waited: start.elapsed(),
            }),
        }
    }

    async fn acquire(bucket: &Mutex<TokenBucket>) {
        loop {
            let retry_after = {
                let mut bucket = bucket.lock().await;
                match bucket.try_consume() {
                    Ok(()) => return,
                    Err(retry_after) => retry_after,
                }
            };
            tokio::time::sleep(retry_after).await;
        }
    }
}
