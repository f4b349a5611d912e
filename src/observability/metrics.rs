//! # Metrics
//!
//! Prometheus metrics for monitoring secret reconciliation.
//!
//! ## Metrics Exposed
//!
//! - `secrets_provider_reconciliations_total` - Total number of reconciliation passes
//! - `secrets_provider_reconciliation_duration_seconds` - Duration of reconciliation passes
//! - `secrets_provider_errors_total` - Failed passes by error kind
//! - `secrets_provider_backend_fetches_total` - Remote calls by backend
//! - `secrets_provider_backend_fetch_duration_seconds` - Duration of remote calls by backend
//! - `secrets_provider_backend_fetch_errors_total` - Failed remote calls by backend
//! - `secrets_provider_backend_retries_total` - Retries after transient errors by backend
//! - `secrets_provider_rate_limit_wait_seconds` - Time spent waiting for a rate-limit token
//! - `secrets_provider_secrets_reloaded_total` - Current secrets re-read from the mount
//! - `secrets_provider_jmes_secrets_total` - Secrets extracted via JMES paths
//!
//! Exposing the registry over HTTP is left to the host.

use anyhow::Result;
use prometheus::{Histogram, HistogramVec, IntCounter, IntCounterVec, Registry};
use std::sync::LazyLock;

pub(crate) static REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

static RECONCILIATIONS_TOTAL: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "secrets_provider_reconciliations_total",
        "Total number of reconciliation passes",
    )
    .expect("Failed to create RECONCILIATIONS_TOTAL metric - this should never happen")
});

static RECONCILIATION_DURATION: LazyLock<Histogram> = LazyLock::new(|| {
    Histogram::with_opts(
        prometheus::HistogramOpts::new(
            "secrets_provider_reconciliation_duration_seconds",
            "Duration of reconciliation passes in seconds",
        )
        .buckets(vec![0.1, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0]),
    )
    .expect("Failed to create RECONCILIATION_DURATION metric - this should never happen")
});

static ERRORS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "secrets_provider_errors_total",
            "Total number of failed reconciliation passes by error kind",
        ),
        &["kind"],
    )
    .expect("Failed to create ERRORS_TOTAL metric - this should never happen")
});

static BACKEND_FETCHES_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "secrets_provider_backend_fetches_total",
            "Total number of remote secret fetches by backend",
        ),
        &["backend"],
    )
    .expect("Failed to create BACKEND_FETCHES_TOTAL metric - this should never happen")
});

static BACKEND_FETCH_DURATION: LazyLock<HistogramVec> = LazyLock::new(|| {
    HistogramVec::new(
        prometheus::HistogramOpts::new(
            "secrets_provider_backend_fetch_duration_seconds",
            "Duration of remote secret fetches in seconds by backend",
        )
        .buckets(vec![0.05, 0.1, 0.5, 1.0, 2.0, 5.0]),
        &["backend"],
    )
    .expect("Failed to create BACKEND_FETCH_DURATION metric - this should never happen")
});

static BACKEND_FETCH_ERRORS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "secrets_provider_backend_fetch_errors_total",
            "Total number of failed remote secret fetches by backend",
        ),
        &["backend"],
    )
    .expect("Failed to create BACKEND_FETCH_ERRORS_TOTAL metric - this should never happen")
});

static BACKEND_RETRIES_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "secrets_provider_backend_retries_total",
            "Total number of retries after transient backend errors",
        ),
        &["backend"],
    )
    .expect("Failed to create BACKEND_RETRIES_TOTAL metric - this should never happen")
});

static RATE_LIMIT_WAIT: LazyLock<HistogramVec> = LazyLock::new(|| {
    HistogramVec::new(
        prometheus::HistogramOpts::new(
            "secrets_provider_rate_limit_wait_seconds",
            "Time spent waiting for a rate-limit token in seconds by backend",
        )
        .buckets(vec![0.0, 0.1, 0.5, 1.0, 5.0, 30.0, 120.0, 300.0]),
        &["backend"],
    )
    .expect("Failed to create RATE_LIMIT_WAIT metric - this should never happen")
});

static SECRETS_RELOADED_TOTAL: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "secrets_provider_secrets_reloaded_total",
        "Total number of current secrets re-read from the mount",
    )
    .expect("Failed to create SECRETS_RELOADED_TOTAL metric - this should never happen")
});

static JMES_SECRETS_TOTAL: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "secrets_provider_jmes_secrets_total",
        "Total number of secrets extracted via JMES paths",
    )
    .expect("Failed to create JMES_SECRETS_TOTAL metric - this should never happen")
});

/// Register all metrics with the crate registry. Call once at startup.
///
/// # Errors
///
/// Fails if a metric is already registered.
pub fn register_metrics() -> Result<()> {
    REGISTRY.register(Box::new(RECONCILIATIONS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(RECONCILIATION_DURATION.clone()))?;
    REGISTRY.register(Box::new(ERRORS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(BACKEND_FETCHES_TOTAL.clone()))?;
    REGISTRY.register(Box::new(BACKEND_FETCH_DURATION.clone()))?;
    REGISTRY.register(Box::new(BACKEND_FETCH_ERRORS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(BACKEND_RETRIES_TOTAL.clone()))?;
    REGISTRY.register(Box::new(RATE_LIMIT_WAIT.clone()))?;
    REGISTRY.register(Box::new(SECRETS_RELOADED_TOTAL.clone()))?;
    REGISTRY.register(Box::new(JMES_SECRETS_TOTAL.clone()))?;
    Ok(())
}

/// Registry holding the provider metrics, for the host's exposition endpoint
#[must_use]
pub fn registry() -> &'static Registry {
    &REGISTRY
}

pub fn increment_reconciliations() {
    RECONCILIATIONS_TOTAL.inc();
}

pub fn observe_reconciliation_duration(duration: f64) {
    RECONCILIATION_DURATION.observe(duration);
}

pub fn increment_errors(kind: &str) {
    ERRORS_TOTAL.with_label_values(&[kind]).inc();
}

pub fn record_backend_fetch(backend: &str, duration: f64) {
    BACKEND_FETCHES_TOTAL.with_label_values(&[backend]).inc();
    BACKEND_FETCH_DURATION
        .with_label_values(&[backend])
        .observe(duration);
}

pub fn increment_backend_fetch_errors(backend: &str) {
    BACKEND_FETCH_ERRORS_TOTAL
        .with_label_values(&[backend])
        .inc();
}

pub fn increment_backend_retries(backend: &str) {
    BACKEND_RETRIES_TOTAL.with_label_values(&[backend]).inc();
}

pub fn observe_rate_limit_wait(backend: &str, duration: f64) {
    RATE_LIMIT_WAIT.with_label_values(&[backend]).observe(duration);
}

pub fn increment_secrets_reloaded() {
    SECRETS_RELOADED_TOTAL.inc();
}

pub fn increment_jmes_secrets(count: usize) {
    JMES_SECRETS_TOTAL.inc_by(count as u64);
}
