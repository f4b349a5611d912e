//! # Common Provider Utilities
//!
//! Shared helpers used by the KMS and OOS backends and by the fetch engine
//! when it records backend calls.

use crate::constants::BINARY_DATA_TYPE;
use crate::observability::metrics;
use crate::provider::{BackendError, BackendKind};
use std::time::Instant;
use tracing::{debug, warn};

/// Whether a payload type tag marks binary data
#[must_use]
pub fn is_binary_data_type(data_type: &str) -> bool {
    data_type.eq_ignore_ascii_case(BINARY_DATA_TYPE)
}

/// Record metrics for one remote call
///
/// # Arguments
///
/// * `backend` - Backend that served the call
/// * `start_time` - When the call was issued
/// * `result` - Outcome of the call
pub fn record_fetch_metrics<T>(
    backend: BackendKind,
    start_time: Instant,
    result: &Result<T, BackendError>,
) {
    metrics::record_backend_fetch(backend.as_str(), start_time.elapsed().as_secs_f64());
    if result.is_err() {
        metrics::increment_backend_fetch_errors(backend.as_str());
    }
}

/// Log the outcome of one remote call
pub fn log_fetch_result<T>(
    backend: BackendKind,
    secret_name: &str,
    attempt: u32,
    result: &Result<T, BackendError>,
) {
    match result {
        Ok(_) => debug!(
            backend = %backend,
            secret.name = secret_name,
            attempt,
            "Fetched secret"
        ),
        Err(e) => warn!(
            backend = %backend,
            secret.name = secret_name,
            attempt,
            error = %e,
            "Failed to fetch secret"
        ),
    }
}
