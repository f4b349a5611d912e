//! # Logging
//!
//! Installs the global `tracing` subscriber.
//!
//! `RUST_LOG` takes precedence; otherwise the configured log level applies
//! to this crate.

use crate::config::ProviderSettings;
use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber
///
/// Fails if a global subscriber is already installed.
pub fn init_tracing(settings: &ProviderSettings) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter(&settings.log_level).into());

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let result = if settings.log_format.eq_ignore_ascii_case("json") {
        builder.json().try_init()
    } else {
        builder.with_ansi(false).try_init()
    };

    result.map_err(|e| anyhow!("Failed to install tracing subscriber: {e}"))
}

/// Filter directive for the configured log level
fn default_filter(log_level: &str) -> String {
    format!(
        "secrets_mount_provider={}",
        log_level.trim().to_ascii_lowercase()
    )
}
