//! # Errors
//!
//! Error types surfaced by a reconciliation pass.
//!
//! Every error aborts the whole pass. Variants tied to a secret object carry
//! its object name so the caller can tell which entry failed.

use crate::provider::BackendKind;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Error returned from parsing, validation, and reconciliation
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Bad path translation, unsupported object type, ARN service or missing client
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A secret object failed validation
    #[error("invalid secret object {object}: {reason}")]
    Validation { object: String, reason: String },

    /// Remote fetch failed after the permitted retry, or returned an unsupported payload
    #[error("failed fetching secret {object}: {message}")]
    Fetch { object: String, message: String },

    /// No rate-limit token became available in time
    #[error("timed out after {waited:?} waiting for {backend} rate limit while fetching {object}")]
    RateLimitTimeout {
        object: String,
        backend: BackendKind,
        waited: Duration,
    },

    /// JMES path extraction failed
    #[error("failed extracting JMES paths from secret {object}: {message}")]
    Decomposition { object: String, message: String },

    /// A current secret could not be re-read from the mount
    #[error("failed reloading secret {object} from {}: {source}", path.display())]
    DiskRead {
        object: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ProviderError {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Create a validation error for the named object
    pub fn validation(object: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            object: object.into(),
            reason: reason.into(),
        }
    }

    /// Create a fetch error for the named object
    pub fn fetch(object: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Fetch {
            object: object.into(),
            message: message.into(),
        }
    }

    /// Create a decomposition error for the named object
    pub fn decomposition(object: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decomposition {
            object: object.into(),
            message: message.into(),
        }
    }

    /// Stable label for logs and metrics
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderError::Configuration(_) => "configuration",
            ProviderError::Validation { .. } => "validation",
            ProviderError::Fetch { .. } => "fetch",
            ProviderError::RateLimitTimeout { .. } => "rate_limit_timeout",
            ProviderError::Decomposition { .. } => "decomposition",
            ProviderError::DiskRead { .. } => "disk_read",
        }
    }
}

/// Result alias used across the crate
pub type Result<T, E = ProviderError> = std::result::Result<T, E>;
