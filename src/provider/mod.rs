//! # Provider Modules
//!
//! Backends for the remote secret stores a secret object can reference.
//!
//! Each backend implements the `SecretBackend` trait:
//! - `kms`: KMS secrets (versioned, with version stages)
//! - `oos`: OOS encrypted secret parameters (unversioned)

use async_trait::async_trait;
use std::fmt;
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::constants::{OBJECT_TYPE_KMS, OBJECT_TYPE_OOS};

pub mod common;
pub mod kms;
pub mod oos;

pub use kms::{GetSecretValueRequest, GetSecretValueResponse, KmsBackend, KmsClient};
pub use oos::{
    GetSecretParameterRequest, GetSecretParameterResponse, OosBackend, OosClient, SecretParameter,
};

/// Remote store a secret object is fetched from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BackendKind {
    /// KMS secrets manager
    Kms,
    /// OOS secret parameters
    Oos,
}

impl BackendKind {
    /// Resolve an `objectType` value; an empty type means KMS
    #[must_use]
    pub fn from_object_type(object_type: &str) -> Option<Self> {
        match object_type {
            "" | OBJECT_TYPE_KMS => Some(BackendKind::Kms),
            OBJECT_TYPE_OOS => Some(BackendKind::Oos),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Kms => OBJECT_TYPE_KMS,
            BackendKind::Oos => OBJECT_TYPE_OOS,
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned by a single backend call
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BackendError {
    /// The remote store rejected or failed the request
    #[error("{code}: {message}")]
    Remote { code: String, message: String },

    /// The secret exists but its payload type cannot be mounted
    #[error("secret data type '{data_type}' is not supported")]
    UnsupportedDataType { data_type: String },

    /// The response was missing a field the provider needs
    #[error("response is missing {0}")]
    MissingField(&'static str),
}

impl BackendError {
    /// Create a remote error from a service error code and message
    pub fn remote(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Remote {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Service error code, if this error came from the remote store
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        match self {
            BackendError::Remote { code, .. } => Some(code),
            _ => None,
        }
    }
}

/// Secret payload and version returned by a backend
///
/// The payload is zeroed when the value is dropped.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct FetchedSecret {
    pub data: Vec<u8>,
    pub version_id: String,
}

impl fmt::Debug for FetchedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchedSecret")
            .field("data", &"<redacted>")
            .field("version_id", &self.version_id)
            .finish()
    }
}

/// A remote secret store
///
/// Implementations perform exactly one remote call per invocation. Rate
/// limiting and retries are applied by the caller.
#[async_trait]
pub trait SecretBackend: Send + Sync {
    /// Which store this backend talks to
    fn kind(&self) -> BackendKind;

    /// Fetch a secret by name, optionally pinned to a version id or version stage
    async fn fetch_by_name(
        &self,
        name: &str,
        version: Option<&str>,
        version_label: Option<&str>,
    ) -> Result<FetchedSecret, BackendError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_kind_from_object_type() {
        assert_eq!(BackendKind::from_object_type(""), Some(BackendKind::Kms));
        assert_eq!(BackendKind::from_object_type("kms"), Some(BackendKind::Kms));
        assert_eq!(BackendKind::from_object_type("oos"), Some(BackendKind::Oos));
        assert_eq!(BackendKind::from_object_type("ssm"), None);
        assert_eq!(BackendKind::from_object_type("KMS"), None);
    }

    #[test]
    fn test_fetched_secret_zeroize_clears_payload() {
        let mut fetched = FetchedSecret {
            data: b"s3cr3t".to_vec(),
            version_id: "v1".to_string(),
        };
        assert!(!format!("{fetched:?}").contains("s3cr3t"));

        fetched.zeroize();
        assert!(fetched.data.is_empty());
        assert!(fetched.version_id.is_empty());
    }

    #[test]
    fn test_backend_error_code() {
        let err = BackendError::remote("Forbidden.ResourceNotFound", "no such secret");
        assert_eq!(err.code(), Some("Forbidden.ResourceNotFound"));
        assert_eq!(err.to_string(), "Forbidden.ResourceNotFound: no such secret");
        assert_eq!(BackendError::MissingField("SecretData").code(), None);
    }
}
