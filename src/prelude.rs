//! # Prelude
//!
//! Re-exports commonly used types and traits for convenience.
//!
//! ## Usage
//!
//! ```rust
//! use secrets_mount_provider::prelude::*;
//! ```
//!
//! This brings into scope:
//! - Secret object types and the parser entry point
//! - The fetch engine, mount request and response types
//! - Backend traits and the KMS/OOS adapters
//! - Settings and the error type

pub use crate::controller::parser::{
    parse_secret_objects, JmesPathObject, PathTranslation, SecretObject,
};

pub use crate::controller::reconciler::{
    MountRequest, MountResponse, ObjectVersion, SecretFetcher, SecretFile, SecretValue,
    SecretsProvider, VersionMap,
};

pub use crate::controller::backoff::ExponentialBackoff;
pub use crate::controller::rate_limit::{BackendRateLimiter, RateLimit};

pub use crate::provider::{
    BackendError, BackendKind, FetchedSecret, KmsBackend, KmsClient, OosBackend, OosClient,
    SecretBackend,
};

pub use crate::config::ProviderSettings;
pub use crate::error::{ProviderError, Result};
