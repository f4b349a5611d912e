//! Secrets Mount Provider Library
//!
//! Provisions secrets from KMS and OOS onto a mount by reconciling a list of
//! secret objects against the remote stores. Tests are included in the module
//! files and under `tests/`.
//!
//! ## Quick Start
//!
//! ```rust
//! use secrets_mount_provider::prelude::*;
//! ```
//!
//! This brings commonly used types and traits into scope. For more specific imports,
//! use the individual modules.

pub mod config;
pub mod constants;
pub mod controller;
pub mod error;
pub mod observability;
pub mod prelude;
pub mod provider;
