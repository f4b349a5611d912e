//! # Reconciler Types
//!
//! Values produced by a reconciliation pass and the version map carried
//! between passes.

use crate::controller::parser::SecretObject;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Version of one materialized file, in the host's wire shape
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ObjectVersion {
    /// Resolved file name
    pub id: String,
    pub version: String,
}

/// Resolved file name to the version currently materialized under it
///
/// Supplied by the caller at the start of a pass and updated as secrets are
/// fetched. Serializes as a plain JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct VersionMap(BTreeMap<String, String>);

impl VersionMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, file_name: &str) -> Option<&str> {
        self.0.get(file_name).map(String::as_str)
    }

    pub fn insert(&mut self, file_name: impl Into<String>, version: impl Into<String>) {
        self.0.insert(file_name.into(), version.into());
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Entries as the host's `[{id, version}]` list, ordered by file name
    #[must_use]
    pub fn to_object_versions(&self) -> Vec<ObjectVersion> {
        self.iter()
            .map(|(id, version)| ObjectVersion {
                id: id.to_string(),
                version: version.to_string(),
            })
            .collect()
    }
}

impl FromIterator<ObjectVersion> for VersionMap {
    /// Later entries win when an id repeats
    fn from_iter<I: IntoIterator<Item = ObjectVersion>>(iter: I) -> Self {
        Self(iter.into_iter().map(|ov| (ov.id, ov.version)).collect())
    }
}

impl From<Vec<ObjectVersion>> for VersionMap {
    fn from(versions: Vec<ObjectVersion>) -> Self {
        versions.into_iter().collect()
    }
}

/// A fetched (or reloaded) secret and the object it belongs to
///
/// The bytes are zeroed when the value is dropped and never appear in
/// `Debug` output.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretValue {
    value: Vec<u8>,
    #[zeroize(skip)]
    secret_object: SecretObject,
}

impl SecretValue {
    #[must_use]
    pub fn new(value: Vec<u8>, secret_object: SecretObject) -> Self {
        Self {
            value,
            secret_object,
        }
    }

    /// Secret bytes. Do not log.
    #[must_use]
    pub fn value(&self) -> &[u8] {
        &self.value
    }

    #[must_use]
    pub fn secret_object(&self) -> &SecretObject {
        &self.secret_object
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.value.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

impl fmt::Debug for SecretValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretValue")
            .field("value", &"[REDACTED]")
            .field("len", &self.value.len())
            .field("file_name", &self.secret_object.file_name())
            .finish()
    }
}
