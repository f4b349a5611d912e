//! # Mount
//!
//! Turns a host mount request into the files the host should write.
//!
//! The provider never touches the mount itself except to re-read files that
//! are already current; writing the returned files is left to the host.

use crate::constants::{ATTRIBUTE_OBJECTS, ATTRIBUTE_PATH_TRANSLATION, DEFAULT_FILE_PERMISSION};
use crate::controller::parser::parse_secret_objects;
use crate::controller::reconciler::types::{ObjectVersion, VersionMap};
use crate::controller::reconciler::SecretFetcher;
use crate::error::Result;
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use tracing::{info, info_span, Instrument};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A mount request from the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountRequest {
    /// The `objects` attribute
    pub objects: String,
    /// The `pathTranslation` attribute
    pub path_translation: String,
    /// Mount directory
    pub target_path: PathBuf,
    /// Mode for written files
    pub file_permission: u32,
    /// Versions currently materialized under `target_path`
    pub current_object_versions: Vec<ObjectVersion>,
}

impl MountRequest {
    /// Build a request from the host's attribute map
    ///
    /// Missing attributes are treated as empty.
    #[must_use]
    pub fn from_attributes(
        attributes: &HashMap<String, String>,
        target_path: impl Into<PathBuf>,
    ) -> Self {
        let attribute = |key: &str| attributes.get(key).cloned().unwrap_or_default();
        Self {
            objects: attribute(ATTRIBUTE_OBJECTS),
            path_translation: attribute(ATTRIBUTE_PATH_TRANSLATION),
            target_path: target_path.into(),
            file_permission: DEFAULT_FILE_PERMISSION,
            current_object_versions: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_file_permission(mut self, mode: u32) -> Self {
        self.file_permission = mode;
        self
    }

    #[must_use]
    pub fn with_current_object_versions(mut self, versions: Vec<ObjectVersion>) -> Self {
        self.current_object_versions = versions;
        self
    }
}

/// A file for the host to write under the mount directory
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SecretFile {
    /// Path relative to the mount directory
    pub path: String,
    pub contents: Vec<u8>,
    pub mode: u32,
    pub version: String,
}

impl fmt::Debug for SecretFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretFile")
            .field("path", &self.path)
            .field("contents", &"[REDACTED]")
            .field("mode", &format_args!("{:o}", self.mode))
            .field("version", &self.version)
            .finish()
    }
}

/// Result of a successful mount
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountResponse {
    /// Files in reconciliation order
    pub files: Vec<SecretFile>,
    /// Versions to hand back on the next mount request
    pub object_versions: Vec<ObjectVersion>,
}

/// Entry point the host transport calls for each mount
#[derive(Debug, Clone)]
pub struct SecretsProvider {
    fetcher: SecretFetcher,
}

impl SecretsProvider {
    #[must_use]
    pub fn new(fetcher: SecretFetcher) -> Self {
        Self { fetcher }
    }

    #[must_use]
    pub fn fetcher(&self) -> &SecretFetcher {
        &self.fetcher
    }

    /// Parse, reconcile and package the secrets of one mount request
    ///
    /// # Errors
    ///
    /// Returns the first parse, validation or reconciliation error; no files
    /// are returned in that case.
    pub async fn mount(&self, request: MountRequest) -> Result<MountResponse> {
        let span = info_span!(
            "secrets.mount",
            target_path = %request.target_path.display()
        );

        async move {
            let objects = parse_secret_objects(
                &request.target_path,
                &request.path_translation,
                &request.objects,
            )?;

            let mut versions = VersionMap::from(request.current_object_versions);
            let values = self.fetcher.reconcile(&objects, &mut versions).await?;

            let files: Vec<SecretFile> = values
                .iter()
                .map(|value| {
                    let path = value.secret_object().file_name();
                    let version = versions.get(&path).unwrap_or_default().to_string();
                    SecretFile {
                        path,
                        contents: value.value().to_vec(),
                        mode: request.file_permission,
                        version,
                    }
                })
                .collect();

            info!(files = files.len(), "Prepared secret files for mount");
            Ok(MountResponse {
                files,
                object_versions: versions.to_object_versions(),
            })
        }
        .instrument(span)
        .await
    }
}
