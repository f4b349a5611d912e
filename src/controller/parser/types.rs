//! # Types
//!
//! Secret object records parsed from the mount specification.

use crate::constants::{
    DEFAULT_PATH_TRANSLATION, OBJECT_TYPE_KMS, PATH_SEPARATOR, PATH_TRANSLATION_DISABLED,
};
use crate::error::{ProviderError, Result};
use crate::provider::BackendKind;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// How path separators in object names map to file names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathTranslation {
    /// Replace every separator with this character
    Enabled(char),
    /// Keep separators; strip one leading separator
    Disabled,
}

impl Default for PathTranslation {
    fn default() -> Self {
        PathTranslation::Enabled(DEFAULT_PATH_TRANSLATION)
    }
}

impl PathTranslation {
    /// Parse the `pathTranslation` mount attribute
    ///
    /// - `""` uses the default `_`
    /// - `"false"` (any case) disables translation
    /// - any other single character is used as-is
    ///
    /// # Errors
    ///
    /// Returns a configuration error for any other value.
    pub fn from_config(value: &str) -> Result<Self> {
        if value.is_empty() {
            return Ok(PathTranslation::default());
        }
        if value.eq_ignore_ascii_case(PATH_TRANSLATION_DISABLED) {
            return Ok(PathTranslation::Disabled);
        }

        let mut chars = value.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(PathTranslation::Enabled(c)),
            _ => Err(ProviderError::configuration(
                "pathTranslation must be either 'False' or a single character string",
            )),
        }
    }

    /// Apply the translation to an object name or alias
    #[must_use]
    pub fn apply(self, name: &str) -> String {
        match self {
            PathTranslation::Enabled(c) => name.replace(PATH_SEPARATOR, &c.to_string()),
            PathTranslation::Disabled => name
                .strip_prefix(PATH_SEPARATOR)
                .unwrap_or(name)
                .to_string(),
        }
    }
}

/// A key to extract from a JSON secret and mount as its own file
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JmesPathObject {
    /// JMES path expression evaluated against the secret
    pub path: String,
    /// File name for the extracted value
    pub object_alias: String,
}

/// An individual record from the mount request naming a secret to fetch
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SecretObject {
    /// Name of the secret
    pub object_name: String,
    /// Optional file name to store the secret in (defaults to the object name)
    pub object_alias: Option<String>,
    /// Optional version id to pin (defaults to latest)
    pub object_version: Option<String>,
    /// Optional version stage to pin (defaults to latest)
    pub object_version_label: Option<String>,
    /// `kms` (default) or `oos`
    pub object_type: Option<String>,
    /// Keys to extract from a JSON secret
    pub jmes_path: Vec<JmesPathObject>,
    /// Optional KMS endpoint override, resolved by the host's client factory
    pub kms_endpoint: Option<String>,

    #[serde(skip)]
    pub(crate) translation: PathTranslation,
    #[serde(skip)]
    pub(crate) mount_dir: PathBuf,
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|v| !v.is_empty())
}

impl SecretObject {
    #[must_use]
    pub fn alias(&self) -> Option<&str> {
        non_empty(self.object_alias.as_ref())
    }

    #[must_use]
    pub fn version(&self) -> Option<&str> {
        non_empty(self.object_version.as_ref())
    }

    #[must_use]
    pub fn version_label(&self) -> Option<&str> {
        non_empty(self.object_version_label.as_ref())
    }

    /// Object type with the `kms` default applied
    #[must_use]
    pub fn object_type(&self) -> &str {
        non_empty(self.object_type.as_ref()).unwrap_or(OBJECT_TYPE_KMS)
    }

    /// Backend this object is fetched from
    ///
    /// # Errors
    ///
    /// Returns a configuration error naming an unsupported object type.
    pub fn backend_kind(&self) -> Result<BackendKind> {
        BackendKind::from_object_type(self.object_type()).ok_or_else(|| {
            ProviderError::configuration(format!(
                "secret type {} not supported for {}, only kms and oos are supported",
                self.object_type(),
                self.display_name()
            ))
        })
    }

    #[must_use]
    pub fn translation(&self) -> PathTranslation {
        self.translation
    }

    /// Name used in logs and errors; extracted JMES objects only have an alias
    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.object_name.is_empty() {
            self.alias().unwrap_or_default()
        } else {
            &self.object_name
        }
    }

    /// File name the secret is written to, also the key in the version map
    #[must_use]
    pub fn file_name(&self) -> String {
        self.translation
            .apply(self.alias().unwrap_or(self.object_name.as_str()))
    }

    /// Mount point directory
    #[must_use]
    pub fn mount_dir(&self) -> &Path {
        &self.mount_dir
    }

    /// Full path (mount point + file) of the file where the secret is stored
    #[must_use]
    pub fn mount_path(&self) -> PathBuf {
        self.mount_dir.join(self.file_name())
    }

    /// Object for a value extracted through a JMES path
    ///
    /// Carries only the alias and this object's mount settings, so it is
    /// never decomposed further.
    #[must_use]
    pub fn jmes_entry_object(&self, entry: &JmesPathObject) -> SecretObject {
        SecretObject {
            object_alias: Some(entry.object_alias.clone()),
            translation: self.translation,
            mount_dir: self.mount_dir.clone(),
            ..SecretObject::default()
        }
    }

    pub(crate) fn with_mount_settings(
        mut self,
        mount_dir: &Path,
        translation: PathTranslation,
    ) -> Self {
        self.mount_dir = mount_dir.to_path_buf();
        self.translation = translation;
        self
    }
}
