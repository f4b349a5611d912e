//! # Parser
//!
//! Parses the `objects` mount attribute into validated secret objects.
//!
//! The attribute is a YAML (or JSON) sequence of records:
//!
//! ```yaml
//! - objectName: "app/db"
//!   objectAlias: "db.json"
//!   objectVersionLabel: "ACSCurrent"
//!   jmesPath:
//!     - path: "username"
//!       objectAlias: "db-user"
//! - objectName: "app/token"
//!   objectType: "oos"
//! ```

pub mod arn;
pub mod types;
pub mod validation;

pub use types::{JmesPathObject, PathTranslation, SecretObject};

use crate::error::{ProviderError, Result};
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info};
use validation::validate_secret_object;

/// Names, aliases and file names seen so far in one batch
#[derive(Debug, Default)]
struct ValidationState {
    /// `name:alias:type` keys
    names: HashSet<String>,
    /// Object aliases and JMES aliases share one namespace
    aliases: HashSet<String>,
    file_names: HashSet<String>,
}

impl ValidationState {
    fn insert_file_name(&mut self, file_name: String, object_name: &str) -> Result<()> {
        if self.file_names.contains(&file_name) {
            return Err(ProviderError::validation(
                object_name,
                format!("duplicate file name: {file_name}"),
            ));
        }
        self.file_names.insert(file_name);
        Ok(())
    }

    fn process(&mut self, object: &SecretObject) -> Result<()> {
        validate_secret_object(object)?;

        let name = object.object_name.as_str();
        let object_type = object.object_type();
        let key = format!("{name}:{}:{object_type}", object.alias().unwrap_or_default());
        if !self.names.insert(key) {
            return Err(ProviderError::validation(
                name,
                format!("duplicate object name: {name} (type: {object_type})"),
            ));
        }

        if let Some(alias) = object.alias() {
            if !self.aliases.insert(alias.to_string()) {
                return Err(ProviderError::validation(
                    name,
                    format!("duplicate object alias: {alias}"),
                ));
            }
        }

        if !object.jmes_path.is_empty() {
            info!(secret.name = name, "Found JMES paths in secret object");
        }
        for entry in &object.jmes_path {
            if !self.aliases.insert(entry.object_alias.clone()) {
                return Err(ProviderError::validation(
                    name,
                    format!("duplicate JMES path object alias: {}", entry.object_alias),
                ));
            }
        }

        self.insert_file_name(object.file_name(), name)?;
        for entry in &object.jmes_path {
            self.insert_file_name(object.jmes_entry_object(entry).file_name(), name)?;
        }

        Ok(())
    }
}

/// Parse and validate the secret objects of one mount request
///
/// # Arguments
///
/// * `mount_dir` - Directory the secrets are mounted under
/// * `path_translation` - The `pathTranslation` attribute (see [`PathTranslation::from_config`])
/// * `object_spec` - The `objects` attribute
///
/// # Errors
///
/// The whole batch fails on a bad translation setting, an `objects` value that does not
/// parse, the first invalid object, or any duplicate name, alias or file name.
pub fn parse_secret_objects(
    mount_dir: &Path,
    path_translation: &str,
    object_spec: &str,
) -> Result<Vec<SecretObject>> {
    let translation = PathTranslation::from_config(path_translation)?;

    let spec_objects: Vec<SecretObject> = if object_spec.trim().is_empty() {
        Vec::new()
    } else {
        serde_yaml::from_str::<Option<Vec<SecretObject>>>(object_spec)
            .map_err(|e| {
                ProviderError::configuration(format!("Failed to load secret objects: {e}"))
            })?
            .unwrap_or_default()
    };

    let mut state = ValidationState::default();
    let mut objects = Vec::with_capacity(spec_objects.len());
    for spec_object in spec_objects {
        let object = spec_object.with_mount_settings(mount_dir, translation);
        state.process(&object)?;
        objects.push(object);
    }

    debug!(count = objects.len(), "Parsed secret objects");
    Ok(objects)
}
