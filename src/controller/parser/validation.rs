//! # Secret Object Validation
//!
//! Validates a secret object before the rest of the provider uses it.

use crate::constants::{ARN_SUPPORTED_SERVICE, PATH_SEPARATOR};
use crate::controller::parser::arn::{is_arn, Arn};
use crate::controller::parser::types::SecretObject;
use crate::error::{ProviderError, Result};
use regex::Regex;

/// Validate a single secret object
///
/// Checks the object name, the service of a fully-qualified name, that
/// neither the object's file name nor any JMES alias file name escapes the
/// mount directory, and that every JMES entry has a path and an alias.
///
/// # Errors
///
/// Returns a validation error naming the object, or a configuration error
/// for an unsupported ARN service.
pub fn validate_secret_object(object: &SecretObject) -> Result<()> {
    let name = object.object_name.as_str();
    if name.is_empty() {
        return Err(ProviderError::validation(
            object.display_name(),
            "object name must be specified",
        ));
    }

    if is_arn(name) {
        let arn: Arn = name.parse().map_err(|e| {
            ProviderError::validation(name, format!("invalid ARN format in object name: {e}"))
        })?;
        if arn.service != ARN_SUPPORTED_SERVICE {
            return Err(ProviderError::configuration(format!(
                "invalid service in ARN: {} (object {name})",
                arn.service
            )));
        }
    }

    validate_file_name(&object.file_name(), name)?;

    for entry in &object.jmes_path {
        if entry.path.is_empty() {
            return Err(ProviderError::validation(
                name,
                "path must be specified for JMES object",
            ));
        }
        if entry.object_alias.is_empty() {
            return Err(ProviderError::validation(
                name,
                "object alias must be specified for JMES object",
            ));
        }
        validate_file_name(&object.jmes_entry_object(entry).file_name(), name)?;
    }

    Ok(())
}

/// Validate a resolved file name
///
/// Rejects absolute names and any `..` path segment (leading, interior or
/// trailing) so the file cannot land outside the mount directory, plus null
/// bytes and other control characters.
///
/// # Errors
///
/// Returns a validation error naming `object_name`.
pub fn validate_file_name(file_name: &str, object_name: &str) -> Result<()> {
    let parent_segment = Regex::new(r"(^|/)\.\.(/|$)")
        .map_err(|e| ProviderError::configuration(format!("Failed to compile regex: {e}")))?;

    if file_name.starts_with(PATH_SEPARATOR) {
        return Err(ProviderError::validation(
            object_name,
            format!("file name can not be an absolute path: {file_name}"),
        ));
    }

    if parent_segment.is_match(file_name) {
        return Err(ProviderError::validation(
            object_name,
            format!("path can not contain ../: {file_name}"),
        ));
    }

    if file_name.chars().any(char::is_control) {
        return Err(ProviderError::validation(
            object_name,
            format!("file name '{}' contains control characters", file_name.escape_default()),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::parser::types::{JmesPathObject, PathTranslation};
    use std::path::Path;

    fn object(name: &str, translation: PathTranslation) -> SecretObject {
        SecretObject {
            object_name: name.to_string(),
            ..SecretObject::default()
        }
        .with_mount_settings(Path::new("/mnt"), translation)
    }

    #[test]
    fn test_parent_segments_rejected() {
        let invalid = vec!["..", "../etc/passwd", "a/../b", "a/b/..", "/..", "a/.."];
        for name in invalid {
            assert!(
                validate_file_name(name, name).is_err(),
                "File name '{}' should be invalid",
                name
            );
        }
    }

    #[test]
    fn test_dotted_names_allowed() {
        let valid = vec!["a..b", "...", "..a/b", "a/b..", "app.config", ".hidden"];
        for name in valid {
            assert!(
                validate_file_name(name, name).is_ok(),
                "File name '{}' should be valid",
                name
            );
        }
    }

    #[test]
    fn test_traversal_only_matters_after_translation() {
        // With translation on, separators are replaced so `..` is no longer a segment.
        let obj = object("../escape", PathTranslation::Enabled('_'));
        assert!(validate_secret_object(&obj).is_ok());

        let obj = object("../escape", PathTranslation::Disabled);
        let err = validate_secret_object(&obj).unwrap_err();
        assert!(err.to_string().contains("path can not contain ../"));

        let obj = object("/../escape", PathTranslation::Disabled);
        assert!(validate_secret_object(&obj).is_err());
    }

    #[test]
    fn test_absolute_file_names_rejected() {
        assert!(validate_file_name("/etc/shadow", "x").is_err());

        // Only one leading separator is stripped when translation is off.
        let obj = object("//etc/shadow", PathTranslation::Disabled);
        assert_eq!(obj.file_name(), "/etc/shadow");
        let err = validate_secret_object(&obj).unwrap_err();
        assert!(err.to_string().contains("absolute path"));

        let obj = object("//etc/shadow", PathTranslation::Enabled('_'));
        assert!(validate_secret_object(&obj).is_ok());
    }

    #[test]
    fn test_absolute_jmes_alias_rejected() {
        let mut obj = object("app/config", PathTranslation::Disabled);
        obj.jmes_path.push(JmesPathObject {
            path: "user".to_string(),
            object_alias: "//var/lib/user".to_string(),
        });
        assert!(validate_secret_object(&obj).is_err());
    }

    #[test]
    fn test_empty_name_rejected() {
        let obj = object("", PathTranslation::default());
        assert!(matches!(
            validate_secret_object(&obj),
            Err(ProviderError::Validation { .. })
        ));
    }

    #[test]
    fn test_arn_service_checked() {
        let obj = object("acs:kms:cn-hangzhou:123:secret/db", PathTranslation::default());
        assert!(validate_secret_object(&obj).is_ok());

        let obj = object("acs:oss:cn-hangzhou:123:bucket/db", PathTranslation::default());
        let err = validate_secret_object(&obj).unwrap_err();
        assert!(matches!(err, ProviderError::Configuration(_)));
        assert!(err.to_string().contains("oss"));

        let obj = object("acs:kms", PathTranslation::default());
        assert!(matches!(
            validate_secret_object(&obj),
            Err(ProviderError::Validation { .. })
        ));
    }

    #[test]
    fn test_jmes_entries_need_path_and_alias() {
        let mut obj = object("app/config", PathTranslation::default());
        obj.jmes_path.push(JmesPathObject {
            path: String::new(),
            object_alias: "user".to_string(),
        });
        let err = validate_secret_object(&obj).unwrap_err();
        assert!(err.to_string().contains("path must be specified"));

        obj.jmes_path[0] = JmesPathObject {
            path: "user".to_string(),
            object_alias: String::new(),
        };
        let err = validate_secret_object(&obj).unwrap_err();
        assert!(err.to_string().contains("object alias must be specified"));
    }

    #[test]
    fn test_jmes_alias_traversal_rejected() {
        let mut obj = object("app/config", PathTranslation::Disabled);
        obj.jmes_path.push(JmesPathObject {
            path: "user".to_string(),
            object_alias: "../user".to_string(),
        });
        assert!(validate_secret_object(&obj).is_err());
    }
}
