//! # JMES Path Extraction
//!
//! Splits a JSON secret into one secret per configured JMES path.

use crate::controller::reconciler::types::SecretValue;
use crate::error::{ProviderError, Result};
use tracing::debug;

/// Extract the JMES path entries of a fetched secret
///
/// Returns an empty list when the secret has no JMES paths. Each extracted
/// value gets an object carrying only the entry's alias and the parent's
/// mount settings. String matches are written as their raw text; any other
/// match is written as compact JSON.
///
/// # Errors
///
/// Fails if the secret is not valid JSON, a path does not compile, or a
/// path matches nothing.
pub fn extract_jmes_secrets(secret: &SecretValue) -> Result<Vec<SecretValue>> {
    let object = secret.secret_object();
    if object.jmes_path.is_empty() {
        return Ok(Vec::new());
    }

    let name = object.display_name();
    let data: serde_json::Value = serde_json::from_slice(secret.value()).map_err(|e| {
        ProviderError::decomposition(name, format!("secret value is not valid JSON: {e}"))
    })?;

    let mut extracted = Vec::with_capacity(object.jmes_path.len());
    for entry in &object.jmes_path {
        let expression = jmespath::compile(&entry.path).map_err(|e| {
            ProviderError::decomposition(name, format!("invalid JMES path '{}': {e}", entry.path))
        })?;
        let result = expression.search(&data).map_err(|e| {
            ProviderError::decomposition(
                name,
                format!("failed evaluating JMES path '{}': {e}", entry.path),
            )
        })?;

        let value = if result.is_null() {
            return Err(ProviderError::decomposition(
                name,
                format!("JMES path '{}' matched nothing", entry.path),
            ));
        } else if let Some(text) = result.as_string() {
            text.as_bytes().to_vec()
        } else {
            serde_json::to_vec(&*result).map_err(|e| {
                ProviderError::decomposition(
                    name,
                    format!("failed encoding JMES path '{}' result: {e}", entry.path),
                )
            })?
        };

        debug!(
            secret.name = name,
            jmes_path = %entry.path,
            object_alias = %entry.object_alias,
            "Extracted JMES path value"
        );
        extracted.push(SecretValue::new(value, object.jmes_entry_object(entry)));
    }

    Ok(extracted)
}
