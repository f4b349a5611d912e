//! # OOS Secret Parameter Backend
//!
//! Fetches encrypted secret parameters from OOS.
//!
//! Parameters are always requested with decryption enabled. OOS does not
//! expose a version id for secret parameters, so every fetched value is
//! recorded under a fixed placeholder version.

use crate::constants::{BINARY_DATA_TYPE, OOS_PLACEHOLDER_VERSION};
use crate::provider::common::is_binary_data_type;
use crate::provider::{BackendError, BackendKind, FetchedSecret, SecretBackend};
use async_trait::async_trait;
use tracing::debug;

/// `GetSecretParameter` request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetSecretParameterRequest {
    pub name: String,
    pub with_decryption: bool,
}

/// Secret parameter returned by OOS
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SecretParameter {
    pub name: Option<String>,
    pub value: Option<String>,
    pub data_type: Option<String>,
}

impl std::fmt::Debug for SecretParameter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretParameter")
            .field("name", &self.name)
            .field("data_type", &self.data_type)
            .finish_non_exhaustive()
    }
}

/// `GetSecretParameter` response body
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetSecretParameterResponse {
    pub parameter: Option<SecretParameter>,
}

/// Minimal OOS client surface
#[async_trait]
pub trait OosClient: Send + Sync {
    async fn get_secret_parameter(
        &self,
        request: &GetSecretParameterRequest,
    ) -> Result<GetSecretParameterResponse, BackendError>;
}

/// OOS backend implementation
pub struct OosBackend<C> {
    client: C,
}

impl<C> std::fmt::Debug for OosBackend<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OosBackend").finish_non_exhaustive()
    }
}

impl<C: OosClient> OosBackend<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }
}

#[async_trait]
impl<C: OosClient> SecretBackend for OosBackend<C> {
    fn kind(&self) -> BackendKind {
        BackendKind::Oos
    }

    /// OOS parameters are unversioned; `version` and `version_label` are ignored
    async fn fetch_by_name(
        &self,
        name: &str,
        _version: Option<&str>,
        _version_label: Option<&str>,
    ) -> Result<FetchedSecret, BackendError> {
        let request = GetSecretParameterRequest {
            name: name.to_string(),
            with_decryption: true,
        };
        debug!(secret.name = name, "Requesting OOS secret parameter");

        let response = self.client.get_secret_parameter(&request).await?;
        let parameter = response
            .parameter
            .ok_or(BackendError::MissingField("Parameter"))?;

        if let Some(data_type) = parameter.data_type.as_deref() {
            if is_binary_data_type(data_type) {
                return Err(BackendError::UnsupportedDataType {
                    data_type: BINARY_DATA_TYPE.to_string(),
                });
            }
        }

        let value = parameter
            .value
            .ok_or(BackendError::MissingField("Parameter.Value"))?;

        Ok(FetchedSecret {
            data: value.into_bytes(),
            version_id: OOS_PLACEHOLDER_VERSION.to_string(),
        })
    }
}
