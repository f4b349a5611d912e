//! # KMS Secrets Manager Backend
//!
//! Fetches secret values from the KMS secrets manager.
//!
//! The vendor SDK is reached through the `KmsClient` trait so the host can
//! plug in its own client; only the request and response fields the provider
//! reads are modelled here.

use crate::constants::BINARY_DATA_TYPE;
use crate::provider::common::is_binary_data_type;
use crate::provider::{BackendError, BackendKind, FetchedSecret, SecretBackend};
use async_trait::async_trait;
use tracing::debug;

/// `GetSecretValue` request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetSecretValueRequest {
    pub secret_name: String,
    pub version_id: Option<String>,
    pub version_stage: Option<String>,
}

/// `GetSecretValue` response body
#[derive(Clone, Default, PartialEq, Eq)]
pub struct GetSecretValueResponse {
    pub secret_data: Option<String>,
    /// `text` or `binary`
    pub secret_data_type: Option<String>,
    pub version_id: Option<String>,
}

impl std::fmt::Debug for GetSecretValueResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GetSecretValueResponse")
            .field("secret_data_type", &self.secret_data_type)
            .field("version_id", &self.version_id)
            .finish_non_exhaustive()
    }
}

/// Minimal KMS client surface
#[async_trait]
pub trait KmsClient: Send + Sync {
    async fn get_secret_value(
        &self,
        request: &GetSecretValueRequest,
    ) -> Result<GetSecretValueResponse, BackendError>;
}

/// KMS backend implementation
pub struct KmsBackend<C> {
    client: C,
}

impl<C> std::fmt::Debug for KmsBackend<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KmsBackend").finish_non_exhaustive()
    }
}

impl<C: KmsClient> KmsBackend<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    fn build_request(
        name: &str,
        version: Option<&str>,
        version_label: Option<&str>,
    ) -> GetSecretValueRequest {
        GetSecretValueRequest {
            secret_name: name.to_string(),
            version_id: version.map(str::to_string),
            version_stage: version_label.map(str::to_string),
        }
    }
}

#[async_trait]
impl<C: KmsClient> SecretBackend for KmsBackend<C> {
    fn kind(&self) -> BackendKind {
        BackendKind::Kms
    }

    async fn fetch_by_name(
        &self,
        name: &str,
        version: Option<&str>,
        version_label: Option<&str>,
    ) -> Result<FetchedSecret, BackendError> {
        let request = Self::build_request(name, version, version_label);
        debug!(
            secret.name = name,
            version_id = ?request.version_id,
            version_stage = ?request.version_stage,
            "Requesting KMS secret value"
        );

        let response = self.client.get_secret_value(&request).await?;

        if let Some(data_type) = response.secret_data_type.as_deref() {
            if is_binary_data_type(data_type) {
                return Err(BackendError::UnsupportedDataType {
                    data_type: BINARY_DATA_TYPE.to_string(),
                });
            }
        }

        let data = response
            .secret_data
            .ok_or(BackendError::MissingField("SecretData"))?;
        let version_id = response
            .version_id
            .ok_or(BackendError::MissingField("VersionId"))?;

        Ok(FetchedSecret {
            data: data.into_bytes(),
            version_id,
        })
    }
}
