//! # Reconciler
//!
//! Reconciles a batch of secret objects against the remote stores.
//!
//! For each object, in order:
//! 1. If the version map already holds the pinned version, re-read the file
//!    from the mount instead of calling the backend
//! 2. Otherwise wait for a rate-limit token, fetch from the backend, and
//!    retry once after a backoff on transient errors
//! 3. Extract any JMES path entries into their own secrets
//! 4. Record the version for the object and every extracted entry
//!
//! The first error aborts the pass.

pub mod extract;
pub mod mount;
pub mod types;

pub use extract::extract_jmes_secrets;
pub use mount::{MountRequest, MountResponse, SecretFile, SecretsProvider};
pub use types::{ObjectVersion, SecretValue, VersionMap};

use crate::config::ProviderSettings;
use crate::constants::{DEFAULT_RATE_LIMIT_WAIT_TIMEOUT_SECS, RETRY_BACKOFF_ATTEMPT};
use crate::controller::backoff::{classify, ExponentialBackoff};
use crate::controller::parser::SecretObject;
use crate::controller::rate_limit::BackendRateLimiter;
use crate::error::{ProviderError, Result};
use crate::observability::metrics;
use crate::provider::common::{log_fetch_result, record_fetch_metrics};
use crate::provider::{BackendError, BackendKind, FetchedSecret, SecretBackend};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, info_span, warn, Instrument};

/// Fetch engine for one or more reconciliation passes
///
/// Holds at most one backend per kind. The rate limiter is shared with every
/// other fetcher built from the same `BackendRateLimiter`.
#[derive(Clone)]
pub struct SecretFetcher {
    backends: HashMap<BackendKind, Arc<dyn SecretBackend>>,
    rate_limiter: BackendRateLimiter,
    backoff: ExponentialBackoff,
    rate_limit_wait_timeout: Duration,
}

impl std::fmt::Debug for SecretFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut kinds: Vec<_> = self.backends.keys().copied().collect();
        kinds.sort();
        f.debug_struct("SecretFetcher")
            .field("backends", &kinds)
            .field("backoff", &self.backoff)
            .field("rate_limit_wait_timeout", &self.rate_limit_wait_timeout)
            .finish_non_exhaustive()
    }
}

impl SecretFetcher {
    /// Create a fetcher with default backoff and a 5 minute rate-limit wait
    #[must_use]
    pub fn new(rate_limiter: BackendRateLimiter) -> Self {
        Self {
            backends: HashMap::new(),
            rate_limiter,
            backoff: ExponentialBackoff::default(),
            rate_limit_wait_timeout: Duration::from_secs(DEFAULT_RATE_LIMIT_WAIT_TIMEOUT_SECS),
        }
    }

    /// Create a fetcher using the backoff and wait timeout from `settings`
    #[must_use]
    pub fn from_settings(settings: &ProviderSettings, rate_limiter: BackendRateLimiter) -> Self {
        Self::new(rate_limiter)
            .with_backoff(settings.backoff())
            .with_rate_limit_wait_timeout(settings.rate_limit_wait_timeout())
    }

    /// Register a backend, replacing any existing backend of the same kind
    #[must_use]
    pub fn with_backend(mut self, backend: Arc<dyn SecretBackend>) -> Self {
        self.backends.insert(backend.kind(), backend);
        self
    }

    #[must_use]
    pub fn with_backoff(mut self, backoff: ExponentialBackoff) -> Self {
        self.backoff = backoff;
        self
    }

    #[must_use]
    pub fn with_rate_limit_wait_timeout(mut self, timeout: Duration) -> Self {
        self.rate_limit_wait_timeout = timeout;
        self
    }

    /// Run one reconciliation pass
    ///
    /// Returns the secrets in input order, each followed by its extracted
    /// JMES entries. `versions` is updated in place as objects are processed;
    /// on error it holds the entries of every object processed before the
    /// failure.
    ///
    /// # Errors
    ///
    /// Returns the first error encountered, naming the object that failed.
    pub async fn reconcile(
        &self,
        objects: &[SecretObject],
        versions: &mut VersionMap,
    ) -> Result<Vec<SecretValue>> {
        let span = info_span!("secrets.reconcile", objects = objects.len());
        let start = Instant::now();
        metrics::increment_reconciliations();

        let result = async {
            let mut values = Vec::with_capacity(objects.len());
            for object in objects {
                self.reconcile_object(object, versions, &mut values).await?;
            }
            Ok::<_, ProviderError>(values)
        }
        .instrument(span)
        .await;

        metrics::observe_reconciliation_duration(start.elapsed().as_secs_f64());
        match &result {
            Ok(values) => info!(
                objects = objects.len(),
                secrets = values.len(),
                duration_ms = start.elapsed().as_millis(),
                "Reconciled secret objects"
            ),
            Err(e) => {
                metrics::increment_errors(e.kind());
                error!(error.kind = e.kind(), error = %e, "Reconciliation failed");
            }
        }
        result
    }

    async fn reconcile_object(
        &self,
        object: &SecretObject,
        versions: &mut VersionMap,
        values: &mut Vec<SecretValue>,
    ) -> Result<()> {
        let (version, secret) = match is_current(object, versions) {
            Some(version) => (version, reload(object).await?),
            None => self.fetch(object).await?,
        };

        let extracted = extract_jmes_secrets(&secret)?;
        values.push(secret);
        if !extracted.is_empty() {
            info!(
                secret.name = %object.object_name,
                count = extracted.len(),
                "Extracted JMES path secrets"
            );
            metrics::increment_jmes_secrets(extracted.len());
            for value in &extracted {
                versions.insert(value.secret_object().file_name(), version.clone());
            }
            values.extend(extracted);
        }

        versions.insert(object.file_name(), version);
        Ok(())
    }

    /// Fetch an object from its backend, returning the version and value
    async fn fetch(&self, object: &SecretObject) -> Result<(String, SecretValue)> {
        let kind = object.backend_kind()?;
        let name = object.object_name.as_str();

        let waited = self
            .rate_limiter
            .wait(kind, self.rate_limit_wait_timeout)
            .await
            .map_err(|e| ProviderError::RateLimitTimeout {
                object: name.to_string(),
                backend: e.backend,
                waited: e.waited,
            })?;
        metrics::observe_rate_limit_wait(kind.as_str(), waited.as_secs_f64());

        let backend = self
            .backends
            .get(&kind)
            .ok_or_else(|| ProviderError::configuration(format!("{kind} client is empty")))?;

        let span = info_span!(
            "secrets.fetch",
            secret.name = name,
            backend = %kind,
            attempts = tracing::field::Empty
        );
        let mut fetched = self
            .fetch_with_retry(backend.as_ref(), object)
            .instrument(span)
            .await?;

        info!(
            secret.name = name,
            backend = %kind,
            version_id = %fetched.version_id,
            "Fetched secret from backend"
        );
        let version_id = std::mem::take(&mut fetched.version_id);
        let data = std::mem::take(&mut fetched.data);
        Ok((version_id, SecretValue::new(data, object.clone())))
    }

    async fn fetch_with_retry(
        &self,
        backend: &dyn SecretBackend,
        object: &SecretObject,
    ) -> Result<FetchedSecret> {
        let name = object.object_name.as_str();
        let span = tracing::Span::current();

        let first = call_backend(backend, object, 1).await;
        let error = match first {
            Ok(fetched) => {
                span.record("attempts", 1);
                return Ok(fetched);
            }
            Err(e) => e,
        };

        if !classify(&error).is_transient() {
            span.record("attempts", 1);
            return Err(ProviderError::fetch(name, error.to_string()));
        }

        let delay = self.backoff.delay(RETRY_BACKOFF_ATTEMPT);
        warn!(
            secret.name = name,
            backend = %backend.kind(),
            error = %error,
            delay_ms = delay.as_millis(),
            "Transient backend error, retrying once"
        );
        metrics::increment_backend_retries(backend.kind().as_str());
        tokio::time::sleep(delay).await;

        span.record("attempts", 2);
        call_backend(backend, object, 2)
            .await
            .map_err(|e| ProviderError::fetch(name, e.to_string()))
    }
}

async fn call_backend(
    backend: &dyn SecretBackend,
    object: &SecretObject,
    attempt: u32,
) -> std::result::Result<FetchedSecret, BackendError> {
    let start = Instant::now();
    let result = backend
        .fetch_by_name(&object.object_name, object.version(), object.version_label())
        .await;
    record_fetch_metrics(backend.kind(), start, &result);
    log_fetch_result(backend.kind(), &object.object_name, attempt, &result);
    result
}

/// Version to keep if the object's materialized file is already current
///
/// Only pinned objects can be current: the stored version must equal the
/// pin. Unpinned objects are always fetched again.
#[must_use]
pub fn is_current(object: &SecretObject, versions: &VersionMap) -> Option<String> {
    let file_name = object.file_name();
    let stored = versions.get(&file_name)?;
    let pinned = object.version()?;
    if stored == pinned {
        debug!(secret.name = %object.object_name, version = stored, "Secret is current");
        Some(stored.to_string())
    } else {
        None
    }
}

/// Re-read a materialized secret from the mount
async fn reload(object: &SecretObject) -> Result<SecretValue> {
    let path = object.mount_path();
    let data = tokio::fs::read(&path)
        .await
        .map_err(|source| ProviderError::DiskRead {
            object: object.display_name().to_string(),
            path: path.clone(),
            source,
        })?;
    metrics::increment_secrets_reloaded();
    debug!(secret.name = %object.object_name, path = %path.display(), "Reloaded secret from mount");
    Ok(SecretValue::new(data, object.clone()))
}
