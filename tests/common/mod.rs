//! Common test utilities for reconciliation tests
//!
//! Provides a scripted `SecretBackend` that counts calls and replays queued
//! responses, plus helpers for building fetchers and secret objects.

#![allow(dead_code, reason = "each test binary uses a different subset of helpers")]

use async_trait::async_trait;
use secrets_mount_provider::prelude::*;
use std::collections::VecDeque;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// One recorded backend call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub name: String,
    pub version: Option<String>,
    pub version_label: Option<String>,
}

/// Backend that replays queued results and records every call
///
/// When the queue is empty, calls succeed with `fallback`.
pub struct ScriptedBackend {
    kind: BackendKind,
    script: Mutex<VecDeque<Result<FetchedSecret, BackendError>>>,
    fallback: FetchedSecret,
    calls: Mutex<Vec<Call>>,
    call_count: AtomicUsize,
}

impl ScriptedBackend {
    pub fn new(kind: BackendKind) -> Self {
        Self {
            kind,
            script: Mutex::new(VecDeque::new()),
            fallback: secret("default", "v1"),
            calls: Mutex::new(Vec::new()),
            call_count: AtomicUsize::new(0),
        }
    }

    pub fn with_fallback(mut self, data: &str, version_id: &str) -> Self {
        self.fallback = secret(data, version_id);
        self
    }

    pub fn then(self, result: Result<FetchedSecret, BackendError>) -> Self {
        self.script.lock().unwrap().push_back(result);
        self
    }

    pub fn then_ok(self, data: &str, version_id: &str) -> Self {
        self.then(Ok(secret(data, version_id)))
    }

    pub fn then_err(self, code: &str) -> Self {
        self.then(Err(BackendError::remote(code, "scripted failure")))
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SecretBackend for ScriptedBackend {
    fn kind(&self) -> BackendKind {
        self.kind
    }

    async fn fetch_by_name(
        &self,
        name: &str,
        version: Option<&str>,
        version_label: Option<&str>,
    ) -> Result<FetchedSecret, BackendError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.calls.lock().unwrap().push(Call {
            name: name.to_string(),
            version: version.map(str::to_string),
            version_label: version_label.map(str::to_string),
        });
        let next = self.script.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Ok(self.fallback.clone()))
    }
}

pub fn secret(data: &str, version_id: &str) -> FetchedSecret {
    FetchedSecret {
        data: data.as_bytes().to_vec(),
        version_id: version_id.to_string(),
    }
}

/// Fetcher with no rate limits and the given backends
pub fn fetcher(backends: &[Arc<ScriptedBackend>]) -> SecretFetcher {
    backends
        .iter()
        .fold(SecretFetcher::new(BackendRateLimiter::new()), |f, b| {
            f.with_backend(b.clone())
        })
}

/// Parse an `objects` attribute with default path translation
pub fn objects(mount_dir: &Path, spec: &str) -> Vec<SecretObject> {
    parse_secret_objects(mount_dir, "", spec).expect("spec should parse")
}
