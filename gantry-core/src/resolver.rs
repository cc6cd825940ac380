//! Resolution of referenced environment values
//!
//! The core never reads secrets itself. It asks a [`ValueResolver`] for the
//! plaintext behind a [`ValueSource`] and only ever keeps a digest of it.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::{KeySelector, ValueSource};

/// Kind of object a reference points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Secret,
    ConfigMap,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Secret => f.write_str("secret"),
            Self::ConfigMap => f.write_str("config map"),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    /// The referenced object does not exist
    #[error("{kind} '{source_name}' not found")]
    SourceNotFound {
        kind: SourceKind,
        source_name: String,
    },

    /// The object exists but has no such key
    #[error("key '{key}' not found in {kind} '{source_name}'")]
    KeyNotFound {
        kind: SourceKind,
        source_name: String,
        key: String,
    },

    /// The backing store failed or the reference is unusable
    #[error("resolver backend error: {0}")]
    Backend(String),
}

/// Capability to turn a named reference into plaintext
#[async_trait]
pub trait ValueResolver: Send + Sync {
    /// Look up one key of a secret or config map
    async fn resolve_key(
        &self,
        kind: SourceKind,
        selector: &KeySelector,
    ) -> Result<String, ResolveError>;

    /// Resolve whichever reference the source carries
    async fn resolve(&self, source: &ValueSource) -> Result<String, ResolveError> {
        match (&source.secret_key_ref, &source.config_map_key_ref) {
            (Some(selector), None) => self.resolve_key(SourceKind::Secret, selector).await,
            (None, Some(selector)) => self.resolve_key(SourceKind::ConfigMap, selector).await,
            _ => Err(ResolveError::Backend(
                "value source must name exactly one reference".to_string(),
            )),
        }
    }
}

/// Object address used as the map key: `namespace/name`, or `name` alone
pub fn source_key(selector: &KeySelector) -> String {
    if selector.namespace.is_empty() {
        selector.name.clone()
    } else {
        format!("{}/{}", selector.namespace, selector.name)
    }
}

/// Resolver backed by maps held in memory
///
/// Deserializes from `{"secrets": {"ns/name": {"key": "value"}}, "configMaps": {...}}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InMemoryResolver {
    #[serde(default)]
    secrets: HashMap<String, HashMap<String, String>>,
    #[serde(default)]
    config_maps: HashMap<String, HashMap<String, String>>,
}

impl InMemoryResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a secret key; `source` is `namespace/name`
    pub fn with_secret(
        mut self,
        source: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.secrets
            .entry(source.into())
            .or_default()
            .insert(key.into(), value.into());
        self
    }

    /// Add a config map key; `source` is `namespace/name`
    pub fn with_config_map(
        mut self,
        source: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.config_maps
            .entry(source.into())
            .or_default()
            .insert(key.into(), value.into());
        self
    }
}

#[async_trait]
impl ValueResolver for InMemoryResolver {
    async fn resolve_key(
        &self,
        kind: SourceKind,
        selector: &KeySelector,
    ) -> Result<String, ResolveError> {
        let objects = match kind {
            SourceKind::Secret => &self.secrets,
            SourceKind::ConfigMap => &self.config_maps,
        };

        let source_name = source_key(selector);
        let data = objects
            .get(&source_name)
            .ok_or_else(|| ResolveError::SourceNotFound {
                kind,
                source_name: source_name.clone(),
            })?;

        data.get(&selector.key)
            .cloned()
            .ok_or_else(|| ResolveError::KeyNotFound {
                kind,
                source_name,
                key: selector.key.clone(),
            })
    }
}
