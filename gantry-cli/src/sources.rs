//! Desired documents and value sources
//!
//! Loads pipeline definitions and the resolver that backs their
//! `valueFrom` references, either a sources file or process environment.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use gantry_core::domain::{KeySelector, PipelineSpec};
use gantry_core::{InMemoryResolver, ResolveError, SourceKind, ValueResolver};
use serde::de::DeserializeOwned;

/// Read a YAML or JSON document; `.json` files are parsed as JSON
pub fn load_document<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse JSON document: {}", path.display()))
    } else {
        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse YAML document: {}", path.display()))
    }
}

/// Load and validate a desired pipeline
pub fn load_spec(path: &Path) -> Result<PipelineSpec> {
    let spec: PipelineSpec = load_document(path)?;
    spec.validate()
        .with_context(|| format!("Invalid pipeline definition: {}", path.display()))?;
    Ok(spec)
}

/// Resolver for `valueFrom` references
///
/// # Arguments
/// * `sources` - Sources file with `secrets` and `configMaps`; process
///   environment variables are used when absent
pub fn load_resolver(sources: Option<&Path>) -> Result<Arc<dyn ValueResolver>> {
    match sources {
        Some(path) => {
            let resolver: InMemoryResolver = load_document(path)?;
            Ok(Arc::new(resolver))
        }
        None => Ok(Arc::new(EnvValueResolver::from_process_env())),
    }
}

/// Resolver that reads `<NAME>_<KEY>` environment variables
///
/// Secret and config map references share one namespace. The namespace of
/// a selector is ignored.
#[derive(Debug, Default)]
pub struct EnvValueResolver {
    vars: HashMap<String, String>,
}

impl EnvValueResolver {
    pub fn new(vars: HashMap<String, String>) -> Self {
        Self { vars }
    }

    pub fn from_process_env() -> Self {
        Self::new(std::env::vars().collect())
    }

    /// Variable name for a selector: upper case, `-` and `.` become `_`
    pub fn env_var_name(selector: &KeySelector) -> String {
        format!("{}_{}", selector.name, selector.key)
            .to_uppercase()
            .replace(['-', '.'], "_")
    }
}

#[async_trait]
impl ValueResolver for EnvValueResolver {
    async fn resolve_key(
        &self,
        kind: SourceKind,
        selector: &KeySelector,
    ) -> Result<String, ResolveError> {
        let env_var = Self::env_var_name(selector);

        match self.vars.get(&env_var) {
            Some(value) => {
                tracing::debug!("Resolved {} {} from environment variable {}", kind, selector, env_var);
                Ok(value.clone())
            }
            None => Err(ResolveError::KeyNotFound {
                kind,
                source_name: format!("{} (environment variable {})", selector.name, env_var),
                key: selector.key.clone(),
            }),
        }
    }
}
