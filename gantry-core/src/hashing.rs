//! Drift hash tracker
//!
//! Every environment variable in the desired tree gets one entry keyed by
//! its position:
//!
//! - `pipeline.<name>`
//! - `stage.<stage>.<name>`
//! - `job.<stage>.<job>.<name>`
//!
//! The value is the SHA-256 of the literal, or of the plaintext behind the
//! variable's reference. Plaintext is held in [`ResolvedEnvironment`] only
//! for as long as an apply needs it and never reaches the recorded map.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::domain::{EnvironmentVariableSpec, PipelineSpec};
use crate::resolver::{ResolveError, ValueResolver};

/// SHA-256 of `value` as lowercase hex
pub fn digest(value: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    format!("{:x}", hasher.finalize())
}

pub fn pipeline_key(name: &str) -> String {
    format!("pipeline.{name}")
}

pub fn stage_key(stage: &str, name: &str) -> String {
    format!("stage.{stage}.{name}")
}

pub fn job_key(stage: &str, job: &str, name: &str) -> String {
    format!("job.{stage}.{job}.{name}")
}

/// Path key → digest map, persisted verbatim in the resource status
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnvironmentHashes(BTreeMap<String, String>);

impl EnvironmentHashes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, digest: impl Into<String>) {
        self.0.insert(key.into(), digest.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Keys whose digest differs, or that exist on one side only
    pub fn changed_keys<'a>(&'a self, other: &'a EnvironmentHashes) -> Vec<&'a str> {
        let mut keys: Vec<&str> = self
            .0
            .iter()
            .filter(|(k, v)| other.0.get(*k) != Some(*v))
            .map(|(k, _)| k.as_str())
            .chain(
                other
                    .0
                    .keys()
                    .filter(|k| !self.0.contains_key(*k))
                    .map(String::as_str),
            )
            .collect();
        keys.sort_unstable();
        keys
    }
}

impl FromIterator<(String, String)> for EnvironmentHashes {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Plaintext of every variable, keyed like [`EnvironmentHashes`]
///
/// `Debug` prints keys only.
#[derive(Clone, Default)]
pub struct ResolvedEnvironment {
    values: BTreeMap<String, String>,
}

impl ResolvedEnvironment {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Digest of every value
    pub fn hashes(&self) -> EnvironmentHashes {
        self.values
            .iter()
            .map(|(k, v)| (k.clone(), digest(v)))
            .collect()
    }
}

impl std::fmt::Debug for ResolvedEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedEnvironment")
            .field("keys", &self.values.keys().collect::<Vec<_>>())
            .finish()
    }
}

async fn resolve_value(
    resolver: &dyn ValueResolver,
    var: &EnvironmentVariableSpec,
) -> Result<String, ResolveError> {
    if let Some(literal) = var.literal_value() {
        return Ok(literal.to_string());
    }
    match &var.value_from {
        Some(source) => resolver.resolve(source).await,
        None => Ok(String::new()),
    }
}

/// Resolve every variable in the tree
///
/// Any resolver failure aborts the whole walk; a partial result is never
/// returned.
pub async fn resolve_environment(
    spec: &PipelineSpec,
    resolver: &dyn ValueResolver,
) -> Result<ResolvedEnvironment, ResolveError> {
    let mut values = BTreeMap::new();

    for var in &spec.environment_variables {
        values.insert(pipeline_key(&var.name), resolve_value(resolver, var).await?);
    }

    for stage in &spec.stages {
        for var in &stage.environment_variables {
            values.insert(
                stage_key(&stage.name, &var.name),
                resolve_value(resolver, var).await?,
            );
        }

        for job in &stage.jobs {
            for var in &job.environment_variables {
                values.insert(
                    job_key(&stage.name, &job.name, &var.name),
                    resolve_value(resolver, var).await?,
                );
            }
        }
    }

    tracing::debug!("Resolved {} environment variables", values.len());
    Ok(ResolvedEnvironment { values })
}

/// Compute the drift hashes for a desired document
pub async fn compute_hashes(
    spec: &PipelineSpec,
    resolver: &dyn ValueResolver,
) -> Result<EnvironmentHashes, ResolveError> {
    Ok(resolve_environment(spec, resolver).await?.hashes())
}
