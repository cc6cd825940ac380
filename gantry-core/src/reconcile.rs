//! Single-pass reconciliation against the remote pipeline config API
//!
//! [`PipelineConfigService`] is the seam to the server; the HTTP client
//! implements it, tests use an in-memory fake. [`Reconciler`] runs one
//! observe/create/update/delete step and keeps a [`ResourceStatus`] current.
//! Scheduling, retries and polling belong to whoever drives it.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::decision::{Verdict, decide};
use crate::domain::PipelineSpec;
use crate::dto::{CreatePipelineRequest, PipelineConfig};
use crate::error::{Error, Result};
use crate::hashing::{EnvironmentHashes, compute_hashes, resolve_environment};
use crate::mapping::{create_request, to_external};
use crate::resolver::ValueResolver;

/// A document together with the server's version token for it
#[derive(Debug, Clone, PartialEq)]
pub struct Versioned<T> {
    pub value: T,
    pub etag: String,
}

impl<T> Versioned<T> {
    pub fn new(value: T, etag: impl Into<String>) -> Self {
        Self {
            value,
            etag: etag.into(),
        }
    }
}

/// Failure reported by a [`PipelineConfigService`]
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ServiceError {
    /// The version token no longer matches; observe again before writing
    #[error("version conflict: {0}")]
    Conflict(String),

    /// The server refused the request
    #[error("request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The server could not be reached or answered garbage
    #[error("transport error: {0}")]
    Transport(String),
}

/// Remote store of pipeline config documents
#[async_trait]
pub trait PipelineConfigService: Send + Sync {
    /// Fetch a pipeline; `None` when it does not exist
    async fn get(
        &self,
        name: &str,
    ) -> std::result::Result<Option<Versioned<PipelineConfig>>, ServiceError>;

    async fn create(
        &self,
        request: &CreatePipelineRequest,
    ) -> std::result::Result<Versioned<PipelineConfig>, ServiceError>;

    /// Replace a pipeline, guarded by the last observed version token
    async fn update(
        &self,
        etag: &str,
        config: &PipelineConfig,
    ) -> std::result::Result<Versioned<PipelineConfig>, ServiceError>;

    async fn delete(&self, name: &str, etag: Option<&str>) -> std::result::Result<(), ServiceError>;
}

/// State persisted between passes for one managed pipeline
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
    #[serde(default)]
    pub environment_variable_hashes: EnvironmentHashes,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub at_provider: Option<PipelineConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_synced_at: Option<DateTime<Utc>>,
}

impl ResourceStatus {
    /// Name used on the server, falling back to the desired name
    pub fn name_for<'a>(&'a self, spec: &'a PipelineSpec) -> &'a str {
        self.external_name.as_deref().unwrap_or(&spec.name)
    }

    fn record(&mut self, name: &str, written: Versioned<PipelineConfig>, hashes: EnvironmentHashes) {
        self.external_name = Some(name.to_string());
        self.etag = Some(written.etag);
        self.environment_variable_hashes = hashes;
        self.at_provider = Some(written.value);
        self.last_synced_at = Some(Utc::now());
    }
}

/// Result of an observe step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observation {
    NotFound,
    Exists { verdict: Verdict },
}

impl Observation {
    pub fn exists(&self) -> bool {
        matches!(self, Self::Exists { .. })
    }

    pub fn up_to_date(&self) -> bool {
        matches!(self, Self::Exists { verdict } if verdict.up_to_date())
    }
}

/// What [`Reconciler::apply`] ended up doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Created,
    Updated,
    UpToDate,
}

/// Runs reconciliation steps for desired pipelines
pub struct Reconciler {
    service: Arc<dyn PipelineConfigService>,
    resolver: Arc<dyn ValueResolver>,
}

impl Reconciler {
    pub fn new(service: Arc<dyn PipelineConfigService>, resolver: Arc<dyn ValueResolver>) -> Self {
        Self { service, resolver }
    }

    /// Read the external document and compare it with the desired one
    ///
    /// Records the observed document and version token in `status`. A
    /// resolver failure is returned as an error, never as drift.
    pub async fn observe(&self, spec: &PipelineSpec, status: &mut ResourceStatus) -> Result<Observation> {
        let name = status.name_for(spec).to_string();
        let mut desired = to_external(spec, None)?;
        desired.name = Some(name.clone());

        let Some(observed) = self.service.get(&name).await? else {
            tracing::info!("Pipeline not found: {}", name);
            return Ok(Observation::NotFound);
        };

        let fresh = compute_hashes(spec, self.resolver.as_ref()).await?;
        let verdict = decide(
            &status.environment_variable_hashes,
            &fresh,
            &desired,
            &observed.value,
        );

        status.external_name = Some(name.clone());
        status.etag = Some(observed.etag);
        status.at_provider = Some(observed.value);

        tracing::info!(
            "Observed pipeline {} (hashes match: {}, structurally equal: {})",
            name,
            verdict.hashes_match,
            verdict.structurally_equal
        );
        Ok(Observation::Exists { verdict })
    }

    /// Create the pipeline and record the new hashes
    ///
    /// An already assigned external name wins over the desired name.
    pub async fn create(&self, spec: &PipelineSpec, status: &mut ResourceStatus) -> Result<()> {
        let name = status.name_for(spec).to_string();
        let resolved = resolve_environment(spec, self.resolver.as_ref()).await?;
        let mut request = create_request(spec, Some(&resolved))?;
        request.pipeline.name = Some(name.clone());

        let created = self.service.create(&request).await?;
        tracing::info!("Pipeline created: {} ({})", name, created.etag);

        status.record(&name, created, resolved.hashes());
        Ok(())
    }

    /// Replace the pipeline using the last observed version token
    pub async fn update(&self, spec: &PipelineSpec, status: &mut ResourceStatus) -> Result<()> {
        let name = status.name_for(spec).to_string();
        let etag = status
            .etag
            .clone()
            .ok_or_else(|| Error::MissingVersionToken(name.clone()))?;

        let resolved = resolve_environment(spec, self.resolver.as_ref()).await?;
        let mut config = to_external(spec, Some(&resolved))?;
        config.name = Some(name.clone());

        let updated = self.service.update(&etag, &config).await?;
        tracing::info!("Pipeline updated: {} ({} -> {})", name, etag, updated.etag);

        status.record(&name, updated, resolved.hashes());
        Ok(())
    }

    /// Delete the pipeline and clear everything recorded about it
    pub async fn delete(&self, spec: &PipelineSpec, status: &mut ResourceStatus) -> Result<()> {
        let name = status.name_for(spec).to_string();
        let etag = status
            .etag
            .clone()
            .ok_or_else(|| Error::MissingVersionToken(name.clone()))?;

        self.service.delete(&name, Some(&etag)).await?;
        tracing::info!("Pipeline deleted: {}", name);

        *status = ResourceStatus::default();
        Ok(())
    }

    /// Observe, then create or update when needed
    pub async fn apply(&self, spec: &PipelineSpec, status: &mut ResourceStatus) -> Result<ApplyOutcome> {
        match self.observe(spec, status).await? {
            Observation::NotFound => {
                self.create(spec, status).await?;
                Ok(ApplyOutcome::Created)
            }
            Observation::Exists { verdict } if verdict.up_to_date() => {
                status.last_synced_at = Some(Utc::now());
                Ok(ApplyOutcome::UpToDate)
            }
            Observation::Exists { .. } => {
                self.update(spec, status).await?;
                Ok(ApplyOutcome::Updated)
            }
        }
    }
}
