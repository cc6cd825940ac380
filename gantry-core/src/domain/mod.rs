//! Desired document model
//!
//! These are the camelCase types a user writes. They are validated once,
//! mapped to the external shape by [`crate::mapping`], and walked by
//! [`crate::hashing`] for drift tracking. Tagged unions use one optional
//! attribute field per kind; exactly the field matching `type` must be set.

pub mod environment;
pub mod job;
pub mod material;
pub mod pipeline;
pub mod stage;
pub mod task;

pub use environment::{EnvironmentVariableSpec, KeySelector, KeyValue, ParameterSpec, ValueSource};
pub use job::{ArtifactSpec, JobSpec, TabSpec};
pub use material::{
    DependencyMaterialSpec, FilterSpec, GitMaterialSpec, HgMaterialSpec, MaterialSpec,
    P4MaterialSpec, PackageMaterialSpec, PluginMaterialSpec, SvnMaterialSpec, TfsMaterialSpec,
};
pub use pipeline::{OriginSpec, PipelineSpec, TimerSpec, TrackingToolSpec};
pub use stage::{ApprovalSpec, AuthorizationSpec, StageSpec};
pub use task::{
    BuildFileTaskSpec, ExecTaskSpec, FetchTaskSpec, NantTaskSpec, PluggableTaskSpec,
    PluginConfigurationSpec, TaskSpec,
};

use crate::error::ValidationError;

/// Check that only the attribute field for `kind` is populated.
///
/// `fields` lists every kind with its field name and whether it is set.
pub(crate) fn check_variant<K>(
    path: &str,
    kind: K,
    fields: &[(K, &str, bool)],
) -> Result<(), ValidationError>
where
    K: PartialEq + std::fmt::Display,
{
    for (candidate, field, present) in fields {
        let selected = *candidate == kind;
        if selected && !present {
            return Err(ValidationError::MissingAttributes {
                path: path.to_string(),
                kind: kind.to_string(),
                field: field.to_string(),
            });
        }
        if !selected && *present {
            return Err(ValidationError::UnexpectedAttributes {
                path: path.to_string(),
                kind: kind.to_string(),
                field: field.to_string(),
            });
        }
    }
    Ok(())
}

pub(crate) fn require_name(path: &str, name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyName {
            path: path.to_string(),
        });
    }
    Ok(())
}
