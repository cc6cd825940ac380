//! Desired pipeline definition

use serde::{Deserialize, Serialize};

use super::environment::{EnvironmentVariableSpec, ParameterSpec};
use super::material::MaterialSpec;
use super::stage::StageSpec;
use crate::dto::{LockBehavior, OriginType};
use crate::error::ValidationError;

/// Root of the desired document
///
/// `name` becomes the external identity of the pipeline once created.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineSpec {
    pub name: String,
    #[serde(default)]
    pub group: String,
    #[serde(default)]
    pub label_template: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lock_behavior: Option<LockBehavior>,
    #[serde(default)]
    pub template: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<OriginSpec>,
    #[serde(default)]
    pub parameters: Vec<ParameterSpec>,
    #[serde(default)]
    pub environment_variables: Vec<EnvironmentVariableSpec>,
    #[serde(default)]
    pub materials: Vec<MaterialSpec>,
    #[serde(default)]
    pub stages: Vec<StageSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_tool: Option<TrackingToolSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timer: Option<TimerSpec>,
}

impl PipelineSpec {
    pub fn new(name: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            group: group.into(),
            ..Default::default()
        }
    }

    /// Check names and tagged-union shapes across the whole tree
    pub fn validate(&self) -> Result<(), ValidationError> {
        super::require_name("pipeline", &self.name)?;

        for param in &self.parameters {
            super::require_name("pipeline.parameters", &param.name)?;
        }
        for var in &self.environment_variables {
            var.validate("pipeline")?;
        }
        for (i, material) in self.materials.iter().enumerate() {
            material.validate(&format!("pipeline.materials[{i}]"))?;
        }
        for stage in &self.stages {
            stage.validate()?;
        }
        Ok(())
    }

    /// Whether any variable anywhere in the tree needs resolving
    pub fn has_references(&self) -> bool {
        let refs = |vars: &[EnvironmentVariableSpec]| {
            vars.iter()
                .any(|v| v.literal_value().is_none() && v.value_from.is_some())
        };
        refs(&self.environment_variables)
            || self.stages.iter().any(|s| {
                refs(&s.environment_variables)
                    || s.jobs.iter().any(|j| refs(&j.environment_variables))
            })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OriginSpec {
    #[serde(rename = "type", default)]
    pub kind: OriginType,
    #[serde(default)]
    pub id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingToolSpec {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub url_pattern: String,
    #[serde(default)]
    pub regex: String,
}

/// Cron-style trigger
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerSpec {
    #[serde(default)]
    pub spec: String,
    #[serde(default)]
    pub only_on_changes: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ExecTaskSpec, JobSpec, KeySelector, TaskSpec};

    fn sample() -> PipelineSpec {
        let mut job = JobSpec::new("j1");
        job.tasks.push(TaskSpec::exec(ExecTaskSpec {
            command: "make".into(),
            ..Default::default()
        }));
        let mut stage = StageSpec::new("s1");
        stage.jobs.push(job);

        let mut spec = PipelineSpec::new("app", "default");
        spec.stages.push(stage);
        spec
    }

    #[test]
    fn test_validate_valid_pipeline() {
        assert!(sample().validate().is_ok());
        assert!(!sample().has_references());
    }

    #[test]
    fn test_validate_empty_name() {
        let spec = PipelineSpec::new("", "default");
        assert!(matches!(
            spec.validate(),
            Err(ValidationError::EmptyName { .. })
        ));
    }

    #[test]
    fn test_validate_reports_nested_path() {
        let mut spec = sample();
        spec.stages[0].jobs[0].tasks.push(TaskSpec {
            kind: crate::dto::TaskType::Ant,
            ..Default::default()
        });

        let err = spec.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "job.s1.j1.tasks[1]: type 'ant' requires antAttributes"
        );
    }

    #[test]
    fn test_has_references_in_job() {
        let mut spec = sample();
        spec.stages[0].jobs[0]
            .environment_variables
            .push(EnvironmentVariableSpec::from_secret(
                "TOKEN",
                KeySelector::new("ci", "creds", "token"),
            ));
        assert!(spec.has_references());
    }

    #[test]
    fn test_decode_desired_document_omits_optionals() {
        let json = r#"{
            "name": "app",
            "group": "default",
            "materials": [{"type": "git", "gitAttributes": {"url": "https://x/repo.git", "branch": "main"}}],
            "stages": [{"name": "s1", "jobs": [{"name": "j1", "tasks": []}]}]
        }"#;
        let spec: PipelineSpec = serde_json::from_str(json).unwrap();
        assert_eq!(spec.lock_behavior, None);
        assert!(spec.origin.is_none());
        assert!(spec.validate().is_ok());
    }
}
