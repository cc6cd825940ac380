//! Desired job definitions

use serde::{Deserialize, Serialize};

use super::environment::{EnvironmentVariableSpec, KeyValue};
use super::task::TaskSpec;
use crate::dto::{ArtifactType, IntOrString};
use crate::error::ValidationError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSpec {
    pub name: String,
    /// Absent, `0` and `""` all mean a single instance
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_instance_count: Option<IntOrString>,
    /// Defaults to `"never"`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<IntOrString>,
    #[serde(default)]
    pub environment_variables: Vec<EnvironmentVariableSpec>,
    #[serde(default)]
    pub resources: Vec<String>,
    #[serde(default)]
    pub tasks: Vec<TaskSpec>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tabs: Vec<TabSpec>,
    #[serde(default)]
    pub artifacts: Vec<ArtifactSpec>,
    #[serde(default, rename = "elasticProfileID", skip_serializing_if = "String::is_empty")]
    pub elastic_profile_id: String,
}

impl JobSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn validate(&self, path: &str) -> Result<(), ValidationError> {
        let path = format!("{path}.{}", self.name);
        super::require_name(&path, &self.name)?;

        for var in &self.environment_variables {
            var.validate(&path)?;
        }
        for (i, task) in self.tasks.iter().enumerate() {
            task.validate(&format!("{path}.tasks[{i}]"))?;
        }
        for tab in &self.tabs {
            super::require_name(&format!("{path}.tabs"), &tab.name)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabSpec {
    pub name: String,
    pub path: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactSpec {
    #[serde(rename = "type", default)]
    pub kind: ArtifactType,
    #[serde(default)]
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    /// Artifact id; required for external artifacts
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_id: Option<String>,
    #[serde(default)]
    pub configuration: Vec<KeyValue>,
}
