//! Desired task definitions

use serde::{Deserialize, Serialize};

use super::environment::KeyValue;
use crate::dto::{FetchArtifactOrigin, RunIf, TaskType};
use crate::error::ValidationError;

/// One task of a job
///
/// `onCancel` is read one level deep; a handler on the handler is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSpec {
    #[serde(rename = "type", default)]
    pub kind: TaskType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exec_attributes: Option<ExecTaskSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ant_attributes: Option<BuildFileTaskSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nant_attributes: Option<NantTaskSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rake_attributes: Option<BuildFileTaskSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fetch_attributes: Option<FetchTaskSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pluggable_attributes: Option<PluggableTaskSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_cancel: Option<Box<TaskSpec>>,
}

impl TaskSpec {
    pub fn exec(attributes: ExecTaskSpec) -> Self {
        Self {
            kind: TaskType::Exec,
            exec_attributes: Some(attributes),
            ..Default::default()
        }
    }

    pub fn fetch(attributes: FetchTaskSpec) -> Self {
        Self {
            kind: TaskType::Fetch,
            fetch_attributes: Some(attributes),
            ..Default::default()
        }
    }

    pub fn with_on_cancel(mut self, task: TaskSpec) -> Self {
        self.on_cancel = Some(Box::new(task));
        self
    }

    pub fn validate(&self, path: &str) -> Result<(), ValidationError> {
        self.validate_attributes(path)?;
        if let Some(cancel) = &self.on_cancel {
            cancel.validate_attributes(&format!("{path}.onCancel"))?;
        }
        Ok(())
    }

    fn validate_attributes(&self, path: &str) -> Result<(), ValidationError> {
        super::check_variant(
            path,
            self.kind,
            &[
                (TaskType::Exec, "execAttributes", self.exec_attributes.is_some()),
                (TaskType::Ant, "antAttributes", self.ant_attributes.is_some()),
                (TaskType::Nant, "nantAttributes", self.nant_attributes.is_some()),
                (TaskType::Rake, "rakeAttributes", self.rake_attributes.is_some()),
                (TaskType::Fetch, "fetchAttributes", self.fetch_attributes.is_some()),
                (
                    TaskType::Pluggable,
                    "pluggableAttributes",
                    self.pluggable_attributes.is_some(),
                ),
            ],
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecTaskSpec {
    #[serde(default)]
    pub run_if: Vec<RunIf>,
    pub command: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_directory: Option<String>,
}

/// Attributes of ant and rake tasks
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildFileTaskSpec {
    #[serde(default)]
    pub run_if: Vec<RunIf>,
    #[serde(default)]
    pub build_file: String,
    #[serde(default)]
    pub target: String,
    #[serde(default)]
    pub working_directory: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NantTaskSpec {
    #[serde(default)]
    pub run_if: Vec<RunIf>,
    #[serde(default)]
    pub build_file: String,
    #[serde(default)]
    pub target: String,
    #[serde(default)]
    pub nant_path: String,
    #[serde(default)]
    pub working_directory: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchTaskSpec {
    #[serde(default)]
    pub artifact_origin: FetchArtifactOrigin,
    #[serde(default)]
    pub run_if: Vec<RunIf>,
    #[serde(default)]
    pub pipeline: String,
    pub stage: String,
    pub job: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub is_source_a_file: bool,
    #[serde(default)]
    pub destination: String,
    #[serde(default)]
    pub artifact_id: String,
    #[serde(default)]
    pub configuration: Vec<KeyValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluggableTaskSpec {
    #[serde(default)]
    pub run_if: Vec<RunIf>,
    pub plugin_configuration: PluginConfigurationSpec,
    #[serde(default)]
    pub configuration: Vec<KeyValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginConfigurationSpec {
    pub id: String,
    #[serde(default)]
    pub version: String,
}
