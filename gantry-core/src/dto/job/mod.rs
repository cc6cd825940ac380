//! Job wire types

use serde::{Deserialize, Serialize};

use super::common::{ConfigProperty, EnvironmentVariable, IntOrString};
use super::task::Task;
use super::wire::{lenient_enum, null_as_default};

lenient_enum! {
    /// Kind of artifact a job publishes
    pub enum ArtifactType (default = Build) {
        Build => "build",
        Test => "test",
        External => "external",
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub name: String,
    /// `null` means a single instance; `"all"` runs on every agent
    #[serde(default)]
    pub run_instance_count: Option<IntOrString>,
    #[serde(default)]
    pub timeout: Option<IntOrString>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub environment_variables: Vec<EnvironmentVariable>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub resources: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tasks: Vec<Task>,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub tabs: Vec<Tab>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub artifacts: Vec<Artifact>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elastic_profile_id: Option<String>,
}

/// Custom tab on the job details page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tab {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub path: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    #[serde(rename = "type", default)]
    pub kind: ArtifactType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub configuration: Vec<ConfigProperty>,
}

impl Artifact {
    /// Identity within a job: the artifact id, or `type:source:destination`
    /// for build and test artifacts which carry none
    pub fn identity(&self) -> String {
        match &self.artifact_id {
            Some(id) if !id.is_empty() => id.clone(),
            _ => format!(
                "{}:{}:{}",
                self.kind,
                self.source.as_deref().unwrap_or_default(),
                self.destination.as_deref().unwrap_or_default()
            ),
        }
    }
}
