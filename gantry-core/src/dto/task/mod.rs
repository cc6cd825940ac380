//! Task wire types
//!
//! A task is a tagged union: `{"type": "exec", "attributes": {...}}`. The
//! tag and payload are handled by [`crate::codec`]; this module only holds
//! the per-kind attribute shapes.

use serde::{Deserialize, Serialize};

use super::common::ConfigProperty;
use super::wire::{lenient_enum, null_as_default};

lenient_enum! {
    pub enum TaskType (default = Exec) {
        Exec => "exec",
        Ant => "ant",
        Nant => "nant",
        Rake => "rake",
        Fetch => "fetch",
        Pluggable => "pluggable_task",
    }
}

lenient_enum! {
    /// Outcome of previous tasks under which this one runs
    pub enum RunIf (default = Passed) {
        Passed => "passed",
        Failed => "failed",
        Any => "any",
    }
}

lenient_enum! {
    /// Artifact store a fetch task pulls from
    pub enum FetchArtifactOrigin (default = GoCd) {
        GoCd => "gocd",
        External => "external",
    }
}

/// One task of a job, with an optional cancel handler
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub attributes: TaskAttributes,
    pub on_cancel: Option<CancelTask>,
}

impl Task {
    pub fn new(attributes: TaskAttributes) -> Self {
        Self {
            attributes,
            on_cancel: None,
        }
    }

    pub fn with_on_cancel(mut self, attributes: TaskAttributes) -> Self {
        self.on_cancel = Some(CancelTask { attributes });
        self
    }

    pub fn kind(&self) -> TaskType {
        self.attributes.kind()
    }
}

/// Task run when the enclosing task is cancelled
///
/// Carries no handler of its own, which bounds nesting at one level.
#[derive(Debug, Clone, PartialEq)]
pub struct CancelTask {
    pub attributes: TaskAttributes,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TaskAttributes {
    Exec(ExecAttributes),
    Ant(BuildFileAttributes),
    Nant(NantAttributes),
    Rake(BuildFileAttributes),
    Fetch(FetchAttributes),
    Pluggable(PluggableAttributes),
}

impl TaskAttributes {
    pub fn kind(&self) -> TaskType {
        match self {
            Self::Exec(_) => TaskType::Exec,
            Self::Ant(_) => TaskType::Ant,
            Self::Nant(_) => TaskType::Nant,
            Self::Rake(_) => TaskType::Rake,
            Self::Fetch(_) => TaskType::Fetch,
            Self::Pluggable(_) => TaskType::Pluggable,
        }
    }

    pub fn run_if(&self) -> &[RunIf] {
        match self {
            Self::Exec(a) => &a.run_if,
            Self::Ant(a) | Self::Rake(a) => &a.run_if,
            Self::Nant(a) => &a.run_if,
            Self::Fetch(a) => &a.run_if,
            Self::Pluggable(a) => &a.run_if,
        }
    }
}

impl Default for TaskAttributes {
    fn default() -> Self {
        Self::Exec(ExecAttributes::default())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecAttributes {
    #[serde(default, deserialize_with = "null_as_default")]
    pub run_if: Vec<RunIf>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub command: String,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<String>,
    #[serde(default)]
    pub working_directory: Option<String>,
}

/// Shared by ant and rake tasks
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildFileAttributes {
    #[serde(default, deserialize_with = "null_as_default")]
    pub run_if: Vec<RunIf>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub build_file: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub target: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub working_directory: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NantAttributes {
    #[serde(default, deserialize_with = "null_as_default")]
    pub run_if: Vec<RunIf>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub build_file: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub target: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub nant_path: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub working_directory: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchAttributes {
    #[serde(default)]
    pub artifact_origin: FetchArtifactOrigin,
    #[serde(default, deserialize_with = "null_as_default")]
    pub run_if: Vec<RunIf>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub pipeline: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub stage: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub job: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub source: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_source_a_file: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub destination: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub artifact_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub configuration: Vec<ConfigProperty>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluggableAttributes {
    #[serde(default, deserialize_with = "null_as_default")]
    pub run_if: Vec<RunIf>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub plugin_configuration: PluginConfiguration,
    #[serde(default, deserialize_with = "null_as_default")]
    pub configuration: Vec<ConfigProperty>,
}

/// Task plugin reference
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginConfiguration {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub version: String,
}
