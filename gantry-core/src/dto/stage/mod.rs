//! Stage wire types

use serde::{Deserialize, Serialize};

use super::common::EnvironmentVariable;
use super::job::Job;
use super::wire::{lenient_enum, null_as_default};

lenient_enum! {
    /// How a stage is triggered
    pub enum ApprovalType (default = Success) {
        Success => "success",
        Manual => "manual",
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub fetch_materials: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub clean_working_directory: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub never_cleanup_artifacts: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub approval: Approval,
    #[serde(default, deserialize_with = "null_as_default")]
    pub environment_variables: Vec<EnvironmentVariable>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub jobs: Vec<Job>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Approval {
    #[serde(rename = "type", default)]
    pub kind: ApprovalType,
    #[serde(default, deserialize_with = "null_as_default")]
    pub allow_only_on_success: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub authorization: Authorization,
}

/// Users and roles allowed to trigger a manual stage
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Authorization {
    #[serde(default, deserialize_with = "null_as_default")]
    pub users: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub roles: Vec<String>,
}
