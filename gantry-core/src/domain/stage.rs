//! Desired stage definitions

use serde::{Deserialize, Serialize};

use super::environment::EnvironmentVariableSpec;
use super::job::JobSpec;
use crate::dto::ApprovalType;
use crate::error::ValidationError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageSpec {
    pub name: String,
    #[serde(default)]
    pub fetch_materials: bool,
    #[serde(default)]
    pub clean_working_dir: bool,
    #[serde(default)]
    pub never_cleanup_artifacts: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approval: Option<ApprovalSpec>,
    #[serde(default)]
    pub environment_variables: Vec<EnvironmentVariableSpec>,
    #[serde(default)]
    pub jobs: Vec<JobSpec>,
}

impl StageSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fetch_materials: true,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let path = format!("stage.{}", self.name);
        super::require_name(&path, &self.name)?;

        for var in &self.environment_variables {
            var.validate(&path)?;
        }
        for job in &self.jobs {
            job.validate(&format!("job.{}", self.name))?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalSpec {
    #[serde(rename = "type", default)]
    pub kind: ApprovalType,
    #[serde(default)]
    pub allow_only_on_success: bool,
    #[serde(default)]
    pub authorization: AuthorizationSpec,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationSpec {
    #[serde(default)]
    pub users: Vec<String>,
    #[serde(default)]
    pub roles: Vec<String>,
}
