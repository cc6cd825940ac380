//! Pipeline config document as exchanged with the server

use serde::{Deserialize, Serialize};

use super::common::{EnvironmentVariable, HalLinks, Parameter};
use super::material::Material;
use super::stage::Stage;
use super::wire::{lenient_enum, null_as_default};

lenient_enum! {
    /// Pipeline locking mode
    pub enum LockBehavior (default = None) {
        LockOnFailure => "lockOnFailure",
        UnlockWhenFinished => "unlockWhenFinished",
        None => "none",
    }
}

lenient_enum! {
    /// Where the pipeline definition lives
    pub enum OriginType (default = GoCd) {
        GoCd => "gocd",
        ConfigRepo => "config_repo",
    }
}

/// External pipeline config
///
/// `null` and omitted fields both decode to `None` or an empty list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_template: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lock_behavior: Option<LockBehavior>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub template: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<Origin>,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub environment_variables: Vec<EnvironmentVariable>,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub materials: Vec<Material>,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub stages: Vec<Stage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_tool: Option<TrackingTool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timer: Option<Timer>,
    #[serde(rename = "_links", default, skip_serializing_if = "Option::is_none")]
    pub links: Option<HalLinks>,
}

/// Origin of a pipeline definition; links are presentation metadata only
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Origin {
    #[serde(rename = "type", default)]
    pub kind: OriginType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "_links", default, skip_serializing_if = "Option::is_none")]
    pub links: Option<HalLinks>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingTool {
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub kind: String,
    #[serde(default)]
    pub attributes: TrackingToolAttributes,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingToolAttributes {
    #[serde(default, deserialize_with = "null_as_default")]
    pub url_pattern: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub regex: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timer {
    #[serde(default, deserialize_with = "null_as_default")]
    pub spec: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub only_on_changes: bool,
}

/// Body of a create call: the group travels beside the pipeline, not in it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePipelineRequest {
    pub group: Option<String>,
    pub pipeline: PipelineConfig,
}

impl CreatePipelineRequest {
    pub fn new(mut pipeline: PipelineConfig) -> Self {
        let group = pipeline.group.take();
        Self { group, pipeline }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_server_document_with_nulls() {
        let json = r#"{
            "_links": {"self": {"href": "https://ci/go/api/admin/pipelines/app"}},
            "label_template": "${COUNT}",
            "lock_behavior": "none",
            "name": "app",
            "template": null,
            "group": "default",
            "origin": {"_links": {}, "type": "gocd"},
            "parameters": [],
            "environment_variables": null,
            "materials": [],
            "stages": null,
            "tracking_tool": null,
            "timer": null
        }"#;

        let config: PipelineConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.name.as_deref(), Some("app"));
        assert_eq!(config.lock_behavior, Some(LockBehavior::None));
        assert_eq!(config.template, None);
        assert!(config.environment_variables.is_empty());
        assert!(config.stages.is_empty());
        assert_eq!(config.origin.unwrap().kind, OriginType::GoCd);
        assert!(config.links.unwrap().self_link.is_some());
    }

    #[test]
    fn test_unknown_lock_behavior_is_none() {
        let config: PipelineConfig =
            serde_json::from_str(r#"{"lock_behavior": "sometimes"}"#).unwrap();
        assert_eq!(config.lock_behavior, Some(LockBehavior::None));
    }

    #[test]
    fn test_create_request_moves_group_out() {
        let pipeline = PipelineConfig {
            group: Some("default".into()),
            name: Some("app".into()),
            ..Default::default()
        };

        let request = CreatePipelineRequest::new(pipeline);
        let body = serde_json::to_value(&request).unwrap();

        assert_eq!(body["group"], "default");
        assert_eq!(body["pipeline"]["name"], "app");
        assert!(body["pipeline"].get("group").is_none());
    }
}
