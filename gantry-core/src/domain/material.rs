//! Desired material definitions
//!
//! String fields follow the desired-document convention: an empty string
//! means "not set" and maps to an absent field on the server.

use serde::{Deserialize, Serialize};

use crate::dto::MaterialType;
use crate::error::ValidationError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialSpec {
    #[serde(rename = "type", default)]
    pub kind: MaterialType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git_attributes: Option<GitMaterialSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub svn_attributes: Option<SvnMaterialSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hg_attributes: Option<HgMaterialSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p4_attributes: Option<P4MaterialSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tfs_attributes: Option<TfsMaterialSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependency_attributes: Option<DependencyMaterialSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_attributes: Option<PackageMaterialSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugin_attributes: Option<PluginMaterialSpec>,
}

impl MaterialSpec {
    pub fn git(attributes: GitMaterialSpec) -> Self {
        Self {
            kind: MaterialType::Git,
            git_attributes: Some(attributes),
            ..Default::default()
        }
    }

    pub fn dependency(attributes: DependencyMaterialSpec) -> Self {
        Self {
            kind: MaterialType::Dependency,
            dependency_attributes: Some(attributes),
            ..Default::default()
        }
    }

    pub fn validate(&self, path: &str) -> Result<(), ValidationError> {
        super::check_variant(
            path,
            self.kind,
            &[
                (MaterialType::Git, "gitAttributes", self.git_attributes.is_some()),
                (MaterialType::Svn, "svnAttributes", self.svn_attributes.is_some()),
                (MaterialType::Hg, "hgAttributes", self.hg_attributes.is_some()),
                (MaterialType::P4, "p4Attributes", self.p4_attributes.is_some()),
                (MaterialType::Tfs, "tfsAttributes", self.tfs_attributes.is_some()),
                (
                    MaterialType::Dependency,
                    "dependencyAttributes",
                    self.dependency_attributes.is_some(),
                ),
                (
                    MaterialType::Package,
                    "packageAttributes",
                    self.package_attributes.is_some(),
                ),
                (
                    MaterialType::Plugin,
                    "pluginAttributes",
                    self.plugin_attributes.is_some(),
                ),
            ],
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    #[serde(default)]
    pub ignore: Vec<String>,
    #[serde(default)]
    pub includes: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GitMaterialSpec {
    pub name: String,
    pub url: String,
    pub branch: String,
    pub username: String,
    pub password: String,
    pub destination: String,
    pub auto_update: bool,
    pub filter: FilterSpec,
    pub invert_filter: bool,
    pub submodule_folder: String,
    pub shallow_clone: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SvnMaterialSpec {
    pub name: String,
    pub url: String,
    pub username: String,
    pub password: String,
    pub encrypted_password: String,
    pub destination: String,
    pub filter: FilterSpec,
    pub invert_filter: bool,
    pub auto_update: bool,
    pub check_externals: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HgMaterialSpec {
    pub name: String,
    pub url: String,
    pub branch: String,
    pub username: String,
    pub password: String,
    pub encrypted_password: String,
    pub destination: String,
    pub filter: FilterSpec,
    pub invert_filter: bool,
    pub auto_update: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct P4MaterialSpec {
    pub name: String,
    pub port: String,
    pub use_tickets: bool,
    pub view: String,
    pub username: String,
    pub password: String,
    pub encrypted_password: String,
    pub destination: String,
    pub filter: FilterSpec,
    pub invert_filter: bool,
    pub auto_update: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TfsMaterialSpec {
    pub name: String,
    pub url: String,
    pub project_path: String,
    pub domain: String,
    pub username: String,
    pub password: String,
    pub encrypted_password: String,
    pub destination: String,
    pub auto_update: bool,
    pub filter: FilterSpec,
    pub invert_filter: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DependencyMaterialSpec {
    pub name: String,
    pub pipeline: String,
    pub stage: String,
    pub auto_update: bool,
    pub ignore_for_scheduling: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageMaterialSpec {
    #[serde(rename = "ref", default)]
    pub reference: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PluginMaterialSpec {
    #[serde(rename = "ref")]
    pub reference: String,
    pub destination: String,
    pub filter: FilterSpec,
    pub invert_filter: bool,
}
