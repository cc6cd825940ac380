//! Material wire types
//!
//! Same tagged-union layout as tasks; see [`crate::codec`] for the
//! encode/decode rules.

use serde::{Deserialize, Serialize};

use super::wire::{lenient_enum, null_as_default};

lenient_enum! {
    pub enum MaterialType (default = Git) {
        Git => "git",
        Svn => "svn",
        Hg => "hg",
        P4 => "p4",
        Tfs => "tfs",
        Dependency => "dependency",
        Package => "package",
        Plugin => "plugin",
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Material {
    Git(GitAttributes),
    Svn(SvnAttributes),
    Hg(HgAttributes),
    P4(P4Attributes),
    Tfs(TfsAttributes),
    Dependency(DependencyAttributes),
    Package(PackageAttributes),
    Plugin(PluginAttributes),
}

impl Default for Material {
    fn default() -> Self {
        Self::Git(GitAttributes::default())
    }
}

impl Material {
    pub fn kind(&self) -> MaterialType {
        match self {
            Self::Git(_) => MaterialType::Git,
            Self::Svn(_) => MaterialType::Svn,
            Self::Hg(_) => MaterialType::Hg,
            Self::P4(_) => MaterialType::P4,
            Self::Tfs(_) => MaterialType::Tfs,
            Self::Dependency(_) => MaterialType::Dependency,
            Self::Package(_) => MaterialType::Package,
            Self::Plugin(_) => MaterialType::Plugin,
        }
    }

    /// Identity key used to pair materials across two documents
    pub fn identity(&self) -> String {
        fn s(v: &Option<String>) -> &str {
            v.as_deref().unwrap_or_default()
        }

        let id = match self {
            Self::Git(a) => format!("{}#{}", s(&a.url), s(&a.branch)),
            Self::Svn(a) => s(&a.url).to_string(),
            Self::Hg(a) => format!("{}#{}", s(&a.url), s(&a.branch)),
            Self::P4(a) => s(&a.port).to_string(),
            Self::Tfs(a) => format!("{}#{}", s(&a.url), s(&a.project_path)),
            Self::Dependency(a) => format!("{}/{}", s(&a.pipeline), s(&a.stage)),
            Self::Package(a) => s(&a.reference).to_string(),
            Self::Plugin(a) => s(&a.reference).to_string(),
        };
        format!("{}:{}", self.kind(), id)
    }

    pub fn filter(&self) -> Option<&Filter> {
        match self {
            Self::Git(a) => a.filter.as_ref(),
            Self::Svn(a) => a.filter.as_ref(),
            Self::Hg(a) => a.filter.as_ref(),
            Self::P4(a) => a.filter.as_ref(),
            Self::Tfs(a) => a.filter.as_ref(),
            Self::Plugin(a) => a.filter.as_ref(),
            Self::Dependency(_) | Self::Package(_) => None,
        }
    }
}

/// Paths that do (or, when inverted, do not) trigger the pipeline
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    #[serde(default, deserialize_with = "null_as_default")]
    pub ignore: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub includes: Vec<String>,
}

impl Filter {
    pub fn is_empty(&self) -> bool {
        self.ignore.is_empty() && self.includes.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encrypted_password: Option<String>,
    #[serde(default)]
    pub branch: Option<String>,
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub auto_update: bool,
    #[serde(default)]
    pub filter: Option<Filter>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub invert_filter: bool,
    #[serde(default)]
    pub submodule_folder: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub shallow_clone: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SvnAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encrypted_password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<Filter>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub invert_filter: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub auto_update: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub check_externals: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HgAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encrypted_password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<Filter>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub invert_filter: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub auto_update: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct P4Attributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub use_tickets: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encrypted_password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<Filter>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub invert_filter: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub auto_update: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TfsAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encrypted_password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub auto_update: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<Filter>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub invert_filter: bool,
}

/// Upstream pipeline stage this pipeline depends on
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pipeline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub auto_update: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ignore_for_scheduling: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageAttributes {
    #[serde(rename = "ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginAttributes {
    #[serde(rename = "ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<Filter>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub invert_filter: bool,
}
