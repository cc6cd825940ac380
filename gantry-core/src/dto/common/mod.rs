//! Wire types shared across the pipeline config document

use serde::{Deserialize, Serialize};

use super::wire::null_as_default;

/// Scalar that the server accepts as either a number or a string
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IntOrString {
    Int(i64),
    Str(String),
}

impl IntOrString {
    pub fn string(value: impl Into<String>) -> Self {
        Self::Str(value.into())
    }
}

impl std::fmt::Display for IntOrString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Str(v) => f.write_str(v),
        }
    }
}

/// Environment variable as held by the server
///
/// Secure variables come back with `encrypted_value` and no `value`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentVariable {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encrypted_value: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub secure: bool,
}

impl EnvironmentVariable {
    pub fn plain(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
            encrypted_value: None,
            secure: false,
        }
    }

    pub fn secure(name: impl Into<String>, value: Option<String>) -> Self {
        Self {
            name: name.into(),
            value,
            encrypted_value: None,
            secure: true,
        }
    }
}

/// Pipeline parameter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub value: String,
}

/// Plugin or artifact-store configuration entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigProperty {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encrypted_value: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub secure: bool,
}

impl ConfigProperty {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: Some(value.into()),
            ..Default::default()
        }
    }
}

/// HAL `_links` block attached to server responses
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HalLinks {
    #[serde(rename = "self", default, skip_serializing_if = "Option::is_none")]
    pub self_link: Option<HalLink>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<HalLink>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub find: Option<HalLink>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HalLink {
    pub href: String,
}
