//! Environment variables, parameters and value references

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Environment variable in the desired document
///
/// Carries either a literal `value` or a `valueFrom` reference, never both.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentVariableSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_from: Option<ValueSource>,
}

impl EnvironmentVariableSpec {
    pub fn literal(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
            value_from: None,
        }
    }

    pub fn from_secret(name: impl Into<String>, selector: KeySelector) -> Self {
        Self {
            name: name.into(),
            value: None,
            value_from: Some(ValueSource::secret(selector)),
        }
    }

    pub fn from_config_map(name: impl Into<String>, selector: KeySelector) -> Self {
        Self {
            name: name.into(),
            value: None,
            value_from: Some(ValueSource::config_map(selector)),
        }
    }

    /// Literal value, treating the empty string as unset
    pub fn literal_value(&self) -> Option<&str> {
        self.value.as_deref().filter(|v| !v.is_empty())
    }

    /// Whether the resolved value must be submitted as a secure variable
    pub fn is_secret(&self) -> bool {
        self.literal_value().is_none()
            && self
                .value_from
                .as_ref()
                .is_some_and(|source| source.secret_key_ref.is_some())
    }

    pub fn validate(&self, path: &str) -> Result<(), ValidationError> {
        let path = format!("{path}.{}", self.name);
        super::require_name(&path, &self.name)?;

        match (self.literal_value(), &self.value_from) {
            (Some(_), Some(_)) => Err(ValidationError::AmbiguousValue { path }),
            (None, Some(source)) => source.validate(&path),
            _ => Ok(()),
        }
    }
}

/// Reference to a value held outside the desired document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueSource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_map_key_ref: Option<KeySelector>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_key_ref: Option<KeySelector>,
}

impl ValueSource {
    pub fn secret(selector: KeySelector) -> Self {
        Self {
            config_map_key_ref: None,
            secret_key_ref: Some(selector),
        }
    }

    pub fn config_map(selector: KeySelector) -> Self {
        Self {
            config_map_key_ref: Some(selector),
            secret_key_ref: None,
        }
    }

    pub fn validate(&self, path: &str) -> Result<(), ValidationError> {
        match (&self.config_map_key_ref, &self.secret_key_ref) {
            (Some(_), None) | (None, Some(_)) => Ok(()),
            _ => Err(ValidationError::AmbiguousSource {
                path: path.to_string(),
            }),
        }
    }
}

/// Points at one key of a named object
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeySelector {
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    pub key: String,
}

impl KeySelector {
    pub fn new(
        namespace: impl Into<String>,
        name: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            key: key.into(),
        }
    }
}

impl std::fmt::Display for KeySelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.namespace.is_empty() {
            write!(f, "{}[{}]", self.name, self.key)
        } else {
            write!(f, "{}/{}[{}]", self.namespace, self.name, self.key)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSpec {
    pub name: String,
    #[serde(default)]
    pub value: String,
}

/// Plain key/value configuration entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValue {
    pub key: String,
    #[serde(default)]
    pub value: String,
}
