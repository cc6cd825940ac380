//! Variant codec for tagged-union fields
//!
//! Tasks and materials travel as `{"type": <tag>, "attributes": {...}}`.
//! Decoding picks the attribute shape from the tag:
//!
//! - an unrecognised tag yields the kind's default variant with zero-valued
//!   attributes (exec for tasks, git for materials) and a warning
//! - `null` or missing attributes decode as an empty object
//! - a payload that does not fit a recognised tag is a [`CodecError`]
//!
//! A task's `on_cancel` lives inside its attributes object on the wire and
//! is lifted out into [`Task::on_cancel`]. Only one level is kept.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::dto::{
    CancelTask, Material, MaterialType, PipelineConfig, Task, TaskAttributes, TaskType,
};
use crate::error::CodecError;

const ON_CANCEL: &str = "on_cancel";

/// Tagged union as it appears on the wire
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RawVariant {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    attributes: Value,
}

impl RawVariant {
    fn new(kind: &str, attributes: Value) -> Self {
        Self {
            kind: Some(kind.to_string()),
            attributes,
        }
    }

    fn tag(&self) -> &str {
        self.kind.as_deref().unwrap_or_default()
    }

    /// Attributes as an object; `null` becomes empty
    fn take_attributes(&mut self) -> Value {
        match std::mem::take(&mut self.attributes) {
            Value::Null => Value::Object(Map::new()),
            other => other,
        }
    }
}

fn decode_payload<T: DeserializeOwned>(kind: &str, attributes: Value) -> Result<T, CodecError> {
    serde_json::from_value(attributes).map_err(|source| CodecError::MalformedAttributes {
        kind: kind.to_string(),
        source,
    })
}

fn encode_payload<T: Serialize>(kind: &str, attributes: &T) -> Result<Value, CodecError> {
    serde_json::to_value(attributes).map_err(|source| CodecError::Encode {
        kind: kind.to_string(),
        source,
    })
}

// ============================================================================
// Tasks
// ============================================================================

fn decode_task_attributes(raw: &mut RawVariant) -> Result<TaskAttributes, CodecError> {
    let Some(kind) = TaskType::parse(raw.tag()) else {
        tracing::warn!("Unknown task type '{}', decoding as exec", raw.tag());
        return Ok(TaskAttributes::default());
    };

    let attributes = raw.take_attributes();
    let tag = kind.as_str();
    Ok(match kind {
        TaskType::Exec => TaskAttributes::Exec(decode_payload(tag, attributes)?),
        TaskType::Ant => TaskAttributes::Ant(decode_payload(tag, attributes)?),
        TaskType::Nant => TaskAttributes::Nant(decode_payload(tag, attributes)?),
        TaskType::Rake => TaskAttributes::Rake(decode_payload(tag, attributes)?),
        TaskType::Fetch => TaskAttributes::Fetch(decode_payload(tag, attributes)?),
        TaskType::Pluggable => TaskAttributes::Pluggable(decode_payload(tag, attributes)?),
    })
}

fn encode_task_attributes(attributes: &TaskAttributes) -> Result<RawVariant, CodecError> {
    let tag = attributes.kind().as_str();
    let payload = match attributes {
        TaskAttributes::Exec(a) => encode_payload(tag, a)?,
        TaskAttributes::Ant(a) | TaskAttributes::Rake(a) => encode_payload(tag, a)?,
        TaskAttributes::Nant(a) => encode_payload(tag, a)?,
        TaskAttributes::Fetch(a) => encode_payload(tag, a)?,
        TaskAttributes::Pluggable(a) => encode_payload(tag, a)?,
    };
    Ok(RawVariant::new(tag, payload))
}

/// Remove `on_cancel` from an attributes object, if any
fn take_on_cancel(raw: &mut RawVariant) -> Result<Option<RawVariant>, CodecError> {
    let Value::Object(map) = &mut raw.attributes else {
        return Ok(None);
    };
    match map.remove(ON_CANCEL) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => serde_json::from_value(value)
            .map(Some)
            .map_err(|source| CodecError::MalformedAttributes {
                kind: ON_CANCEL.to_string(),
                source,
            }),
    }
}

fn decode_task_raw(mut raw: RawVariant) -> Result<Task, CodecError> {
    let on_cancel = match take_on_cancel(&mut raw)? {
        Some(mut cancel) => {
            if take_on_cancel(&mut cancel)?.is_some() {
                tracing::debug!("Dropping nested on_cancel below the first level");
            }
            Some(CancelTask {
                attributes: decode_task_attributes(&mut cancel)?,
            })
        }
        None => None,
    };

    Ok(Task {
        attributes: decode_task_attributes(&mut raw)?,
        on_cancel,
    })
}

/// Decode one task from its wire form
pub fn decode_task(value: Value) -> Result<Task, CodecError> {
    let raw = serde_json::from_value(value).map_err(|source| CodecError::MalformedAttributes {
        kind: "task".to_string(),
        source,
    })?;
    decode_task_raw(raw)
}

/// Encode one task, nesting `on_cancel` inside the attributes object
pub fn encode_task(task: &Task) -> Result<Value, CodecError> {
    let mut raw = encode_task_attributes(&task.attributes)?;

    if let Some(cancel) = &task.on_cancel {
        let cancel = encode_task_attributes(&cancel.attributes)?;
        let cancel = encode_payload(ON_CANCEL, &cancel)?;
        if let Value::Object(map) = &mut raw.attributes {
            map.insert(ON_CANCEL.to_string(), cancel);
        }
    }

    encode_payload("task", &raw)
}

impl Serialize for Task {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        encode_task(self)
            .map_err(serde::ser::Error::custom)?
            .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Task {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawVariant::deserialize(deserializer)?;
        decode_task_raw(raw).map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// Materials
// ============================================================================

fn decode_material_raw(mut raw: RawVariant) -> Result<Material, CodecError> {
    let Some(kind) = MaterialType::parse(raw.tag()) else {
        tracing::warn!("Unknown material type '{}', decoding as git", raw.tag());
        return Ok(Material::default());
    };

    let attributes = raw.take_attributes();
    let tag = kind.as_str();
    Ok(match kind {
        MaterialType::Git => Material::Git(decode_payload(tag, attributes)?),
        MaterialType::Svn => Material::Svn(decode_payload(tag, attributes)?),
        MaterialType::Hg => Material::Hg(decode_payload(tag, attributes)?),
        MaterialType::P4 => Material::P4(decode_payload(tag, attributes)?),
        MaterialType::Tfs => Material::Tfs(decode_payload(tag, attributes)?),
        MaterialType::Dependency => Material::Dependency(decode_payload(tag, attributes)?),
        MaterialType::Package => Material::Package(decode_payload(tag, attributes)?),
        MaterialType::Plugin => Material::Plugin(decode_payload(tag, attributes)?),
    })
}

/// Decode one material from its wire form
pub fn decode_material(value: Value) -> Result<Material, CodecError> {
    let raw = serde_json::from_value(value).map_err(|source| CodecError::MalformedAttributes {
        kind: "material".to_string(),
        source,
    })?;
    decode_material_raw(raw)
}

/// Encode one material with its type tag
pub fn encode_material(material: &Material) -> Result<Value, CodecError> {
    let tag = material.kind().as_str();
    let payload = match material {
        Material::Git(a) => encode_payload(tag, a)?,
        Material::Svn(a) => encode_payload(tag, a)?,
        Material::Hg(a) => encode_payload(tag, a)?,
        Material::P4(a) => encode_payload(tag, a)?,
        Material::Tfs(a) => encode_payload(tag, a)?,
        Material::Dependency(a) => encode_payload(tag, a)?,
        Material::Package(a) => encode_payload(tag, a)?,
        Material::Plugin(a) => encode_payload(tag, a)?,
    };
    encode_payload("material", &RawVariant::new(tag, payload))
}

impl Serialize for Material {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        encode_material(self)
            .map_err(serde::ser::Error::custom)?
            .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Material {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawVariant::deserialize(deserializer)?;
        decode_material_raw(raw).map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// Documents
// ============================================================================

/// Decode a full pipeline config as returned by the server
pub fn decode_pipeline(bytes: &[u8]) -> Result<PipelineConfig, CodecError> {
    serde_json::from_slice(bytes).map_err(CodecError::MalformedDocument)
}

/// Encode a pipeline config for submission
pub fn encode_pipeline<T: Serialize>(document: &T) -> Result<Vec<u8>, CodecError> {
    serde_json::to_vec(document).map_err(|source| CodecError::Encode {
        kind: "pipeline".to_string(),
        source,
    })
}
