//! Raw definition types matching the on-disk JSON (one file per entity).

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::PathBuf;

/// One entity definition as read from disk. Field order follows the JSON object.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelDefinition {
    pub name: String,
    #[serde(default)]
    pub fields: IndexMap<String, FieldDeclaration>,
}

/// A field is either a bare type token (`"string"`, `"ref:Author[]"`) or an object with flags.
#[derive(Clone, Debug, Serialize)]
pub enum FieldDeclaration {
    Token(String),
    Detailed {
        type_: String,
        required: bool,
        unique: bool,
    },
}

impl FieldDeclaration {
    pub fn token(&self) -> &str {
        match self {
            FieldDeclaration::Token(t) => t,
            FieldDeclaration::Detailed { type_, .. } => type_,
        }
    }

    pub fn required(&self) -> bool {
        matches!(self, FieldDeclaration::Detailed { required: true, .. })
    }

    pub fn unique(&self) -> bool {
        matches!(self, FieldDeclaration::Detailed { unique: true, .. })
    }
}

impl<'de> Deserialize<'de> for FieldDeclaration {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let v = serde_json::Value::deserialize(deserializer)?;
        match v {
            serde_json::Value::String(s) => Ok(FieldDeclaration::Token(s)),
            serde_json::Value::Object(mut obj) => {
                let type_ = match obj.remove("type") {
                    Some(serde_json::Value::String(s)) => s,
                    _ => {
                        return Err(serde::de::Error::custom(
                            "field object must have a string \"type\"",
                        ))
                    }
                };
                let required = flag(&mut obj, "required")?;
                let unique = flag(&mut obj, "unique")?;
                if let Some(key) = obj.keys().next() {
                    return Err(serde::de::Error::custom(format!(
                        "unknown field key \"{}\", expected one of \"type\", \"required\", \"unique\"",
                        key
                    )));
                }
                Ok(FieldDeclaration::Detailed {
                    type_,
                    required,
                    unique,
                })
            }
            other => Err(serde::de::Error::custom(format!(
                "field must be a type string or {{ \"type\": \"...\" }}; got {}",
                type_name_of_json(&other)
            ))),
        }
    }
}

fn flag<E: serde::de::Error>(
    obj: &mut serde_json::Map<String, serde_json::Value>,
    key: &str,
) -> Result<bool, E> {
    match obj.remove(key) {
        None | Some(serde_json::Value::Null) => Ok(false),
        Some(serde_json::Value::Bool(b)) => Ok(b),
        Some(other) => Err(E::custom(format!(
            "\"{}\" must be a boolean; got {}",
            key,
            type_name_of_json(&other)
        ))),
    }
}

fn type_name_of_json(v: &serde_json::Value) -> &'static str {
    match v {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// A definition plus the file it came from.
#[derive(Clone, Debug)]
pub struct LoadedDefinition {
    pub path: PathBuf,
    pub definition: ModelDefinition,
}

impl LoadedDefinition {
    /// File base name, recorded on the model for diagnostics.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}
