//! Canonical model list: definitions validated, names canonicalized, references resolved.

use crate::case::NameForms;
use serde::{Serialize, Serializer};
use std::collections::HashMap;

/// Closed set of supported primitive kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Primitive {
    String,
    Number,
    Integer,
    Boolean,
    Date,
    Json,
    Binary,
    Id,
}

impl Primitive {
    /// Case-insensitive token lookup; `None` means the token names another entity.
    pub fn from_token(token: &str) -> Option<Self> {
        let p = match token.to_lowercase().as_str() {
            "string" | "text" => Primitive::String,
            "number" | "float" | "double" => Primitive::Number,
            "integer" | "int" => Primitive::Integer,
            "boolean" | "bool" => Primitive::Boolean,
            "date" | "datetime" => Primitive::Date,
            "json" | "object" | "mixed" => Primitive::Json,
            "binary" | "buffer" => Primitive::Binary,
            "id" | "objectid" => Primitive::Id,
            _ => return None,
        };
        Some(p)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Primitive::String => "string",
            Primitive::Number => "number",
            Primitive::Integer => "integer",
            Primitive::Boolean => "boolean",
            Primitive::Date => "date",
            Primitive::Json => "json",
            Primitive::Binary => "binary",
            Primitive::Id => "id",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum FieldKind {
    Primitive { primitive: Primitive },
    /// Target is the canonical (PascalCase) name of a model in the same list.
    Reference { target: String },
}

impl FieldKind {
    pub fn target(&self) -> Option<&str> {
        match self {
            FieldKind::Reference { target } => Some(target),
            FieldKind::Primitive { .. } => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Cardinality {
    Scalar,
    Collection,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub name: String,
    pub names: NameForms,
    pub kind: FieldKind,
    pub cardinality: Cardinality,
    pub required: bool,
    pub unique: bool,
}

/// Outgoing reference: our `field` points at `target`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    pub field: String,
    pub target: String,
    pub cardinality: Cardinality,
}

/// Incoming reference: `model.field` points at us.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReverseRelationship {
    pub model: String,
    pub field: String,
    pub cardinality: Cardinality,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    pub name: String,
    pub names: NameForms,
    /// Definition file base name.
    pub source: String,
    pub fields: Vec<Field>,
    pub relationships: Vec<Relationship>,
    pub referenced_by: Vec<ReverseRelationship>,
}

impl Model {
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Ordered, closed list of models. Read-only once built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModelList {
    models: Vec<Model>,
    by_name: HashMap<String, usize>,
}

/// Serializes as a plain array in list order.
impl Serialize for ModelList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.models.serialize(serializer)
    }
}

impl ModelList {
    pub(crate) fn new(models: Vec<Model>) -> Self {
        let by_name = models
            .iter()
            .enumerate()
            .map(|(i, m)| (m.name.clone(), i))
            .collect();
        ModelList { models, by_name }
    }

    pub fn get(&self, name: &str) -> Option<&Model> {
        self.by_name.get(name).map(|&i| &self.models[i])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Model> {
        self.models.iter()
    }

    pub fn as_slice(&self) -> &[Model] {
        &self.models
    }

    pub fn names(&self) -> Vec<&str> {
        self.models.iter().map(|m| m.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

impl<'a> IntoIterator for &'a ModelList {
    type Item = &'a Model;
    type IntoIter = std::slice::Iter<'a, Model>;

    fn into_iter(self) -> Self::IntoIter {
        self.models.iter()
    }
}
