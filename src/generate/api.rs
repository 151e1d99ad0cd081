//! API layer: one Express router per model, mounted at the model's endpoint.

use crate::case::NameForms;
use crate::generate::{ArtifactKind, Generator};
use crate::model::{FieldKind, Model};

pub struct ApiGenerator {
    project: NameForms,
}

impl ApiGenerator {
    pub fn new(project: &str) -> Self {
        ApiGenerator {
            project: NameForms::new(project),
        }
    }
}

impl Generator for ApiGenerator {
    fn kind(&self) -> ArtifactKind {
        ArtifactKind::Api
    }

    fn project(&self) -> &NameForms {
        &self.project
    }

    fn file_name(&self, model: &Model) -> String {
        format!("{}.js", model.names.kebab)
    }

    fn type_name(&self, kind: &FieldKind) -> &'static str {
        json_type_name(kind)
    }
}

/// JSON wire type; references travel as id strings. Shared with the client services.
pub(crate) fn json_type_name(kind: &FieldKind) -> &'static str {
    use crate::model::Primitive;
    match kind {
        FieldKind::Primitive { primitive } => match primitive {
            Primitive::String | Primitive::Date | Primitive::Binary | Primitive::Id => "string",
            Primitive::Number => "number",
            Primitive::Integer => "integer",
            Primitive::Boolean => "boolean",
            Primitive::Json => "object",
        },
        FieldKind::Reference { .. } => "string",
    }
}
