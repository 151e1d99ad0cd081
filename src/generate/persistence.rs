//! Persistence layer: one Mongoose schema module per model.

use crate::case::NameForms;
use crate::generate::{ArtifactKind, Generator};
use crate::model::{FieldKind, Model, Primitive};

pub struct PersistenceGenerator {
    project: NameForms,
}

impl PersistenceGenerator {
    pub fn new(project: &str) -> Self {
        PersistenceGenerator {
            project: NameForms::new(project),
        }
    }
}

impl Generator for PersistenceGenerator {
    fn kind(&self) -> ArtifactKind {
        ArtifactKind::Persistence
    }

    fn project(&self) -> &NameForms {
        &self.project
    }

    fn file_name(&self, model: &Model) -> String {
        format!("{}.js", model.names.kebab)
    }

    fn type_name(&self, kind: &FieldKind) -> &'static str {
        match kind {
            FieldKind::Primitive { primitive } => match primitive {
                Primitive::String => "String",
                Primitive::Number | Primitive::Integer => "Number",
                Primitive::Boolean => "Boolean",
                Primitive::Date => "Date",
                Primitive::Json => "Schema.Types.Mixed",
                Primitive::Binary => "Buffer",
                Primitive::Id => "Schema.Types.ObjectId",
            },
            FieldKind::Reference { .. } => "Schema.Types.ObjectId",
        }
    }
}
