//! Client layer: one AngularJS `$http` service per model, hitting the same endpoint as the API router.

use crate::case::NameForms;
use crate::generate::api::json_type_name;
use crate::generate::{ArtifactKind, Generator};
use crate::model::{FieldKind, Model};

pub struct ClientServiceGenerator {
    project: NameForms,
}

impl ClientServiceGenerator {
    pub fn new(project: &str) -> Self {
        ClientServiceGenerator {
            project: NameForms::new(project),
        }
    }
}

impl Generator for ClientServiceGenerator {
    fn kind(&self) -> ArtifactKind {
        ArtifactKind::Client
    }

    fn project(&self) -> &NameForms {
        &self.project
    }

    fn file_name(&self, model: &Model) -> String {
        format!("{}.service.js", model.names.kebab)
    }

    fn type_name(&self, kind: &FieldKind) -> &'static str {
        json_type_name(kind)
    }
}
