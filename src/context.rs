//! Per-model, per-artifact data handed to the renderer. Derived on demand, never stored.

use crate::case::{to_pascal_case, NameForms};
use crate::generate::{ArtifactKind, Generator};
use crate::model::{Cardinality, Field, FieldKind, Model, ModelList};
use serde::Serialize;

/// HTTP path for a model's collection; the API routes and client services both use this.
pub fn endpoint(model: &Model) -> String {
    format!("/api/{}", model.names.plural)
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldContext {
    pub name: String,
    pub names: NameForms,
    pub kind: &'static str,
    pub type_name: &'static str,
    pub required: bool,
    pub unique: bool,
    pub collection: bool,
    pub is_reference: bool,
    pub target: Option<NameForms>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipContext {
    pub field: String,
    pub target: NameForms,
    pub collection: bool,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReverseContext {
    pub model: NameForms,
    pub field: String,
    pub collection: bool,
    /// camelCase accessor name, e.g. `books`, or `booksByEditor` when one model refers to us
    /// twice or when `books` is already one of our fields.
    pub accessor: String,
    /// kebab-case form of `accessor` for sub-resource paths.
    pub path: String,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationContext {
    pub artifact: ArtifactKind,
    pub project: NameForms,
    pub name: String,
    pub names: NameForms,
    pub fields: Vec<FieldContext>,
    pub relationships: Vec<RelationshipContext>,
    pub referenced_by: Vec<ReverseContext>,
    pub has_relationships: bool,
    pub has_references: bool,
    pub endpoint: String,
    pub file_name: String,
}

impl GenerationContext {
    /// `models` is only consulted for relationship targets.
    pub fn new<G: Generator + ?Sized>(generator: &G, model: &Model, models: &ModelList) -> Self {
        let target_names = |target: &str| {
            models
                .get(target)
                .map(|m| m.names.clone())
                .unwrap_or_else(|| NameForms::new(target))
        };

        let fields = model
            .fields
            .iter()
            .map(|f| field_context(generator, f, &target_names))
            .collect();

        let relationships = model
            .relationships
            .iter()
            .map(|r| RelationshipContext {
                field: r.field.clone(),
                target: target_names(&r.target),
                collection: r.cardinality == Cardinality::Collection,
            })
            .collect();

        let referenced_by = model
            .referenced_by
            .iter()
            .map(|r| {
                let source = target_names(&r.model);
                let shared = model
                    .referenced_by
                    .iter()
                    .filter(|other| other.model == r.model)
                    .count()
                    > 1;
                // The bare plural must not shadow one of our own fields.
                let taken = model.field(&source.plural_camel).is_some();
                let accessor = if shared || taken {
                    format!("{}By{}", source.plural_camel, to_pascal_case(&r.field))
                } else {
                    source.plural_camel.clone()
                };
                ReverseContext {
                    path: crate::case::to_kebab_case(&accessor),
                    accessor,
                    model: source,
                    field: r.field.clone(),
                    collection: r.cardinality == Cardinality::Collection,
                }
            })
            .collect();

        GenerationContext {
            artifact: generator.kind(),
            project: generator.project().clone(),
            name: model.name.clone(),
            names: model.names.clone(),
            fields,
            relationships,
            referenced_by,
            has_relationships: !model.relationships.is_empty(),
            has_references: !model.referenced_by.is_empty(),
            endpoint: endpoint(model),
            file_name: generator.file_name(model),
        }
    }
}

fn field_context<G: Generator + ?Sized>(
    generator: &G,
    field: &Field,
    target_names: &impl Fn(&str) -> NameForms,
) -> FieldContext {
    let (kind, target) = match &field.kind {
        FieldKind::Primitive { primitive } => (primitive.as_str(), None),
        FieldKind::Reference { target } => ("reference", Some(target_names(target))),
    };
    FieldContext {
        name: field.name.clone(),
        names: field.names.clone(),
        kind,
        type_name: generator.type_name(&field.kind),
        required: field.required,
        unique: field.unique,
        collection: field.cardinality == Cardinality::Collection,
        is_reference: target.is_some(),
        target,
    }
}
