//! Load definition files from a directory and normalize them into a `ModelList`.

use crate::case::{to_pascal_case, NameForms};
use crate::error::ModelError;
use crate::model::resolved::{
    Cardinality, Field, FieldKind, Model, ModelList, Relationship, ReverseRelationship,
};
use crate::model::{parse_type_token, validate, LoadedDefinition, ModelDefinition};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Definitions read from a directory plus the files that failed to parse.
#[derive(Debug, Default)]
pub struct LoadedDefinitions {
    pub definitions: Vec<LoadedDefinition>,
    /// Every `*.json` file found, parsed or not, in file-name order.
    pub sources: Vec<PathBuf>,
    /// Parse errors tolerated while loading; the offending files were skipped.
    pub skipped: Vec<ModelError>,
}

/// Read every `*.json` file in `dir` in file-name order. Malformed files are skipped and
/// reported; fails with `NoModels` when none survive.
pub async fn load_definitions(dir: &Path) -> Result<LoadedDefinitions, ModelError> {
    let io_err = |source| ModelError::Io {
        path: dir.to_path_buf(),
        source,
    };
    let mut entries = tokio::fs::read_dir(dir).await.map_err(io_err)?;
    let mut paths = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(io_err)? {
        let path = entry.path();
        let is_json = path.extension().is_some_and(|e| e == "json");
        if is_json && entry.file_type().await.map_err(io_err)?.is_file() {
            paths.push(path);
        }
    }
    paths.sort();

    let mut out = LoadedDefinitions {
        sources: paths.clone(),
        ..LoadedDefinitions::default()
    };
    for path in paths {
        let text = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| ModelError::Io {
                path: path.clone(),
                source,
            })?;
        match serde_json::from_str::<ModelDefinition>(&text) {
            Ok(definition) => {
                tracing::debug!(path = %path.display(), model = %definition.name, "loaded definition");
                out.definitions.push(LoadedDefinition { path, definition });
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "skipping malformed definition");
                out.skipped.push(ModelError::Parse {
                    path,
                    message: e.to_string(),
                });
            }
        }
    }

    if out.definitions.is_empty() {
        return Err(ModelError::NoModels(dir.to_path_buf()));
    }
    Ok(out)
}

/// Build the canonical model list (call with definitions in enumeration order).
/// Validates first; the list preserves input order and is closed over its references.
pub fn normalize(definitions: &[LoadedDefinition]) -> Result<ModelList, ModelError> {
    validate(definitions)?;

    let mut models = Vec::with_capacity(definitions.len());
    for loaded in definitions {
        let def = &loaded.definition;
        let names = NameForms::new(&def.name);
        let mut fields = Vec::with_capacity(def.fields.len());
        let mut relationships = Vec::new();

        for (raw, decl) in &def.fields {
            let field_names = NameForms::new(raw);
            let token = parse_type_token(decl.token()).ok_or_else(|| ModelError::InvalidType {
                model: names.pascal.clone(),
                field: field_names.camel.clone(),
                token: decl.token().to_string(),
            })?;
            let cardinality = if token.collection {
                Cardinality::Collection
            } else {
                Cardinality::Scalar
            };
            let kind = match token.primitive() {
                Some(primitive) => FieldKind::Primitive { primitive },
                None => {
                    let target = to_pascal_case(token.name);
                    relationships.push(Relationship {
                        field: field_names.camel.clone(),
                        target: target.clone(),
                        cardinality,
                    });
                    FieldKind::Reference { target }
                }
            };
            fields.push(Field {
                name: field_names.camel.clone(),
                names: field_names,
                kind,
                cardinality,
                required: decl.required(),
                unique: decl.unique(),
            });
        }

        models.push(Model {
            name: names.pascal.clone(),
            names,
            source: loaded.file_name(),
            fields,
            relationships,
            referenced_by: Vec::new(),
        });
    }

    let incoming = reverse_relationships(&models);
    for model in &mut models {
        if let Some(refs) = incoming.get(&model.name) {
            model.referenced_by = refs.clone();
        }
    }
    Ok(ModelList::new(models))
}

/// Incoming references keyed by target model, in model-then-field order.
fn reverse_relationships(models: &[Model]) -> HashMap<String, Vec<ReverseRelationship>> {
    let mut incoming: HashMap<String, Vec<ReverseRelationship>> = HashMap::new();
    for model in models {
        for rel in &model.relationships {
            incoming
                .entry(rel.target.clone())
                .or_default()
                .push(ReverseRelationship {
                    model: model.name.clone(),
                    field: rel.field.clone(),
                    cardinality: rel.cardinality,
                });
        }
    }
    incoming
}

/// Loads a definition directory once and holds the finalized list for callers.
#[derive(Debug)]
pub struct ModelGenerator {
    dir: PathBuf,
    models: Option<ModelList>,
    sources: Vec<PathBuf>,
    skipped: Vec<ModelError>,
}

/// A finalized model list together with the files it was read from.
#[derive(Debug)]
pub struct PreparedModels {
    pub models: ModelList,
    pub sources: Vec<PathBuf>,
    pub skipped: Vec<ModelError>,
}

impl ModelGenerator {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        ModelGenerator {
            dir: dir.into(),
            models: None,
            sources: Vec::new(),
            skipped: Vec::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Read and normalize the directory. On error no list is published.
    pub async fn generate(&mut self) -> Result<&ModelList, ModelError> {
        self.models = None;
        self.sources.clear();
        self.skipped.clear();
        let loaded = load_definitions(&self.dir).await?;
        self.sources = loaded.sources;
        self.skipped = loaded.skipped;
        let models = normalize(&loaded.definitions)?;
        tracing::info!(count = models.len(), dir = %self.dir.display(), "models normalized");
        Ok(self.models.insert(models))
    }

    pub fn models(&self) -> Option<&ModelList> {
        self.models.as_ref()
    }

    pub fn skipped(&self) -> &[ModelError] {
        &self.skipped
    }

    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }

    /// `None` until `generate` has succeeded.
    pub fn into_prepared(self) -> Option<PreparedModels> {
        let ModelGenerator {
            models,
            sources,
            skipped,
            ..
        } = self;
        models.map(|models| PreparedModels {
            models,
            sources,
            skipped,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded(json: &str) -> LoadedDefinition {
        let definition: ModelDefinition = serde_json::from_str(json).unwrap();
        LoadedDefinition {
            path: PathBuf::from(format!("defs/{}.json", definition.name)),
            definition,
        }
    }

    fn library() -> Vec<LoadedDefinition> {
        vec![
            loaded(r#"{"name": "Author", "fields": {"name": "string"}}"#),
            loaded(r#"{"name": "Book", "fields": {"title": "string", "author": "ref:Author"}}"#),
        ]
    }

    #[test]
    fn resolves_references_and_reverse_relationships() {
        let models = normalize(&library()).unwrap();
        assert_eq!(models.names(), ["Author", "Book"]);

        let book = models.get("Book").unwrap();
        let author_field = book.field("author").unwrap();
        assert_eq!(author_field.kind, FieldKind::Reference { target: "Author".into() });
        assert_eq!(book.relationships.len(), 1);
        assert!(book.referenced_by.is_empty());

        let author = models.get("Author").unwrap();
        assert_eq!(
            author.referenced_by,
            vec![ReverseRelationship {
                model: "Book".into(),
                field: "author".into(),
                cardinality: Cardinality::Scalar,
            }]
        );
        assert_eq!(author.source, "Author.json");
    }

    #[test]
    fn canonicalizes_names_uniformly() {
        let defs = vec![
            loaded(r#"{"name": "book_category", "fields": {"display_name": "string"}}"#),
            loaded(r#"{"name": "book", "fields": {"category": "ref:book_category[]"}}"#),
        ];
        let models = normalize(&defs).unwrap();
        assert_eq!(models.names(), ["BookCategory", "Book"]);
        let cat = models.get("Book").unwrap().field("category").unwrap();
        assert_eq!(cat.kind.target(), Some("BookCategory"));
        assert_eq!(cat.cardinality, Cardinality::Collection);
        assert_eq!(models.get("BookCategory").unwrap().fields[0].name, "displayName");
    }

    #[test]
    fn self_reference_is_both_outgoing_and_incoming() {
        let defs = vec![loaded(r#"{"name": "Person", "fields": {"friends": "ref:Person[]"}}"#)];
        let models = normalize(&defs).unwrap();
        let person = models.get("Person").unwrap();
        assert_eq!(person.relationships.len(), 1);
        assert_eq!(person.referenced_by[0].model, "Person");
    }

    #[test]
    fn normalization_is_deterministic() {
        let first = serde_json::to_string(&normalize(&library()).unwrap()).unwrap();
        let second = serde_json::to_string(&normalize(&library()).unwrap()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn detailed_flags_carry_through() {
        let defs = vec![loaded(
            r#"{"name": "User", "fields": {"email": {"type": "string", "required": true, "unique": true}, "age": "int"}}"#,
        )];
        let models = normalize(&defs).unwrap();
        let user = models.get("User").unwrap();
        assert!(user.fields[0].required && user.fields[0].unique);
        assert!(!user.fields[1].required);
    }
}
