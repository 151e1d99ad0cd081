//! Typed errors for normalization, rendering, generation and the pipeline.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("parse error in {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },
    #[error("unresolved reference: model '{model}' field '{field}' refers to unknown entity '{target}'")]
    UnresolvedReference {
        model: String,
        field: String,
        target: String,
    },
    #[error("duplicate model '{name}'")]
    DuplicateModel { name: String },
    #[error("models '{other}' and '{model}' share the plural '{plural}'")]
    PluralCollision {
        model: String,
        other: String,
        plural: String,
    },
    #[error("duplicate field: model '{model}' field '{field}'")]
    DuplicateField { model: String, field: String },
    #[error("invalid {kind} name '{name}'")]
    InvalidName { kind: &'static str, name: String },
    #[error("invalid type token '{token}': model '{model}' field '{field}'")]
    InvalidType {
        model: String,
        field: String,
        token: String,
    },
    #[error("read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("no valid model definitions in {}", .0.display())]
    NoModels(PathBuf),
}

impl ModelError {
    /// Offending (model, field) pair, when the error is tied to one.
    pub fn location(&self) -> Option<(&str, Option<&str>)> {
        match self {
            ModelError::UnresolvedReference { model, field, .. }
            | ModelError::DuplicateField { model, field }
            | ModelError::InvalidType { model, field, .. } => {
                Some((model.as_str(), Some(field.as_str())))
            }
            ModelError::DuplicateModel { name } => Some((name.as_str(), None)),
            ModelError::PluralCollision { model, .. } => Some((model.as_str(), None)),
            _ => None,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("template {template} line {line}: {message}")]
    Syntax {
        template: String,
        line: usize,
        message: String,
    },
    #[error("template {template}: context is missing '{path}'")]
    MissingField { template: String, path: String },
    #[error("template {template}: '{path}' is not a scalar value")]
    NotScalar { template: String, path: String },
    #[error("template {template}: '{path}' is not a list")]
    NotIterable { template: String, path: String },
}

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("template {name}: {message}")]
    Template { name: String, message: String },
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("output directory {}: {source}", path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error(transparent)]
    Generate(#[from] GenerateError),
    #[error("write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("serialize: {0}")]
    Serialize(#[from] serde_json::Error),
}
