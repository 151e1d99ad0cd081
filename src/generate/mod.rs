//! Artifact generators: one rendered file per model per artifact kind.
//!
//! All three generators share the render-and-write loop in [`Generator::init`]; they differ
//! only in file naming and field type mapping. Each reads the model list and nothing else,
//! so they can run in any order or concurrently against the same `&ModelList`.

mod api;
mod client;
mod persistence;

pub use api::ApiGenerator;
pub use client::ClientServiceGenerator;
pub use persistence::PersistenceGenerator;

use crate::case::NameForms;
use crate::context::GenerationContext;
use crate::error::GenerateError;
use crate::model::{FieldKind, Model, ModelList};
use crate::template::{render, TemplateSource};
use async_trait::async_trait;
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ArtifactKind {
    Persistence,
    Api,
    Client,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 3] = [ArtifactKind::Persistence, ArtifactKind::Api, ArtifactKind::Client];

    /// Also the template name.
    pub fn as_str(self) -> &'static str {
        match self {
            ArtifactKind::Persistence => "persistence",
            ArtifactKind::Api => "api",
            ArtifactKind::Client => "client",
        }
    }
}

impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FailureKind {
    Render,
    Write,
}

/// One model whose file could not be produced. The rest of the run continues.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelFailure {
    pub model: String,
    pub kind: FailureKind,
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelOutput {
    pub model: String,
    pub path: PathBuf,
}

/// Per-model outcome of one generator.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationReport {
    pub artifact: ArtifactKind,
    pub output_dir: PathBuf,
    pub written: Vec<ModelOutput>,
    pub failures: Vec<ModelFailure>,
}

impl GenerationReport {
    pub fn new(artifact: ArtifactKind, output_dir: &Path) -> Self {
        GenerationReport {
            artifact,
            output_dir: output_dir.to_path_buf(),
            written: Vec::new(),
            failures: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn models_written(&self) -> Vec<&str> {
        self.written.iter().map(|w| w.model.as_str()).collect()
    }
}

#[async_trait]
pub trait Generator: Send + Sync {
    fn kind(&self) -> ArtifactKind;

    fn project(&self) -> &NameForms;

    /// Output file name, derived only from the model's canonical name.
    fn file_name(&self, model: &Model) -> String;

    /// Target-framework type for a field kind.
    fn type_name(&self, kind: &FieldKind) -> &'static str;

    /// Render one file per model into `out_dir`, overwriting existing files.
    /// Template and directory problems fail the whole generator; render and write
    /// problems are recorded per model and the remaining models still run.
    async fn init(
        &self,
        models: &ModelList,
        templates: &TemplateSource,
        out_dir: &Path,
    ) -> Result<GenerationReport, GenerateError> {
        let kind = self.kind();
        let template = templates.load(kind.as_str()).await?;
        tokio::fs::create_dir_all(out_dir)
            .await
            .map_err(|source| GenerateError::OutputDir {
                path: out_dir.to_path_buf(),
                source,
            })?;
        tracing::info!(artifact = %kind, dir = %out_dir.display(), "generating");

        let mut report = GenerationReport::new(kind, out_dir);
        for model in models {
            let path = out_dir.join(self.file_name(model));
            let context = GenerationContext::new(self, model, models);
            let rendered = serde_json::to_value(&context)
                .map_err(|e| e.to_string())
                .and_then(|ctx| render(&template, &ctx).map_err(|e| e.to_string()));
            let text = match rendered {
                Ok(text) => text,
                Err(message) => {
                    tracing::warn!(artifact = %kind, model = %model.name, error = %message, "render failed");
                    report.failures.push(ModelFailure {
                        model: model.name.clone(),
                        kind: FailureKind::Render,
                        message,
                    });
                    continue;
                }
            };
            if let Err(e) = tokio::fs::write(&path, text).await {
                tracing::warn!(artifact = %kind, model = %model.name, path = %path.display(), error = %e, "write failed");
                report.failures.push(ModelFailure {
                    model: model.name.clone(),
                    kind: FailureKind::Write,
                    message: format!("{}: {}", path.display(), e),
                });
                continue;
            }
            tracing::debug!(artifact = %kind, model = %model.name, path = %path.display(), "wrote");
            report.written.push(ModelOutput {
                model: model.name.clone(),
                path,
            });
        }

        tracing::info!(
            artifact = %kind,
            written = report.written.len(),
            failed = report.failures.len(),
            "generated"
        );
        Ok(report)
    }
}
