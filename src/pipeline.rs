//! Run stages in order: normalize, fan out the three generators, scaffold, persist config.
//! Normalization is a barrier: nothing is written unless the model list is closed.

use crate::case::NameForms;
use crate::error::{AppError, GenerateError, ModelError};
use crate::generate::{
    ApiGenerator, ClientServiceGenerator, GenerationReport, Generator, ModelFailure,
    PersistenceGenerator,
};
use crate::model::{ModelGenerator, ModelList, PreparedModels};
use crate::settings::{Settings, IMPORT_SCRIPT_NAME};
use crate::store::{copy_definitions, write_file, write_resolved_config, ResolvedConfig};
use crate::template::render;
use chrono::Utc;
use serde::Serialize;
use std::path::PathBuf;

/// Outcome of a completed run. Per-model failures do not make the run an error.
#[derive(Debug)]
pub struct RunSummary {
    pub models: ModelList,
    pub reports: Vec<GenerationReport>,
    /// Parse errors tolerated while loading.
    pub skipped: Vec<ModelError>,
    pub config_path: PathBuf,
}

impl RunSummary {
    pub fn is_success(&self) -> bool {
        self.reports.iter().all(GenerationReport::is_success)
    }

    pub fn failures(&self) -> impl Iterator<Item = (&GenerationReport, &ModelFailure)> {
        self.reports
            .iter()
            .flat_map(|r| r.failures.iter().map(move |f| (r, f)))
    }
}

#[derive(Serialize)]
struct ImportContext<'a> {
    project: NameForms,
    models: Vec<&'a NameForms>,
}

pub struct Pipeline {
    settings: Settings,
}

impl Pipeline {
    pub fn new(settings: Settings) -> Self {
        Pipeline { settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Normalize definitions only. Errors here abort the run before any output.
    pub async fn prepare(&self) -> Result<PreparedModels, AppError> {
        tracing::info!(dir = %self.settings.models_dir.display(), "preparing models");
        let mut generator = ModelGenerator::new(self.settings.models_dir.clone());
        generator.generate().await?;
        let prepared = generator
            .into_prepared()
            .ok_or_else(|| ModelError::NoModels(self.settings.models_dir.clone()))?;
        tracing::info!(
            count = prepared.models.len(),
            skipped = prepared.skipped.len(),
            "models prepared"
        );
        Ok(prepared)
    }

    pub async fn run(&self) -> Result<RunSummary, AppError> {
        let PreparedModels {
            models,
            sources,
            skipped,
        } = self.prepare().await?;
        let reports = self.generate(&models).await?;
        self.scaffold(&sources, &models).await?;

        let project = self.settings.project_name();
        let config_path = self.settings.config_path();
        let config = ResolvedConfig {
            project: &project,
            generated_at: Utc::now(),
            models: &models,
            artifacts: &reports,
            skipped: skipped.iter().map(ToString::to_string).collect(),
        };
        write_resolved_config(&config_path, &config).await?;

        Ok(RunSummary {
            models,
            reports,
            skipped,
            config_path,
        })
    }

    /// Run the three generators concurrently over the same finalized list. Every generator
    /// finishes before a setup failure in any of them is reported.
    pub async fn generate(&self, models: &ModelList) -> Result<Vec<GenerationReport>, AppError> {
        let project = self.settings.project_name();
        let persistence = PersistenceGenerator::new(&project);
        let api = ApiGenerator::new(&project);
        let client = ClientServiceGenerator::new(&project);
        let templates = &self.settings.templates;

        let persistence_dir = self.settings.output_dir(persistence.kind());
        let api_dir = self.settings.output_dir(api.kind());
        let client_dir = self.settings.output_dir(client.kind());
        let (p, a, c) = tokio::join!(
            persistence.init(models, templates, &persistence_dir),
            api.init(models, templates, &api_dir),
            client.init(models, templates, &client_dir),
        );

        let mut reports = Vec::with_capacity(3);
        let mut first_err: Option<GenerateError> = None;
        for result in [p, a, c] {
            match result {
                Ok(report) => reports.push(report),
                Err(e) => {
                    tracing::error!(error = %e, "generator failed");
                    first_err.get_or_insert(e);
                }
            }
        }
        match first_err {
            Some(e) => Err(e.into()),
            None => Ok(reports),
        }
    }

    /// Copy every definition file, skipped ones included, into the DDL directory and
    /// write the import support script.
    pub async fn scaffold(&self, sources: &[PathBuf], models: &ModelList) -> Result<(), AppError> {
        tracing::info!(dir = %self.settings.ddl_dir().display(), "initializing ddl");
        copy_definitions(sources, &self.settings.ddl_dir()).await?;

        let template = self.settings.templates.load("import").await?;
        let context = ImportContext {
            project: NameForms::new(&self.settings.project_name()),
            models: models.iter().map(|m| &m.names).collect(),
        };
        let text = render(&template, &serde_json::to_value(&context)?).map_err(GenerateError::from)?;
        write_file(&self.settings.project_dir.join(IMPORT_SCRIPT_NAME), &text).await
    }
}
