//! artista CLI: generate a project skeleton from a directory of JSON entity definitions.
//!
//! Settings come from the environment (a `.env` file is honored) and are overridden by flags:
//! `ARTISTA_PROJECT_DIR`, `ARTISTA_MODELS_DIR`, `ARTISTA_TEMPLATES_DIR`.

use artista::{ModelGenerator, Pipeline, Settings, TemplateSource};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "artista", version, about = "Generate persistence, API and client layers from JSON entity definitions")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Normalize definitions and generate every artifact into the project directory.
    Generate {
        /// Project directory (outputs and artista.json go here).
        #[arg(long)]
        project: Option<PathBuf>,
        /// Directory of entity definition files (*.json).
        #[arg(long)]
        models: Option<PathBuf>,
        /// Directory of <artifact>.tmpl overrides.
        #[arg(long)]
        templates: Option<PathBuf>,
    },
    /// Normalize definitions only and print the model list as JSON.
    Check {
        #[arg(long)]
        models: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("artista=info")),
        )
        .init();

    let cli = Cli::parse();
    let mut settings = Settings::from_env();

    match cli.command {
        Command::Generate {
            project,
            models,
            templates,
        } => {
            if let Some(project) = project {
                if models.is_none() && std::env::var_os("ARTISTA_MODELS_DIR").is_none() {
                    settings.models_dir = project.join("schema");
                }
                settings.project_dir = project;
            }
            if let Some(models) = models {
                settings.models_dir = models;
            }
            if let Some(dir) = templates {
                settings.templates = TemplateSource::Directory(dir);
            }

            let summary = match Pipeline::new(settings).run().await {
                Ok(summary) => summary,
                Err(e) => {
                    tracing::error!(error = %e, "generation aborted");
                    return Ok(ExitCode::FAILURE);
                }
            };
            for skipped in &summary.skipped {
                tracing::warn!("skipped: {}", skipped);
            }
            for (report, failure) in summary.failures() {
                tracing::error!(
                    artifact = %report.artifact,
                    model = %failure.model,
                    kind = ?failure.kind,
                    "{}",
                    failure.message
                );
            }
            tracing::info!(
                models = summary.models.len(),
                config = %summary.config_path.display(),
                "done"
            );
            Ok(if summary.is_success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Command::Check { models } => {
            let dir = models.unwrap_or(settings.models_dir);
            let mut generator = ModelGenerator::new(dir);
            if let Err(e) = generator.generate().await {
                tracing::error!(error = %e, "normalization failed");
                return Ok(ExitCode::FAILURE);
            }
            for skipped in generator.skipped() {
                tracing::warn!("skipped: {}", skipped);
            }
            if let Some(list) = generator.models() {
                println!("{}", serde_json::to_string_pretty(list)?);
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}
