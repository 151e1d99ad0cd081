//! Files the run leaves at the project root: the resolved config document and the DDL scaffold.

use crate::error::AppError;
use crate::generate::GenerationReport;
use crate::model::ModelList;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Final aggregate of one run. Written once; never read back by the generator.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedConfig<'a> {
    pub project: &'a str,
    pub generated_at: DateTime<Utc>,
    pub models: &'a ModelList,
    pub artifacts: &'a [GenerationReport],
    /// Definition files skipped as malformed, with the reason.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<String>,
}

fn write_err(path: &Path) -> impl FnOnce(std::io::Error) -> AppError + '_ {
    move |source| AppError::Write {
        path: path.to_path_buf(),
        source,
    }
}

/// Write `config` as pretty JSON to `path`, replacing any previous file.
pub async fn write_resolved_config(path: &Path, config: &ResolvedConfig<'_>) -> Result<(), AppError> {
    let json = serde_json::to_string_pretty(config)?;
    tokio::fs::write(path, json).await.map_err(write_err(path))?;
    tracing::info!(path = %path.display(), "resolved config written");
    Ok(())
}

/// Copy every definition file into `ddl_dir`. A file that already is its own
/// destination is left alone. Returns the copied paths.
pub async fn copy_definitions(sources: &[PathBuf], ddl_dir: &Path) -> Result<Vec<PathBuf>, AppError> {
    tokio::fs::create_dir_all(ddl_dir).await.map_err(write_err(ddl_dir))?;
    let mut copied = Vec::with_capacity(sources.len());
    for source in sources {
        let Some(name) = source.file_name() else {
            continue;
        };
        let out = ddl_dir.join(name);
        if same_file(source, &out).await {
            tracing::debug!(path = %source.display(), "definition already in ddl dir");
            continue;
        }
        tokio::fs::copy(source, &out).await.map_err(write_err(&out))?;
        copied.push(out);
    }
    tracing::debug!(count = copied.len(), dir = %ddl_dir.display(), "definitions copied");
    Ok(copied)
}

async fn same_file(a: &Path, b: &Path) -> bool {
    match (tokio::fs::canonicalize(a).await, tokio::fs::canonicalize(b).await) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Write text to `path`, creating parent directories.
pub async fn write_file(path: &Path, text: &str) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(write_err(parent))?;
    }
    tokio::fs::write(path, text).await.map_err(write_err(path))
}
