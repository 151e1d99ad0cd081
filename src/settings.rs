//! Run settings: where definitions are read from and where each artifact kind is written.
//! Environment-backed with defaults (`ARTISTA_PROJECT_DIR`, `ARTISTA_MODELS_DIR`, `ARTISTA_TEMPLATES_DIR`).

use crate::generate::ArtifactKind;
use crate::template::TemplateSource;
use std::path::{Path, PathBuf};

/// Resolved config file written at the project root after every run.
pub const CONFIG_FILE_NAME: &str = "artista.json";

/// Support script written at the project root.
pub const IMPORT_SCRIPT_NAME: &str = "import.js";

/// Output directories, relative to the project directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layout {
    pub persistence: PathBuf,
    pub api: PathBuf,
    pub client: PathBuf,
    /// Copies of the definition files.
    pub ddl: PathBuf,
}

impl Default for Layout {
    fn default() -> Self {
        Layout {
            persistence: PathBuf::from("models"),
            api: PathBuf::from("routes"),
            client: PathBuf::from("public/javascripts/services"),
            ddl: PathBuf::from("ddl"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Settings {
    pub project_dir: PathBuf,
    pub models_dir: PathBuf,
    pub templates: TemplateSource,
    pub layout: Layout,
}

impl Settings {
    pub fn new(project_dir: impl Into<PathBuf>, models_dir: impl Into<PathBuf>) -> Self {
        Settings {
            project_dir: project_dir.into(),
            models_dir: models_dir.into(),
            templates: TemplateSource::Builtin,
            layout: Layout::default(),
        }
    }

    /// From env: `ARTISTA_PROJECT_DIR` (default `.`), `ARTISTA_MODELS_DIR` (default `<project>/schema`),
    /// `ARTISTA_TEMPLATES_DIR` (default: builtin templates).
    pub fn from_env() -> Self {
        let project_dir = PathBuf::from(std::env::var("ARTISTA_PROJECT_DIR").unwrap_or_else(|_| ".".into()));
        let models_dir = std::env::var("ARTISTA_MODELS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| project_dir.join("schema"));
        let mut settings = Settings::new(project_dir, models_dir);
        if let Ok(dir) = std::env::var("ARTISTA_TEMPLATES_DIR") {
            settings.templates = TemplateSource::Directory(dir.into());
        }
        settings
    }

    pub fn with_templates(mut self, templates: TemplateSource) -> Self {
        self.templates = templates;
        self
    }

    /// Project name is the project directory's base name.
    pub fn project_name(&self) -> String {
        let dir = if self.project_dir.as_os_str().is_empty() || self.project_dir == Path::new(".") {
            std::env::current_dir().unwrap_or_else(|_| self.project_dir.clone())
        } else {
            self.project_dir.clone()
        };
        dir.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "app".into())
    }

    pub fn output_dir(&self, kind: ArtifactKind) -> PathBuf {
        let rel = match kind {
            ArtifactKind::Persistence => &self.layout.persistence,
            ArtifactKind::Api => &self.layout.api,
            ArtifactKind::Client => &self.layout.client,
        };
        self.project_dir.join(rel)
    }

    pub fn ddl_dir(&self) -> PathBuf {
        self.project_dir.join(&self.layout.ddl)
    }

    pub fn config_path(&self) -> PathBuf {
        self.project_dir.join(CONFIG_FILE_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_dirs_are_distinct_and_under_project() {
        let s = Settings::new("/work/bookshop", "/defs");
        let dirs: Vec<_> = ArtifactKind::ALL.iter().map(|&k| s.output_dir(k)).collect();
        assert_eq!(dirs[0], Path::new("/work/bookshop/models"));
        assert_eq!(dirs[2], Path::new("/work/bookshop/public/javascripts/services"));
        assert!(dirs[0] != dirs[1] && dirs[1] != dirs[2] && dirs[0] != dirs[2]);
        assert_eq!(s.config_path(), Path::new("/work/bookshop/artista.json"));
        assert_eq!(s.project_name(), "bookshop");
    }
}
