//! Where templates come from: compiled-in defaults or a directory of `<name>.tmpl` files.

use crate::error::GenerateError;
use crate::template::Template;
use std::path::PathBuf;

const PERSISTENCE: &str = include_str!("../../templates/persistence.tmpl");
const API: &str = include_str!("../../templates/api.tmpl");
const CLIENT: &str = include_str!("../../templates/client.tmpl");
const IMPORT: &str = include_str!("../../templates/import.tmpl");

/// Compiled-in template text by name.
pub fn builtin(name: &str) -> Option<&'static str> {
    match name {
        "persistence" => Some(PERSISTENCE),
        "api" => Some(API),
        "client" => Some(CLIENT),
        "import" => Some(IMPORT),
        _ => None,
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum TemplateSource {
    #[default]
    Builtin,
    /// Reads `<dir>/<name>.tmpl`, falling back to the builtin when the file does not exist.
    Directory(PathBuf),
}

impl TemplateSource {
    /// Load and parse one template. Reading is the only I/O; the result renders without touching disk.
    pub async fn load(&self, name: &str) -> Result<Template, GenerateError> {
        let no_builtin = || GenerateError::Template {
            name: name.to_string(),
            message: "no builtin template".into(),
        };
        let text = match self {
            TemplateSource::Builtin => builtin(name).ok_or_else(no_builtin)?.to_string(),
            TemplateSource::Directory(dir) => {
                let path = dir.join(format!("{}.tmpl", name));
                match tokio::fs::read_to_string(&path).await {
                    Ok(text) => text,
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                        tracing::debug!(template = name, "no override, using builtin");
                        builtin(name).ok_or_else(no_builtin)?.to_string()
                    }
                    Err(e) => {
                        return Err(GenerateError::Template {
                            name: name.to_string(),
                            message: format!("{}: {}", path.display(), e),
                        })
                    }
                }
            }
        };
        Ok(Template::parse(name, &text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn builtin_templates_parse() {
        for name in ["persistence", "api", "client", "import"] {
            TemplateSource::Builtin.load(name).await.unwrap();
        }
        assert!(TemplateSource::Builtin.load("nope").await.is_err());
    }

    #[tokio::test]
    async fn directory_source_overrides_builtins() {
        let dir = tempfile::tempdir().unwrap();
        tokio::fs::write(dir.path().join("api.tmpl"), "{{name}}").await.unwrap();
        tokio::fs::write(dir.path().join("client.tmpl"), "{{#if x}}").await.unwrap();
        let source = TemplateSource::Directory(dir.path().to_path_buf());

        let api = source.load("api").await.unwrap();
        assert_eq!(api.nodes.len(), 1);
        let persistence = source.load("persistence").await.unwrap();
        assert_eq!(persistence, TemplateSource::Builtin.load("persistence").await.unwrap());
        assert!(matches!(source.load("client").await, Err(GenerateError::Render(_))));
        assert!(matches!(source.load("nope").await, Err(GenerateError::Template { .. })));
    }
}
