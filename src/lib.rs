//! Artista: model-driven scaffolding. JSON entity definitions are normalized into one
//! closed model list, which drives the persistence, API and client-service generators.

pub mod case;
pub mod context;
pub mod error;
pub mod generate;
pub mod model;
pub mod pipeline;
pub mod settings;
pub mod store;
pub mod template;

pub use context::GenerationContext;
pub use error::{AppError, GenerateError, ModelError, RenderError};
pub use generate::{
    ApiGenerator, ArtifactKind, ClientServiceGenerator, GenerationReport, Generator,
    PersistenceGenerator,
};
pub use model::{load_definitions, normalize, Model, ModelGenerator, ModelList, PreparedModels};
pub use pipeline::{Pipeline, RunSummary};
pub use settings::{Layout, Settings};
pub use store::ResolvedConfig;
pub use template::{render, Template, TemplateSource};
