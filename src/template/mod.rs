//! Minimal logic-light template engine used by every generator.

mod parser;
mod render;
mod source;

pub use parser::{BlockKind, Node, Template};
pub use render::render;
pub use source::{builtin, TemplateSource};
