//! Minimal text templates for generated run files.
//!
//! Templates are plain text with `{{ name }}` placeholders. Everything outside a
//! placeholder, including `${SHELL_VARS}` and trailing newlines, is copied
//! through untouched, which matters for shell scripts and fixed-column data files.

#[macro_use]
mod macros;
mod parse;
pub use parse::parse;
pub mod ast;

/// Parsed, renderable template
mod template;
pub use template::Template;

/// Variables available to a template while rendering
mod context;
pub use context::Context;

/// Places templates come from
mod source;
pub use source::{Render, TemplateDir};

/// Generating directory trees from templated paths and contents
mod scaffold;
pub use scaffold::Scaffold;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Template \"{0}\" not found in {1}")]
    TemplateNotFound(String, String),
    #[error("Template \"{template}\" uses undefined variable \"{var}\"")]
    UndefinedVariable { template: String, var: String },
    #[error("Scaffold target already exists: {0}")]
    ScaffoldExists(String),
}
