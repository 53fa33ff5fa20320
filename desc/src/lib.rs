//! YAML run and job descriptions, looked up by key path.
//!
//! A key path is a sequence of nested mapping keys, e.g. `&["paths", "mohid repo"]`,
//! displayed to users as `paths: mohid repo`.

/// The loaded description document
mod run_desc;
pub use run_desc::{PathOpts, RunDesc};

/// `~` and environment variable expansion
mod expand;
pub use expand::expand;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("\"{key}\" key not found - please check your run description YAML file: {file}")]
    MissingKey { key: String, file: String },
    #[error("\"{key}\" should be {expected} in run description YAML file: {file}")]
    TypeMismatch {
        key: String,
        expected: &'static str,
        file: String,
    },
    #[error("\"{key}\" path not found: {path}")]
    PathNotFound { key: String, path: String },
    #[error("Can't read run description file {0}")]
    Read(String, #[source] std::io::Error),
    #[error("Invalid YAML in run description file {0}")]
    Parse(String, #[source] serde_yaml::Error),
}

/// Render a key path the way users see it in error messages.
pub fn key_path(path: &[&str]) -> String {
    path.join(": ")
}

/// String form of a scalar YAML value; `None` for mappings, sequences and null.
pub fn scalar_str(value: &serde_yaml::Value) -> Option<String> {
    use serde_yaml::Value;
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Tagged(tagged) => scalar_str(&tagged.value),
        Value::Null | Value::Sequence(_) | Value::Mapping(_) => None,
    }
}
