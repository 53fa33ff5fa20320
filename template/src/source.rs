use std::path::PathBuf;

use anyhow::{Context as _, Result};

use crate::{Context, Error, Template};

/// Anything that can look up a template by name and render it.
pub trait Render {
    fn render(&self, name: &str, ctx: &Context) -> Result<String>;
}

/// Templates read from files in a directory, by file name.
#[derive(Debug, Clone)]
pub struct TemplateDir {
    root: PathBuf,
}

impl TemplateDir {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn load(&self, name: &str) -> Result<Template> {
        let path = self.root.join(name);
        if !path.is_file() {
            return Err(Error::TemplateNotFound(
                name.to_owned(),
                self.root.display().to_string(),
            )
            .into());
        }
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("reading template {}", path.display()))?;
        Template::parse(name, &text)
    }
}

impl Render for TemplateDir {
    fn render(&self, name: &str, ctx: &Context) -> Result<String> {
        let tmpl = self.load(name)?;
        log::debug!("rendering template {}", self.root.join(name).display());
        Ok(tmpl.render(ctx)?)
    }
}
