use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};

use crate::{Context, Error, Template};

#[derive(Debug, Clone)]
enum Entry {
    Dir(Template),
    File(Template, Template),
}

/// A directory tree whose path names and file contents are templates.
///
/// All entry paths are relative to the templated root directory name.
#[derive(Debug, Clone)]
pub struct Scaffold {
    root: Template,
    entries: Vec<Entry>,
}

impl Scaffold {
    pub fn new(root: &str) -> Result<Self> {
        Ok(Self {
            root: Template::parse("scaffold root", root)?,
            entries: Vec::new(),
        })
    }

    pub fn dir(mut self, path: &str) -> Result<Self> {
        self.entries.push(Entry::Dir(Template::parse(path, path)?));
        Ok(self)
    }

    pub fn file(mut self, path: &str, contents: &str) -> Result<Self> {
        self.entries.push(Entry::File(
            Template::parse(path, path)?,
            Template::parse(path, contents)?,
        ));
        Ok(self)
    }

    /// Create the tree under `output_dir`, returning the path of the new root.
    /// Fails if the root already exists.
    pub fn materialize(&self, output_dir: &Path, ctx: &Context) -> Result<PathBuf> {
        let root = output_dir.join(self.root.render(ctx)?);
        if root.exists() {
            return Err(Error::ScaffoldExists(root.display().to_string()).into());
        }
        std::fs::create_dir_all(&root)
            .with_context(|| format!("creating directory {}", root.display()))?;

        for entry in &self.entries {
            match entry {
                Entry::Dir(path) => {
                    let dir = root.join(path.render(ctx)?);
                    std::fs::create_dir_all(&dir)
                        .with_context(|| format!("creating directory {}", dir.display()))?;
                }
                Entry::File(path, contents) => {
                    let file = root.join(path.render(ctx)?);
                    if let Some(parent) = file.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&file, contents.render(ctx)?)
                        .with_context(|| format!("writing {}", file.display()))?;
                }
            }
        }
        log::debug!("created {}", root.display());
        Ok(root)
    }
}
