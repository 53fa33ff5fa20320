use std::path::{Path, PathBuf};
use std::{fs, io};

use anyhow::{Context, Result};

use util::PathEncodingError;

/// Utility fns
mod ops;

/// Defines fns for creating common paths in run and job directories
mod paths;
#[cfg(test)]
pub use paths::MOHID_EXE;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Path is neither file nor dir: {0}")]
    UnknownPathType(String),
    #[error("Directory already exists: {0}")]
    AlreadyExists(String),
}

/// All file operations in the crate should go through this struct.
///
/// Operations that create or remove things are logged at debug level,
/// so `--debug` gives a full account of what a command did on disk.
#[derive(Debug, Default, Clone, Copy)]
pub struct Fs;

impl Fs {
    /// Create a new `Fs`.
    pub fn new() -> Self {
        Self
    }

    /// Check if path exists on disk (broken symlinks count as existing).
    pub fn exists<T: AsRef<Path>>(&self, path: T) -> bool {
        let path = path.as_ref();
        path.exists() || path.is_symlink()
    }

    /// Create a brand new directory, along with any missing parents.
    /// Fails if the directory itself already exists.
    pub fn create_new_dir<T: AsRef<Path>>(&self, path: T) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("creating parent dir")?;
        }
        match fs::create_dir(path) {
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Err(Error::AlreadyExists(
                path.to_str().ok_or(PathEncodingError)?.to_owned(),
            )
            .into()),
            other => {
                other.with_context(|| format!("creating dir {}", path.display()))?;
                log::debug!("created dir {}", path.display());
                Ok(())
            }
        }
    }

    /// Create a directory (uses `std::fs::create_dir_all`, so an entire tree of dirs can be created).
    pub fn create_dir_all<T: AsRef<Path>>(&self, path: T) -> Result<()> {
        let path = path.as_ref();
        fs::create_dir_all(path).with_context(|| format!("creating dir {}", path.display()))?;
        Ok(())
    }

    /// Write entire str to a file.
    pub fn write_file<T: AsRef<Path>>(&self, path: T, text: &str) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, text).with_context(|| format!("writing file {}", path.display()))?;
        log::debug!("wrote {}", path.display());
        Ok(())
    }

    /// Delete a file or symlink.
    pub fn delete_file<T: AsRef<Path>>(&self, path: T) -> Result<()> {
        let path = path.as_ref();
        fs::remove_file(path).with_context(|| format!("deleting {}", path.display()))?;
        Ok(())
    }

    /// Recursively delete a directory.
    pub fn delete_dir<T: AsRef<Path>>(&self, path: T) -> Result<()> {
        let path = path.as_ref();
        fs::remove_dir_all(path).with_context(|| format!("deleting dir {}", path.display()))?;
        log::debug!("deleted {}", path.display());
        Ok(())
    }

    /// Remove a directory, which must be empty.
    pub fn remove_empty_dir<T: AsRef<Path>>(&self, path: T) -> Result<()> {
        let path = path.as_ref();
        fs::remove_dir(path).with_context(|| format!("removing dir {}", path.display()))?;
        Ok(())
    }

    /// Symlink `symlink` to `tgt`.
    pub fn symlink<T: AsRef<Path>, U: AsRef<Path>>(&self, tgt: T, symlink: U) -> Result<()> {
        let (tgt, symlink) = (tgt.as_ref(), symlink.as_ref());
        ops::symlink(tgt, symlink)
            .with_context(|| format!("symlinking {:?} to {:?}", symlink, tgt))?;
        log::debug!("linked {} -> {}", symlink.display(), tgt.display());
        Ok(())
    }

    /// Copy `src` to `tgt`, recursively if `src` is a directory.
    pub fn copy<T: AsRef<Path>, U: AsRef<Path>>(&self, src: T, tgt: U) -> Result<()> {
        let (src, tgt) = (src.as_ref(), tgt.as_ref());
        ops::copy(src, tgt)
            .with_context(|| format!("copying {} to {}", src.display(), tgt.display()))?;
        Ok(())
    }

    /// Move `src` to `tgt`, falling back to copy and delete across filesystems.
    pub fn move_path<T: AsRef<Path>, U: AsRef<Path>>(&self, src: T, tgt: U) -> Result<()> {
        let (src, tgt) = (src.as_ref(), tgt.as_ref());
        ops::move_path(src, tgt)
            .with_context(|| format!("moving {} to {}", src.display(), tgt.display()))?;
        Ok(())
    }

    /// List the entries of a directory, sorted by name.
    pub fn list_dir<T: AsRef<Path>>(&self, path: T) -> Result<Vec<PathBuf>> {
        let path = path.as_ref();
        let mut entries = Vec::with_capacity(16);
        for entry in fs::read_dir(path).with_context(|| format!("listing {}", path.display()))? {
            entries.push(entry?.path());
        }
        entries.sort();
        Ok(entries)
    }

    /// True if both paths exist and refer to the same directory entry.
    pub fn same_file<T: AsRef<Path>, U: AsRef<Path>>(&self, a: T, b: U) -> bool {
        match (a.as_ref().canonicalize(), b.as_ref().canonicalize()) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        }
    }
}
