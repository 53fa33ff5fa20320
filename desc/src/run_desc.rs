use std::path::{Path, PathBuf};

use serde_yaml::{Mapping, Value};

use crate::{expand, key_path, scalar_str, Error};

/// How `RunDesc::get_path` should treat a path value.
#[derive(Debug, Clone, Copy)]
pub struct PathOpts<'a> {
    /// expand `~` and environment variables
    pub expand: bool,
    /// make absolute, canonicalizing if the path exists
    pub resolve: bool,
    /// relative paths are taken relative to this dir instead of the current dir
    pub base: Option<&'a Path>,
}

impl Default for PathOpts<'_> {
    fn default() -> Self {
        Self {
            expand: true,
            resolve: true,
            base: None,
        }
    }
}

impl<'a> PathOpts<'a> {
    pub fn relative_to(base: &'a Path) -> Self {
        Self {
            base: Some(base),
            ..Self::default()
        }
    }

    /// Apply these options to a raw path string.
    pub fn apply(&self, raw: &str) -> PathBuf {
        let path = if self.expand {
            PathBuf::from(expand(raw))
        } else {
            PathBuf::from(raw)
        };
        if !self.resolve {
            return path;
        }
        let path = match (path.is_absolute(), self.base) {
            (true, _) => path,
            (false, Some(base)) => base.join(path),
            (false, None) => match std::env::current_dir() {
                Ok(cwd) => cwd.join(path),
                Err(_) => path,
            },
        };
        path.canonicalize().unwrap_or(path)
    }
}

/// A run or job description document, along with the file it was loaded from.
#[derive(Debug, Clone)]
pub struct RunDesc {
    value: Value,
    file: PathBuf,
}

impl RunDesc {
    /// Read and parse a YAML description file.
    pub fn load<T: AsRef<Path>>(file: T) -> Result<Self, Error> {
        let file = file.as_ref();
        let text = std::fs::read_to_string(file)
            .map_err(|e| Error::Read(file.display().to_string(), e))?;
        Self::parse(&text, file)
    }

    /// Parse YAML `text`; `file` is recorded for error messages and copying.
    pub fn parse(text: &str, file: &Path) -> Result<Self, Error> {
        let value = serde_yaml::from_str(text)
            .map_err(|e| Error::Parse(file.display().to_string(), e))?;
        log::debug!("loaded description from {}", file.display());
        Ok(Self {
            value,
            file: file.to_path_buf(),
        })
    }

    /// The file this description was loaded from.
    pub fn file(&self) -> &Path {
        &self.file
    }

    /// Look up a required value.
    pub fn get(&self, path: &[&str]) -> Result<&Value, Error> {
        self.get_opt(path).ok_or_else(|| Error::MissingKey {
            key: key_path(path),
            file: self.file.display().to_string(),
        })
    }

    /// Look up an optional value. Null values count as absent.
    pub fn get_opt(&self, path: &[&str]) -> Option<&Value> {
        let mut value = &self.value;
        for key in path {
            value = value.get(*key)?;
        }
        match value {
            Value::Null => None,
            value => Some(value),
        }
    }

    /// Required scalar value as a string; numbers and bools are converted.
    pub fn get_str(&self, path: &[&str]) -> Result<String, Error> {
        scalar_str(self.get(path)?).ok_or_else(|| self.mismatch(path, "a string"))
    }

    /// Optional scalar value as a string.
    pub fn get_opt_str(&self, path: &[&str]) -> Result<Option<String>, Error> {
        match self.get_opt(path) {
            Some(value) => scalar_str(value)
                .map(Some)
                .ok_or_else(|| self.mismatch(path, "a string")),
            None => Ok(None),
        }
    }

    pub fn get_u64(&self, path: &[&str]) -> Result<u64, Error> {
        self.get(path)?
            .as_u64()
            .ok_or_else(|| self.mismatch(path, "a non-negative integer"))
    }

    /// Entries of a required mapping, in document order, with their keys as strings.
    pub fn get_mapping(&self, path: &[&str]) -> Result<Vec<(String, &Value)>, Error> {
        let mapping: &Mapping = self
            .get(path)?
            .as_mapping()
            .ok_or_else(|| self.mismatch(path, "a mapping"))?;
        let mut entries = Vec::with_capacity(mapping.len());
        for (k, v) in mapping {
            let k = scalar_str(k).ok_or_else(|| self.mismatch(path, "a mapping with scalar keys"))?;
            entries.push((k, v));
        }
        Ok(entries)
    }

    pub fn get_seq(&self, path: &[&str]) -> Result<&[Value], Error> {
        self.get(path)?
            .as_sequence()
            .map(Vec::as_slice)
            .ok_or_else(|| self.mismatch(path, "a list"))
    }

    /// Required value interpreted as a filesystem path.
    pub fn get_path(&self, path: &[&str], opts: PathOpts) -> Result<PathBuf, Error> {
        Ok(opts.apply(&self.get_str(path)?))
    }

    /// Like `get_path`, but the path must also exist.
    pub fn get_existing_path(&self, path: &[&str], opts: PathOpts) -> Result<PathBuf, Error> {
        let resolved = self.get_path(path, opts)?;
        if resolved.exists() {
            Ok(resolved)
        } else {
            Err(Error::PathNotFound {
                key: key_path(path),
                path: resolved.display().to_string(),
            })
        }
    }

    fn mismatch(&self, path: &[&str], expected: &'static str) -> Error {
        Error::TypeMismatch {
            key: key_path(path),
            expected,
            file: self.file.display().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    const DESC: &str = "
run_id: AKNS-spatial
walltime: 5425
paths:
  mohid repo: /MIDOSS/MIDOSS-MOHID-CODE/
  runs directory: runs/
forcing:
  winds.hdf5: /forcing/winds.hdf5
  currents.hdf5: /forcing/currents.hdf5
vcs revisions:
  git:
    - /MIDOSS/MIDOSS-MOHID-config
email: ~
";

    fn desc() -> RunDesc {
        RunDesc::parse(DESC, Path::new("mohid.yaml")).unwrap()
    }

    #[test]
    fn test_get() {
        let desc = desc();
        assert_eq!(desc.get_str(&["run_id"]).unwrap(), "AKNS-spatial");
        assert_eq!(desc.get_str(&["walltime"]).unwrap(), "5425");
        assert_eq!(desc.get_u64(&["walltime"]).unwrap(), 5425);
    }

    #[test]
    fn test_missing_key() {
        let desc = desc();
        match desc.get(&["paths", "forcing directory"]) {
            Err(Error::MissingKey { key, file }) => {
                assert_eq!(key, "paths: forcing directory");
                assert_eq!(file, "mohid.yaml");
            }
            other => panic!("expected MissingKey, got {other:?}"),
        }
        assert!(desc.get_opt(&["paths", "forcing directory"]).is_none());
        assert!(desc.get_opt(&["run_id", "nested"]).is_none());
    }

    #[test]
    fn test_null_is_absent() {
        let desc = desc();
        assert!(desc.get_opt(&["email"]).is_none());
        assert!(desc.get_opt_str(&["email"]).unwrap().is_none());
    }

    #[test]
    fn test_type_mismatch() {
        let desc = desc();
        assert!(matches!(
            desc.get_str(&["forcing"]),
            Err(Error::TypeMismatch { .. })
        ));
        assert!(matches!(
            desc.get_mapping(&["run_id"]),
            Err(Error::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_mapping_keeps_order() {
        let desc = desc();
        let keys: Vec<_> = desc
            .get_mapping(&["forcing"])
            .unwrap()
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(keys, vec!["winds.hdf5", "currents.hdf5"]);
    }

    #[test]
    fn test_seq() {
        let desc = desc();
        let repos = desc.get_seq(&["vcs revisions", "git"]).unwrap();
        assert_eq!(repos.len(), 1);
    }

    #[test]
    fn test_get_path() -> Result<()> {
        let desc = desc();
        let base = tempfile::tempdir()?;
        let runs = desc.get_path(&["paths", "runs directory"], PathOpts::relative_to(base.path()))?;
        assert_eq!(runs, base.path().join("runs"));

        let opts = PathOpts {
            resolve: false,
            ..PathOpts::default()
        };
        let repo = desc.get_path(&["paths", "mohid repo"], opts)?;
        assert_eq!(repo, PathBuf::from("/MIDOSS/MIDOSS-MOHID-CODE/"));
        Ok(())
    }

    #[test]
    fn test_get_existing_path() -> Result<()> {
        let base = tempfile::tempdir()?;
        std::fs::create_dir(base.path().join("runs"))?;
        let desc = desc();
        let opts = PathOpts::relative_to(base.path());
        let runs = desc.get_existing_path(&["paths", "runs directory"], opts)?;
        assert_eq!(runs, base.path().join("runs").canonicalize()?);
        assert!(matches!(
            desc.get_existing_path(&["paths", "mohid repo"], opts),
            Err(Error::PathNotFound { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_load() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let file = dir.path().join("mohid.yaml");
        std::fs::write(&file, DESC)?;
        let desc = RunDesc::load(&file)?;
        assert_eq!(desc.file(), file.as_path());
        assert!(matches!(
            RunDesc::load(dir.path().join("nope.yaml")),
            Err(Error::Read(..))
        ));
        Ok(())
    }
}
