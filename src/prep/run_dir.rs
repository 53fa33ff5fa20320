use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use desc::{PathOpts, RunDesc};

use super::{Error, Nomfich};
use crate::fs::Fs;
use crate::vcs::Revisions;

/// Builds the temporary run directory for a single MOHID run.
///
/// `prepare` goes through every step in order. If a forcing file turns out to be
/// missing, the half-built run directory is deleted before the error is returned;
/// no other failure cleans up after itself.
pub struct RunPrep<'a> {
    desc: &'a RunDesc,
    fs: &'a Fs,
    revisions: &'a Revisions,
}

impl<'a> RunPrep<'a> {
    pub fn new(desc: &'a RunDesc, fs: &'a Fs, revisions: &'a Revisions) -> Self {
        Self {
            desc,
            fs,
            revisions,
        }
    }

    /// Create and populate the run directory, returning its path.
    /// `tmp_run_dir` overrides the generated `<run_id>_<timestamp>` name.
    pub fn prepare(&self, tmp_run_dir: Option<&Path>) -> Result<PathBuf> {
        let mohid_exe = self.check_executable()?;
        let run_dir = self.make_run_dir(tmp_run_dir)?;
        self.link_executable(&mohid_exe, &run_dir)?;
        self.copy_description(&run_dir)?;
        self.make_forcing_links(&run_dir)
            .context("while creating forcing symlinks")?;
        self.make_nomfich(&run_dir)
            .context("while writing nomfich.dat")?;
        self.record_revisions(&run_dir)
            .context("while recording repository revisions")?;
        Ok(run_dir)
    }

    pub fn mohid_repo(&self) -> Result<PathBuf> {
        Ok(self
            .desc
            .get_path(&["paths", "mohid repo"], PathOpts::default())?)
    }

    /// Absolute path of the MOHID executable, which must already be built.
    pub fn check_executable(&self) -> Result<PathBuf> {
        let mohid_exe = self.fs.mohid_exe(&self.mohid_repo()?);
        if !mohid_exe.exists() {
            return Err(Error::ExecutableNotFound(mohid_exe.display().to_string()).into());
        }
        Ok(mohid_exe)
    }

    /// Create the run directory under `paths: runs directory`.
    pub fn make_run_dir(&self, tmp_run_dir: Option<&Path>) -> Result<PathBuf> {
        let runs_dir = self
            .desc
            .get_path(&["paths", "runs directory"], PathOpts::default())?;
        let run_dir = match tmp_run_dir {
            Some(name) => runs_dir.join(name),
            None => {
                let run_id = self.desc.get_str(&["run_id"])?;
                let stamp = chrono::Local::now().format("%Y-%m-%dT%H%M%S%.6f%z");
                runs_dir.join(format!("{run_id}_{stamp}"))
            }
        };
        if self.fs.exists(&run_dir) {
            return Err(Error::RunDirExists(run_dir.display().to_string()).into());
        }
        self.fs.create_new_dir(&run_dir)?;
        Ok(run_dir)
    }

    /// Symlink the executable into the run directory under its own file name.
    pub fn link_executable(&self, mohid_exe: &Path, run_dir: &Path) -> Result<()> {
        let name = mohid_exe
            .file_name()
            .ok_or_else(|| Error::ExecutableNotFound(mohid_exe.display().to_string()))?;
        self.fs.symlink(mohid_exe, run_dir.join(name))
    }

    /// Copy the run description file into the run directory.
    pub fn copy_description(&self, run_dir: &Path) -> Result<()> {
        let file = self.desc.file();
        let name = file.file_name().context("run description file has no file name")?;
        self.fs.copy(file, run_dir.join(name))
    }

    /// Symlink every `forcing` entry into the run directory.
    /// A missing source removes `run_dir` before failing.
    pub fn make_forcing_links(&self, run_dir: &Path) -> Result<()> {
        for (link, source) in self.desc.get_mapping(&["forcing"])? {
            let source = desc::scalar_str(source)
                .map(|raw| PathOpts::default().apply(&raw))
                .unwrap_or_default();
            if !source.exists() {
                log::debug!("removing incomplete run directory {}", run_dir.display());
                if let Err(e) = self.fs.delete_dir(run_dir) {
                    log::error!("{e:#}");
                }
                return Err(Error::ForcingNotFound {
                    link,
                    source_path: source.display().to_string(),
                }
                .into());
            }
            self.fs.symlink(&source, run_dir.join(&link))?;
        }
        Ok(())
    }

    /// Create `res/` and write `nomfich.dat`.
    pub fn make_nomfich(&self, run_dir: &Path) -> Result<()> {
        let nomfich = Nomfich::build(self.desc, self.fs, run_dir)?;
        self.fs.create_dir_all(self.fs.res_dir(run_dir))?;
        self.fs
            .write_file(self.fs.nomfich_dat(run_dir), &nomfich.to_string())
    }

    pub fn record_revisions(&self, run_dir: &Path) -> Result<()> {
        let mohid_repo = self.mohid_repo()?;
        self.revisions
            .record(self.fs, self.desc, Some(&mohid_repo), run_dir)
    }
}
