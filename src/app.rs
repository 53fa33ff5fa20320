use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use desc::RunDesc;

use crate::exec::Sbatch;
use crate::fs::Fs;
use crate::gather::gather;
use crate::monte_carlo::MonteCarlo;
use crate::prep::RunPrep;
use crate::script::build_run_script;
use crate::settings::{Action, Settings};
use crate::vcs::Revisions;

/// This struct actually runs the command-line app.
pub struct App {
    /// Interpreted command line settings
    settings: Settings,
    /// Filesystem interface
    fs: Fs,
    /// Records repo revisions into run and job dirs
    revisions: Revisions,
    /// Submits scripts to the scheduler
    sbatch: Sbatch,
}

impl App {
    /// Create a new `App`.
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            fs: Fs::new(),
            revisions: Revisions::default(),
            sbatch: Sbatch::default(),
        }
    }

    /// Use `revisions` in place of the default git/hg readers.
    pub fn with_revisions(mut self, revisions: Revisions) -> Self {
        self.revisions = revisions;
        self
    }

    /// Use `sbatch` in place of the system `sbatch`.
    pub fn with_sbatch(mut self, sbatch: Sbatch) -> Self {
        self.sbatch = sbatch;
        self
    }

    /// Run the app, using settings to determine which command to run.
    pub fn run(self) -> Result<()> {
        match &self.settings.action {
            Action::Prepare {
                desc_file,
                tmp_run_dir,
            } => {
                self.prepare(desc_file, tmp_run_dir.as_deref())?;
            }
            Action::Run {
                desc_file,
                results_dir,
                tmp_run_dir,
                no_submit,
            } => {
                let msg =
                    self.run_mohid(desc_file, results_dir, tmp_run_dir.as_deref(), *no_submit)?;
                if let Some(msg) = msg {
                    log::info!("{}", msg.trim_end());
                }
            }
            Action::MonteCarlo {
                desc_file,
                csv_file,
                no_submit,
            } => {
                if let Some(msg) = self.monte_carlo(desc_file, csv_file, *no_submit)? {
                    log::info!("{}", msg.trim_end());
                }
            }
            Action::Gather { results_dir } => {
                gather(&self.fs, results_dir).context("while gathering results")?;
            }
        }
        Ok(())
    }

    /// Create and populate a temporary run directory, returning its path.
    pub fn prepare(&self, desc_file: &Path, tmp_run_dir: Option<&Path>) -> Result<PathBuf> {
        let desc = RunDesc::load(desc_file)?;
        self.prepare_run_dir(&desc, tmp_run_dir)
    }

    fn prepare_run_dir(&self, desc: &RunDesc, tmp_run_dir: Option<&Path>) -> Result<PathBuf> {
        let run_dir = RunPrep::new(desc, &self.fs, &self.revisions).prepare(tmp_run_dir)?;
        log::info!("Created temporary run directory {}", run_dir.display());
        Ok(run_dir)
    }

    /// Prepare a run directory, write its `MOHID.sh`, and submit it unless `no_submit`.
    /// Returns the scheduler's message, or `None` when nothing was submitted.
    pub fn run_mohid(
        &self,
        desc_file: &Path,
        results_dir: &Path,
        tmp_run_dir: Option<&Path>,
        no_submit: bool,
    ) -> Result<Option<String>> {
        let desc = RunDesc::load(desc_file)?;
        let run_dir = self.prepare_run_dir(&desc, tmp_run_dir)?;

        let script = build_run_script(&desc, desc_file, results_dir, &run_dir)
            .context("while building run script")?;
        let script_file = self.fs.run_script(&run_dir);
        self.fs.write_file(&script_file, &script)?;
        log::info!("Wrote job run script to {}", script_file.display());

        self.fs.create_dir_all(results_dir)?;
        if no_submit {
            return Ok(None);
        }
        Ok(Some(self.sbatch.submit(&script_file)?))
    }

    /// Build a glost job directory for the runs in `csv_file`, and submit it unless `no_submit`.
    pub fn monte_carlo(
        &self,
        desc_file: &Path,
        csv_file: &Path,
        no_submit: bool,
    ) -> Result<Option<String>> {
        let desc = RunDesc::load(desc_file)?;
        let job_dir = MonteCarlo::new(&desc, &self.fs, &self.revisions)
            .expand(csv_file)
            .context("while preparing Monte Carlo job")?;
        if no_submit {
            return Ok(None);
        }
        Ok(Some(self.sbatch.submit(&self.fs.glost_job_sh(&job_dir))?))
    }
}
