use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result};

use super::Error;

const DEFAULT_PROGRAM: &str = "sbatch";

/// Submits job scripts to SLURM.
#[derive(Debug, Clone)]
pub struct Sbatch {
    program: String,
}

impl Default for Sbatch {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM)
    }
}

impl Sbatch {
    /// Use `program` in place of `sbatch`; it is called with the script path as its only arg.
    pub fn new(program: &str) -> Self {
        Self {
            program: program.to_owned(),
        }
    }

    /// Submit `script`, returning the scheduler's acknowledgement from stdout.
    pub fn submit(&self, script: &Path) -> Result<String> {
        let cmd = format!("{} {}", self.program, script.display());
        log::debug!("running {cmd}");
        let out = Command::new(&self.program)
            .arg(script)
            .output()
            .with_context(|| format!("failed to execute {cmd}"))?;
        if !out.status.success() {
            return Err(Error::SubmitFailed {
                cmd,
                status: out.status,
                stderr: String::from_utf8_lossy(&out.stderr).trim().to_owned(),
            }
            .into());
        }
        Ok(String::from_utf8_lossy(&out.stdout).into_owned())
    }
}
