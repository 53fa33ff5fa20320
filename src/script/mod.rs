/// Walltime parsing and `H:MM:SS` formatting
mod walltime;
pub use walltime::Walltime;

/// Assembling `MOHID.sh` from its fragments
mod run_script;
pub use run_script::build_run_script;

/// Scheduler account and email settings
mod slurm;
pub use slurm::{account, email, mem_per_cpu};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid walltime \"{0}\"; expected seconds or H:MM:SS")]
    InvalidWalltime(String),
}
