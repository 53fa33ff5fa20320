/// Submitting scripts to the scheduler
mod sbatch;
pub use sbatch::Sbatch;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("\"{cmd}\" failed with {status}: {stderr}")]
    SubmitFailed {
        cmd: String,
        status: std::process::ExitStatus,
        stderr: String,
    },
}
