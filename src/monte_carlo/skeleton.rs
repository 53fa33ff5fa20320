use anyhow::Result;

use template::Scaffold;

const GLOST_JOB_SH: &str = include_str!("glost-job.sh");

/// Directory layout of a glost job, created before any per-run files are rendered.
///
/// Expects `job_id`, `stamp`, and the `#SBATCH` values in the context.
pub fn glost_job() -> Result<Scaffold> {
    Scaffold::new("{{ job_id }}_{{ stamp }}")?
        .dir("forcing-yaml")?
        .dir("mohid-yaml")?
        .dir("results")?
        .file("glost-job.sh", GLOST_JOB_SH)
}
