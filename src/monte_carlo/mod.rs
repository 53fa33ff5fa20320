use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};

use desc::{PathOpts, RunDesc};
use template::{Context, Render, TemplateDir};

use crate::fs::Fs;
use crate::script::{self, Walltime};
use crate::vcs::Revisions;

/// The run parameters CSV file
mod params;
pub use params::{load_params, RunParams};

/// Template context for each run
mod run_context;
use run_context::run_context;

/// Built-in glost job directory layout
mod skeleton;

/// Most tasks glost can run on one node.
pub const NODE_CAPACITY: usize = 32;
/// Most runs that execute at the same time; one task is taken by glost itself.
pub const MAX_CONCURRENT_RUNS: usize = NODE_CAPACITY - 1;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Run parameters row {row}: {msg}")]
    InvalidRow { row: usize, msg: String },
    #[error("Run parameters file has no runs in it")]
    NoRuns,
}

/// `#SBATCH` sizing for a glost job of `n_runs` runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobSize {
    pub tasks_per_node: usize,
    pub walltime: Walltime,
}

impl JobSize {
    pub fn new(n_runs: usize, run_walltime: Walltime) -> Self {
        let slices = n_runs.div_ceil(MAX_CONCURRENT_RUNS) as u64;
        Self {
            tasks_per_node: NODE_CAPACITY.min(n_runs + 1),
            walltime: run_walltime.times(slices),
        }
    }
}

/// Expands a job description and a table of run parameters into a glost job directory.
pub struct MonteCarlo<'a> {
    desc: &'a RunDesc,
    fs: &'a Fs,
    revisions: &'a Revisions,
}

impl<'a> MonteCarlo<'a> {
    pub fn new(desc: &'a RunDesc, fs: &'a Fs, revisions: &'a Revisions) -> Self {
        Self {
            desc,
            fs,
            revisions,
        }
    }

    /// Create the job directory with one set of run files per row of `csv_file`,
    /// returning the job directory's path.
    ///
    /// Nothing is cleaned up on failure; a partly populated job directory is left for the user.
    pub fn expand(&self, csv_file: &Path) -> Result<PathBuf> {
        let desc = self.desc;
        let job_id = desc.get_str(&["job id"])?;
        let runs_dir = desc.get_path(&["paths", "runs directory"], PathOpts::default())?;
        let config_dir = desc.get_existing_path(&["paths", "mohid config"], PathOpts::default())?;
        let forcing_dir = desc.get_path(&["paths", "forcing directory"], PathOpts::default())?;
        let mohid_cmd = desc.get_str(&["mohid command"])?;
        let make_hdf5_cmd = desc.get_opt_str(&["make-hdf5 command"])?;
        let run_walltime = Walltime::from_desc(desc, &["run walltime"])?;
        let nodes = match desc.get_opt(&["nodes"]) {
            Some(_) => desc.get_u64(&["nodes"])?,
            None => 1,
        };

        let params = load_params(csv_file)?;
        let size = JobSize::new(params.len(), run_walltime);

        let stamp = chrono::Local::now().format("%Y-%m-%dT%H%M%S").to_string();
        let job_dir = runs_dir.join(format!("{job_id}_{stamp}"));
        let job_ctx = Context::new()
            .with("job_id", &job_id)
            .with("stamp", &stamp)
            .with("job_dir", job_dir.display())
            .with("account", script::account(desc)?)
            .with("email", script::email(desc)?)
            .with("nodes", nodes)
            .with("ntasks_per_node", size.tasks_per_node)
            .with("mem_per_cpu", script::mem_per_cpu(desc)?)
            .with("walltime", size.walltime);
        skeleton::glost_job()?.materialize(&runs_dir, &job_ctx)?;
        log::info!("Created job directory {}", job_dir.display());

        self.copy_into(desc.file(), &job_dir)?;
        self.copy_into(csv_file, &job_dir)?;
        self.revisions
            .record(self.fs, desc, None, &job_dir)
            .context("while recording repository revisions")?;

        let templates = TemplateDir::new(config_dir.join("templates"));
        let mut tasks = String::with_capacity(params.len() * 256);
        for (i, run) in params.iter().enumerate() {
            let ctx = run_context(&job_ctx, i, run, &forcing_dir)?;
            self.render_run(&templates, &ctx, &job_dir, &job_id, i, run)
                .with_context(|| format!("while rendering files for run {i}"))?;
            tasks.push_str(&task_line(&job_id, i, &mohid_cmd, make_hdf5_cmd.as_deref()));
            tasks.push('\n');
        }
        self.fs.write_file(self.fs.glost_tasks(&job_dir), &tasks)?;
        log::info!("Wrote {} glost tasks", params.len());

        Ok(job_dir)
    }

    fn copy_into(&self, file: &Path, dir: &Path) -> Result<()> {
        let name = file
            .file_name()
            .with_context(|| format!("no file name in {}", file.display()))?;
        self.fs.copy(file, dir.join(name))
    }

    fn render_run(
        &self,
        templates: &dyn Render,
        ctx: &Context,
        job_dir: &Path,
        job_id: &str,
        i: usize,
        run: &RunParams,
    ) -> Result<()> {
        let fs = self.fs;
        let stem = util::file_stem(Path::new(&run.lagrangian_template))?;
        for (name, path) in [
            ("make-hdf5.yaml", fs.make_hdf5_yaml(job_dir, job_id, i)),
            ("mohid-run.yaml", fs.mohid_yaml(job_dir, job_id, i)),
            ("Model.dat", fs.model_dat(job_dir, i)),
            (run.lagrangian_template.as_str(), fs.lagrangian_dat(job_dir, stem, i)),
        ] {
            fs.write_file(&path, &templates.render(name, ctx)?)?;
        }
        Ok(())
    }
}

/// The glost task for run `i`: prepare its run dir, then run its `MOHID.sh`.
pub fn task_line(job_id: &str, i: usize, mohid_cmd: &str, make_hdf5_cmd: Option<&str>) -> String {
    let run = format!("{job_id}-{i}");
    let mut line = String::with_capacity(256);
    if let Some(make_hdf5) = make_hdf5_cmd {
        line.push_str(&format!(
            "{make_hdf5} $MONTE_CARLO/forcing-yaml/{job_id}-make-hdf5-{i}.yaml && "
        ));
    }
    line.push_str(&format!(
        "{mohid_cmd} run --no-submit --tmp-run-dir $MONTE_CARLO/{run} \
        $MONTE_CARLO/mohid-yaml/{run}.yaml $MONTE_CARLO/results/{run}/ \
        && bash $MONTE_CARLO/{run}/MOHID.sh"
    ));
    line
}
