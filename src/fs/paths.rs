use std::path::{Path, PathBuf};

use super::Fs;

/// Location of the model executable inside the MOHID code repo.
pub const MOHID_EXE: &str = "Solutions/linux/bin/MohidWater.exe";

/// Utility fns for making common types of paths.
impl Fs {
    /// $MOHID_REPO/Solutions/linux/bin/MohidWater.exe
    pub fn mohid_exe(&self, mohid_repo: &Path) -> PathBuf {
        mohid_repo.join(MOHID_EXE)
    }

    /// $RUN_DIR/nomfich.dat
    pub fn nomfich_dat(&self, run_dir: &Path) -> PathBuf {
        run_dir.join("nomfich.dat")
    }

    /// $RUN_DIR/res
    pub fn res_dir(&self, run_dir: &Path) -> PathBuf {
        run_dir.join("res")
    }

    /// $RUN_DIR/MOHID.sh
    pub fn run_script(&self, run_dir: &Path) -> PathBuf {
        run_dir.join("MOHID.sh")
    }

    /// $DIR/<repo name>_rev.txt
    pub fn rev_file(&self, dir: &Path, repo_name: &str) -> PathBuf {
        dir.join(format!("{repo_name}_rev.txt"))
    }

    /// $JOB_DIR/glost-tasks.txt
    pub fn glost_tasks(&self, job_dir: &Path) -> PathBuf {
        job_dir.join("glost-tasks.txt")
    }

    /// $JOB_DIR/glost-job.sh
    pub fn glost_job_sh(&self, job_dir: &Path) -> PathBuf {
        job_dir.join("glost-job.sh")
    }

    /// $JOB_DIR/forcing-yaml/<job id>-make-hdf5-<i>.yaml
    pub fn make_hdf5_yaml(&self, job_dir: &Path, job_id: &str, i: usize) -> PathBuf {
        self.parts3(job_dir, "forcing-yaml", format!("{job_id}-make-hdf5-{i}.yaml"))
    }

    /// $JOB_DIR/mohid-yaml/<job id>-<i>.yaml
    pub fn mohid_yaml(&self, job_dir: &Path, job_id: &str, i: usize) -> PathBuf {
        self.parts3(job_dir, "mohid-yaml", format!("{job_id}-{i}.yaml"))
    }

    /// $JOB_DIR/mohid-yaml/Model-<i>.dat
    pub fn model_dat(&self, job_dir: &Path, i: usize) -> PathBuf {
        self.parts3(job_dir, "mohid-yaml", format!("Model-{i}.dat"))
    }

    /// $JOB_DIR/mohid-yaml/<Lagrangian template stem>-<i>.dat
    pub fn lagrangian_dat(&self, job_dir: &Path, stem: &str, i: usize) -> PathBuf {
        self.parts3(job_dir, "mohid-yaml", format!("{stem}-{i}.dat"))
    }

    fn parts3<T, U, V>(&self, p1: T, p2: U, p3: V) -> PathBuf
    where
        T: AsRef<Path>,
        U: AsRef<Path>,
        V: AsRef<Path>,
    {
        let mut buf = PathBuf::from(p1.as_ref());
        buf.push(p2);
        buf.push(p3);
        buf
    }
}
