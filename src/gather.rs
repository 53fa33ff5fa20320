use std::path::Path;

use anyhow::{Context, Result};

use desc::PathOpts;

use crate::fs::Fs;

/// Move the results of the run in the current directory into `results_dir`.
pub fn gather(fs: &Fs, results_dir: &Path) -> Result<()> {
    let run_dir = std::env::current_dir().context("getting current directory")?;
    let results_dir = PathOpts::relative_to(&run_dir).apply(&results_dir.to_string_lossy());
    gather_from(fs, &run_dir, &results_dir)
}

/// Move everything in `run_dir` except symlinks into `results_dir`, flattening `res/`
/// into it, then delete the symlinks and `res/` so that `run_dir` is left empty.
pub fn gather_from(fs: &Fs, run_dir: &Path, results_dir: &Path) -> Result<()> {
    fs.create_dir_all(results_dir)?;
    if fs.same_file(run_dir, results_dir) {
        log::debug!("results dir is the run dir; nothing to gather");
        return Ok(());
    }

    let res_dir = fs.res_dir(run_dir);
    let mut symlinks = Vec::with_capacity(8);
    let mut entries = Vec::with_capacity(16);
    for path in fs.list_dir(run_dir)? {
        if path.is_symlink() {
            symlinks.push(path);
        } else if path != res_dir && !fs.same_file(&path, results_dir) {
            entries.push(path);
        }
    }
    let res_files = if res_dir.is_dir() {
        fs.list_dir(&res_dir)?
    } else {
        Vec::new()
    };

    log::info!("Moving run definition and results files...");
    for path in entries.iter().chain(&res_files) {
        move_into(fs, path, results_dir)?;
    }

    log::info!("Deleting symbolic links...");
    for link in &symlinks {
        fs.delete_file(link)?;
    }
    if res_dir.is_dir() {
        log::info!("Deleting files left in res/...");
        for path in fs.list_dir(&res_dir)? {
            if path.is_dir() && !path.is_symlink() {
                fs.delete_dir(&path)?;
            } else {
                fs.delete_file(&path)?;
            }
        }
        log::info!("Deleting res/...");
        fs.remove_empty_dir(&res_dir)?;
    }
    Ok(())
}

fn move_into(fs: &Fs, path: &Path, results_dir: &Path) -> Result<()> {
    let name = path
        .file_name()
        .with_context(|| format!("no file name in {}", path.display()))?;
    let tgt = results_dir.join(name);
    log::info!("Moving {} to {}", name.to_string_lossy(), tgt.display());
    fs.move_path(path, &tgt)
}
