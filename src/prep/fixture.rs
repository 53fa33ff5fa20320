//! Throwaway MIDOSS directory trees for tests.

use std::path::PathBuf;

use anyhow::Result;
use tempfile::TempDir;

use desc::RunDesc;

use crate::fs::MOHID_EXE;

pub struct Fixture {
    /// canonicalized path of `_dir`
    pub root: PathBuf,
    _dir: TempDir,
}

impl Fixture {
    /// Create a code repo with a built executable, forcing files, settings files,
    /// a config repo, and a `mohid.yaml` run description that refers to them all.
    pub fn new() -> Result<Self> {
        let dir = tempfile::tempdir()?;
        let root = dir.path().canonicalize()?;

        let exe = root.join("MIDOSS-MOHID-CODE").join(MOHID_EXE);
        std::fs::create_dir_all(exe.parent().unwrap())?;
        std::fs::write(&exe, "")?;
        std::fs::create_dir_all(root.join("MIDOSS-MOHID-config"))?;
        std::fs::create_dir_all(root.join("forcing"))?;
        std::fs::create_dir_all(root.join("settings"))?;
        for file in ["forcing/winds.hdf5", "forcing/currents.hdf5"] {
            std::fs::write(root.join(file), "")?;
        }
        for file in [
            "AfterKatePTDomain.dat",
            "Model.dat",
            "Lagrangian_DieselFuel_refined.dat",
            "Surface.dat",
        ] {
            std::fs::write(root.join("settings").join(file), "")?;
        }

        let root_str = root.display();
        let yaml = format!(
            "\
run_id: AKNS-spatial
account: def-allen
email: test@example.com
walltime: \"1:30:00\"

paths:
  mohid repo: {root_str}/MIDOSS-MOHID-CODE/
  runs directory: {root_str}/runs/

forcing:
  winds.hdf5: {root_str}/forcing/winds.hdf5
  currents.hdf5: {root_str}/forcing/currents.hdf5

bathymetry: {root_str}/settings/AfterKatePTDomain.dat

run data files:
  IN_MODEL: {root_str}/settings/Model.dat
  PARTIC_DATA: {root_str}/settings/Lagrangian_DieselFuel_refined.dat
  SURF_DAT: {root_str}/settings/Surface.dat

vcs revisions:
  git:
    - {root_str}/MIDOSS-MOHID-config
"
        );
        std::fs::write(root.join("mohid.yaml"), yaml)?;

        Ok(Self { root, _dir: dir })
    }

    pub fn desc_file(&self) -> PathBuf {
        self.root.join("mohid.yaml")
    }

    pub fn desc(&self) -> Result<RunDesc> {
        Ok(RunDesc::load(self.desc_file())?)
    }
}
