use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::Result;

use desc::{PathOpts, RunDesc};

use super::Error;
use crate::fs::Fs;

/// Run data file keys for which MOHID writes an hdf5 output,
/// and the nomfich key that names that output.
const HDF5_OUTPUTS: &[(&str, &str)] = &[
    ("PARTIC_DATA", "PARTIC_HDF"),
    ("SURF_DAT", "SURF_HDF"),
    ("IN_DAD3D", "OUTWATER"),
    ("BOT_DAT", "BOT_HDF"),
    ("AIRW_DAT", "AIRW_HDF"),
    ("IN_TURB", "TURB_HDF"),
    ("DISPQUAL", "WATERPROP_HDF"),
];

/// Ordered `key : path` entries of a `nomfich.dat` file.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Nomfich {
    entries: Vec<(String, PathBuf)>,
}

impl Nomfich {
    /// Collect entries for a run in `run_dir`. All referenced input files must exist.
    pub fn build(desc: &RunDesc, fs: &Fs, run_dir: &Path) -> Result<Self> {
        let bathymetry = desc.get_path(&["bathymetry"], PathOpts::default())?;
        if !bathymetry.exists() {
            return Err(Error::BathymetryNotFound(bathymetry.display().to_string()).into());
        }
        let res_dir = fs.res_dir(run_dir);

        let mut nomfich = Self::default();
        nomfich.push("IN_BATIM", bathymetry);
        nomfich.push("ROOT", res_dir.clone());

        if desc.get_opt(&["run data files"]).is_none() {
            return Ok(nomfich);
        }
        let run_id = desc.get_str(&["run_id"])?;
        for (key, value) in desc.get_mapping(&["run data files"])? {
            let path = desc::scalar_str(value)
                .map(|raw| PathOpts::default().apply(&raw))
                .unwrap_or_default();
            if !path.exists() {
                return Err(Error::RunDataFileNotFound {
                    key,
                    path: path.display().to_string(),
                }
                .into());
            }
            let hdf5 = match hdf5_key(&key) {
                Some(out_key) => {
                    let stem = util::file_stem(&path)?;
                    Some((out_key, res_dir.join(format!("{stem}_{run_id}.hdf5"))))
                }
                None => None,
            };
            nomfich.push(&key, path);
            if let Some((out_key, out_path)) = hdf5 {
                nomfich.push(out_key, out_path);
            }
        }
        Ok(nomfich)
    }

    pub fn push(&mut self, key: &str, path: PathBuf) {
        self.entries.push((key.to_owned(), path));
    }
}

fn hdf5_key(key: &str) -> Option<&'static str> {
    HDF5_OUTPUTS
        .iter()
        .find(|(data_key, _)| *data_key == key)
        .map(|(_, out_key)| *out_key)
}

/// MOHID reads keys left-justified in an 11 character field.
impl fmt::Display for Nomfich {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (key, path) in &self.entries {
            writeln!(f, "{key:<11} : {}", path.display())?;
        }
        Ok(())
    }
}
