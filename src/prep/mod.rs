/// Creating and populating a temporary run directory.
mod run_dir;
pub use run_dir::RunPrep;

/// The `nomfich.dat` file that tells MOHID where its inputs and outputs are.
mod nomfich;
pub use nomfich::Nomfich;

#[cfg(test)]
pub mod fixture;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0} not found - did you forget to build it?")]
    ExecutableNotFound(String),
    #[error(
        "{source_path} not found; cannot create symlink for \"forcing: {link}\" - \
        please check the forcing paths and file names in your run description file"
    )]
    ForcingNotFound { link: String, source_path: String },
    #[error("{0} not found - please check the bathymetry path in your run description file")]
    BathymetryNotFound(String),
    #[error(
        "{path} not found for \"run data files: {key}\" - \
        please check the run data file paths in your run description file"
    )]
    RunDataFileNotFound { key: String, path: String },
    #[error("Run directory {0} already exists")]
    RunDirExists(String),
}
