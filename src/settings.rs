use std::path::PathBuf;

use crate::args::{Args, Command};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("File not found: {0}")]
    FileNotFound(String),
}

/// What the app has been asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Prepare {
        desc_file: PathBuf,
        tmp_run_dir: Option<PathBuf>,
    },
    Run {
        desc_file: PathBuf,
        results_dir: PathBuf,
        tmp_run_dir: Option<PathBuf>,
        no_submit: bool,
    },
    MonteCarlo {
        desc_file: PathBuf,
        csv_file: PathBuf,
        no_submit: bool,
    },
    Gather {
        results_dir: PathBuf,
    },
}

/// Settings are like Args, except all the logic has
/// been applied so e.g. input files are checked and made absolute.
#[derive(Debug)]
pub struct Settings {
    pub action: Action,
    /// Warn when `-q` was given, so informational messages are suppressed
    pub log_level: log::LevelFilter,
}

/// Make an input file absolute, failing if it doesn't exist.
fn input_file(path: PathBuf) -> Result<PathBuf, Error> {
    if path.exists() {
        Ok(desc::PathOpts::default().apply(&path.to_string_lossy()))
    } else {
        Err(Error::FileNotFound(path.display().to_string()))
    }
}

/// Make an output path absolute without requiring it to exist.
fn output_path(path: PathBuf) -> PathBuf {
    desc::PathOpts::default().apply(&path.to_string_lossy())
}

impl TryFrom<Args> for Settings {
    type Error = anyhow::Error;
    fn try_from(args: Args) -> Result<Self, Self::Error> {
        let mut quiet = false;
        let action = match args.command {
            Command::Prepare {
                desc_file,
                quiet: q,
                tmp_run_dir,
            } => {
                quiet = q;
                Action::Prepare {
                    desc_file: input_file(desc_file)?,
                    tmp_run_dir,
                }
            }
            Command::Run {
                desc_file,
                results_dir,
                no_submit,
                quiet: q,
                tmp_run_dir,
            } => {
                quiet = q;
                Action::Run {
                    desc_file: input_file(desc_file)?,
                    results_dir: output_path(results_dir),
                    tmp_run_dir,
                    no_submit,
                }
            }
            Command::MonteCarlo {
                desc_file,
                csv_file,
                no_submit,
            } => Action::MonteCarlo {
                desc_file: input_file(desc_file)?,
                csv_file: input_file(csv_file)?,
                no_submit,
            },
            // resolved against the run dir when gathering:
            Command::Gather { results_dir } => Action::Gather { results_dir },
        };

        let log_level = if args.debug {
            log::LevelFilter::Debug
        } else if quiet {
            log::LevelFilter::Warn
        } else {
            log::LevelFilter::Info
        };

        Ok(Self { action, log_level })
    }
}
