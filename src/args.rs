use std::path::PathBuf;

use clap::{Parser, Subcommand};

const CMD_NAME: &str = "mohid";

/// Stores our command-line args format.
#[derive(Parser, Debug)]
#[command(name = CMD_NAME, version, about = "MIDOSS-MOHID command processor", long_about = None)]
pub struct Args {
    /// Show debugging output
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Set up the MIDOSS-MOHID run described in DESC_FILE and print the path of the
    /// temporary run directory
    Prepare {
        /// Run description YAML file
        #[arg(value_name = "DESC_FILE")]
        desc_file: PathBuf,

        /// Don't show the run directory path on completion
        #[arg(short, long)]
        quiet: bool,

        /// Name (or path) to use for the temporary run directory instead of a generated one
        #[arg(long, value_name = "NAME")]
        tmp_run_dir: Option<PathBuf>,
    },

    /// Prepare, execute, and gather results from a MIDOSS-MOHID run
    Run {
        /// Run description YAML file
        #[arg(value_name = "DESC_FILE")]
        desc_file: PathBuf,

        /// Directory to store results into
        #[arg(value_name = "RESULTS_DIR")]
        results_dir: PathBuf,

        /// Prepare the temporary run directory and the bash script to execute the
        /// MOHID run, but don't submit the run to the queue
        #[arg(long)]
        no_submit: bool,

        /// Don't show the run directory path or job submission message
        #[arg(short, long)]
        quiet: bool,

        /// Name (or path) to use for the temporary run directory instead of a generated one
        #[arg(long, value_name = "NAME")]
        tmp_run_dir: Option<PathBuf>,
    },

    /// Prepare for and execute a collection of Monte Carlo runs as a glost job
    MonteCarlo {
        /// glost job description YAML file
        #[arg(value_name = "DESC_FILE")]
        desc_file: PathBuf,

        /// MIDOSS-MOHID run parameters CSV file
        #[arg(value_name = "CSV_FILE")]
        csv_file: PathBuf,

        /// Prepare the job directory and glost job script, but don't submit the job
        #[arg(long)]
        no_submit: bool,
    },

    /// Gather results files from the MIDOSS-MOHID run in the current directory
    Gather {
        /// Directory to store results into; created if it doesn't exist
        #[arg(value_name = "RESULTS_DIR")]
        results_dir: PathBuf,
    },
}
