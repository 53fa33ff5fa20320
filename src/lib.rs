/// High-level command line app
mod app;
/// Definition of command-line args
mod args;
/// Submitting jobs to the scheduler
mod exec;
/// Filesystem operations
mod fs;
/// Moving run results out of the run directory
mod gather;
/// Monte Carlo glost jobs
mod monte_carlo;
/// Preparing temporary run directories
mod prep;
/// Generating `MOHID.sh` run scripts
mod script;
/// Interpreted command-line settings
mod settings;
/// Recording VCS revisions of repos used in a run
mod vcs;

use colored::Colorize;

// exported for tests:
pub use app::App;
pub use args::{Args, Command};
pub use exec::Sbatch;
pub use fs::Fs;
pub use gather::gather_from;
pub use settings::{Action, Settings};
pub use vcs::{Revision, RevisionReader, Revisions};

/// Run the command-line app.
pub fn run() -> Result<(), anyhow::Error> {
    use clap::Parser;
    let args = Args::parse();

    // INTERPRET SETTINGS ///////////////
    let settings: Settings = args.try_into()?;
    simple_logging::log_to_stderr(settings.log_level);

    // RUN THE THING /////////////////
    let app = App::new(settings);
    app.run()?;

    Ok(())
}

/// Process exit code for a failed command: 2 for problems with the description,
/// its inputs, or missing files, 1 for anything else.
pub fn exit_code(e: &anyhow::Error) -> i32 {
    if e.chain().any(is_config_error) {
        2
    } else {
        1
    }
}

fn is_config_error(cause: &(dyn std::error::Error + 'static)) -> bool {
    if let Some(e) = cause.downcast_ref::<vcs::Error>() {
        return !matches!(e, vcs::Error::CommandFailed { .. });
    }
    if let Some(e) = cause.downcast_ref::<template::Error>() {
        return matches!(e, template::Error::TemplateNotFound(..));
    }
    cause.is::<desc::Error>()
        || cause.is::<prep::Error>()
        || cause.is::<script::Error>()
        || cause.is::<settings::Error>()
        || cause.is::<monte_carlo::Error>()
}

/// Print an error and its causes to stderr.
pub fn print_error(e: &anyhow::Error) {
    eprint!("{}: {e}", "ERROR".red());
    for cause in e.chain().skip(1) {
        eprint!("\n{}\n\t{cause}", "Caused by:".yellow());
    }
    eprintln!();
}
