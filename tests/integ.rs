use anyhow::Result;
use mohid_cmd::{App, Args, Command, Revision, RevisionReader, Revisions, Sbatch};
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

const MOHID_EXE: &str = "MIDOSS-MOHID-CODE/Solutions/linux/bin/MohidWater.exe";

struct FakeReader;

impl RevisionReader for FakeReader {
    fn read(&self, _repo: &Path) -> Result<Revision> {
        Ok(Revision {
            changeset: "0123abcd".to_owned(),
            author: "MIDOSS <midoss@example.com>".to_owned(),
            date: "Tue Apr 07 15:04:00 2020 -0700".to_owned(),
            summary: "Test fixture".to_owned(),
            uncommitted: Vec::with_capacity(0),
        })
    }
}

fn revisions() -> Revisions {
    Revisions::new(Box::new(FakeReader), Box::new(FakeReader))
}

fn stringify(path: &Path) -> String {
    path.to_str().unwrap().to_owned()
}

fn touch(path: PathBuf) -> Result<()> {
    std::fs::create_dir_all(path.parent().unwrap())?;
    std::fs::write(path, "")?;
    Ok(())
}

/// Returns the tempdir (keep it alive!) and its canonical path.
fn setup_run() -> Result<(TempDir, PathBuf)> {
    let dir = tempdir()?;
    let root = dir.path().canonicalize()?;
    touch(root.join(MOHID_EXE))?;
    touch(root.join("forcing/winds.hdf5"))?;
    touch(root.join("settings/AfterKatePTDomain.dat"))?;
    touch(root.join("settings/Lagrangian_DieselFuel_refined.dat"))?;
    std::fs::create_dir_all(root.join("MIDOSS-MOHID-config"))?;

    let r = stringify(&root);
    std::fs::write(
        root.join("mohid.yaml"),
        format!(
            "run_id: AKNS-spatial
walltime: 5425
paths:
  mohid repo: {r}/MIDOSS-MOHID-CODE
  runs directory: {r}/runs
forcing:
  winds.hdf5: {r}/forcing/winds.hdf5
bathymetry: {r}/settings/AfterKatePTDomain.dat
run data files:
  PARTIC_DATA: {r}/settings/Lagrangian_DieselFuel_refined.dat
vcs revisions:
  git:
    - {r}/MIDOSS-MOHID-config
"
        ),
    )?;
    Ok((dir, root))
}

fn run_args(root: &Path, no_submit: bool) -> Args {
    Args {
        debug: true,
        command: Command::Run {
            desc_file: root.join("mohid.yaml"),
            results_dir: root.join("results/AKNS-spatial"),
            no_submit,
            quiet: false,
            tmp_run_dir: Some(PathBuf::from("AKNS-spatial-0")),
        },
    }
}

fn run_app(args: Args, sbatch: Sbatch) -> Result<()> {
    let settings = args.try_into()?;
    App::new(settings)
        .with_revisions(revisions())
        .with_sbatch(sbatch)
        .run()
}

#[test]
fn test_prepare() -> Result<()> {
    let (_dir, root) = setup_run()?;
    let args = Args {
        debug: false,
        command: Command::Prepare {
            desc_file: root.join("mohid.yaml"),
            quiet: true,
            tmp_run_dir: Some(PathBuf::from("AKNS-spatial-0")),
        },
    };
    run_app(args, Sbatch::default())?;

    let run_dir = root.join("runs/AKNS-spatial-0");
    assert!(run_dir.join("MohidWater.exe").is_symlink());
    assert!(run_dir.join("winds.hdf5").is_symlink());
    assert!(run_dir.join("mohid.yaml").is_file());
    assert!(run_dir.join("MIDOSS-MOHID-config_rev.txt").is_file());
    assert!(run_dir.join("res").is_dir());

    let nomfich = std::fs::read_to_string(run_dir.join("nomfich.dat"))?;
    let lines: Vec<&str> = nomfich.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(
        lines[0],
        format!("IN_BATIM    : {}/settings/AfterKatePTDomain.dat", stringify(&root))
    );
    assert_eq!(lines[1], format!("ROOT        : {}/res", stringify(&run_dir)));
    assert!(lines[3].starts_with("PARTIC_HDF  : "));
    Ok(())
}

#[test]
fn test_run_no_submit() -> Result<()> {
    let (_dir, root) = setup_run()?;
    let settings = run_args(&root, true).try_into()?;
    let app = App::new(settings).with_revisions(revisions());
    let msg = app.run_mohid(
        &root.join("mohid.yaml"),
        &root.join("results/AKNS-spatial"),
        Some(Path::new("AKNS-spatial-0")),
        true,
    )?;
    assert!(msg.is_none());

    let script = std::fs::read_to_string(root.join("runs/AKNS-spatial-0/MOHID.sh"))?;
    assert!(script.starts_with("#!/bin/bash\n\n#SBATCH --job-name=AKNS-spatial\n"));
    assert!(script.contains("#SBATCH --account=rrg-allen\n"));
    assert!(script.contains("#SBATCH --time=1:30:25\n"));
    assert!(script.contains("LAGRANGIAN=\"Lagrangian_DieselFuel_refined_${RUN_ID}\"\n"));
    assert!(root.join("results/AKNS-spatial").is_dir());
    Ok(())
}

#[test]
fn test_run_submit() -> Result<()> {
    let (_dir, root) = setup_run()?;
    let settings = run_args(&root, false).try_into()?;
    let app = App::new(settings)
        .with_revisions(revisions())
        .with_sbatch(Sbatch::new("echo"));
    let msg = app.run_mohid(
        &root.join("mohid.yaml"),
        &root.join("results/AKNS-spatial"),
        Some(Path::new("AKNS-spatial-0")),
        false,
    )?;
    assert_eq!(
        msg,
        Some(format!("{}/runs/AKNS-spatial-0/MOHID.sh\n", stringify(&root)))
    );
    Ok(())
}

#[test]
fn test_run_submit_failed() -> Result<()> {
    let (_dir, root) = setup_run()?;
    let e = run_app(run_args(&root, false), Sbatch::new("false")).unwrap_err();
    assert_eq!(mohid_cmd::exit_code(&e), 1);
    Ok(())
}

#[test]
fn test_missing_forcing_cleans_up() -> Result<()> {
    let (_dir, root) = setup_run()?;
    std::fs::remove_file(root.join("forcing/winds.hdf5"))?;
    let e = run_app(run_args(&root, true), Sbatch::default()).unwrap_err();
    assert_eq!(mohid_cmd::exit_code(&e), 2);
    assert!(!root.join("runs/AKNS-spatial-0").exists());
    Ok(())
}

#[test]
fn test_missing_key() -> Result<()> {
    let (_dir, root) = setup_run()?;
    let desc = std::fs::read_to_string(root.join("mohid.yaml"))?;
    std::fs::write(root.join("mohid.yaml"), desc.replace("bathymetry:", "bathy:"))?;
    let e = run_app(run_args(&root, true), Sbatch::default()).unwrap_err();
    assert_eq!(mohid_cmd::exit_code(&e), 2);
    assert!(format!("{e:#}").contains("\"bathymetry\" key not found"));
    Ok(())
}

#[test]
fn test_run_then_gather() -> Result<()> {
    let (_dir, root) = setup_run()?;
    run_app(run_args(&root, true), Sbatch::default())?;

    // pretend MOHID ran:
    let run_dir = root.join("runs/AKNS-spatial-0");
    std::fs::write(run_dir.join("res/Lagrangian_DieselFuel_refined_AKNS-spatial.hdf5"), "")?;
    std::fs::write(run_dir.join("Lagrangian_DieselFuel_refined_AKNS-spatial.nc"), "")?;

    let results_dir = root.join("results/AKNS-spatial");
    mohid_cmd::gather_from(&mohid_cmd::Fs::new(), &run_dir, &results_dir)?;

    assert_eq!(std::fs::read_dir(&run_dir)?.count(), 0);
    for name in [
        "mohid.yaml",
        "nomfich.dat",
        "MOHID.sh",
        "MIDOSS-MOHID-config_rev.txt",
        "Lagrangian_DieselFuel_refined_AKNS-spatial.hdf5",
        "Lagrangian_DieselFuel_refined_AKNS-spatial.nc",
    ] {
        assert!(results_dir.join(name).exists(), "{name} was gathered");
    }
    assert!(!results_dir.join("winds.hdf5").exists());
    assert!(!results_dir.join("res").exists());
    Ok(())
}

// MONTE CARLO ////////////////

fn setup_monte_carlo(n_runs: usize) -> Result<(TempDir, PathBuf)> {
    let dir = tempdir()?;
    let root = dir.path().canonicalize()?;
    let templates = root.join("MIDOSS-MOHID-config/templates");
    std::fs::create_dir_all(&templates)?;
    std::fs::write(
        templates.join("make-hdf5.yaml"),
        "forcing dir: {{ forcing_dir }}\nstart date: {{ start_yyyymmdd }}\nend date: {{ end_yyyymmdd }}\n",
    )?;
    std::fs::write(
        templates.join("mohid-run.yaml"),
        "run_id: {{ job_id }}-{{ run_number }}\n\
         run data files:\n  \
           IN_MODEL: {{ job_dir }}/mohid-yaml/Model-{{ run_number }}.dat\n  \
           PARTIC_DATA: {{ job_dir }}/mohid-yaml/{{ Lagrangian_template }}-{{ run_number }}.dat\n",
    )?;
    std::fs::write(
        templates.join("Model.dat"),
        "START                     : {{ start_date_hour }}\nEND                       : {{ end_date_hour }}\n",
    )?;
    std::fs::write(
        templates.join("Lagrangian_AKNS_crude.dat"),
        "POSITION_COORDINATES      : {{ spill_lon }} {{ spill_lat }}\nPOINT_VOLUME              : {{ spill_volume }}\n",
    )?;

    let mut csv = String::from(
        "spill_date_hour,run_days,Lagrangian_template,spill_lon,spill_lat,spill_volume\n",
    );
    for _ in 0..n_runs {
        csv.push_str("2017-06-15 02:00,7,Lagrangian_AKNS_crude.dat,-123.16,48.65,5000\n");
    }
    std::fs::write(root.join("AKNS_spatial.csv"), csv)?;

    let r = stringify(&root);
    std::fs::write(
        root.join("monte-carlo.yaml"),
        format!(
            "job id: AKNS-spatial
account: def-allen
email: test@example.com
nodes: 1
mem per cpu: 14100M
run walltime: 7200
paths:
  forcing directory: {r}/forcing
  runs directory: {r}/runs
  mohid config: {r}/MIDOSS-MOHID-config
mohid command: $HOME/.local/bin/mohid
vcs revisions:
  git:
    - {r}/MIDOSS-MOHID-config
"
        ),
    )?;
    Ok((dir, root))
}

fn monte_carlo_args(root: &Path) -> Args {
    Args {
        debug: false,
        command: Command::MonteCarlo {
            desc_file: root.join("monte-carlo.yaml"),
            csv_file: root.join("AKNS_spatial.csv"),
            no_submit: true,
        },
    }
}

fn only_job_dir(root: &Path) -> Result<PathBuf> {
    let mut entries: Vec<PathBuf> = std::fs::read_dir(root.join("runs"))?
        .map(|e| e.map(|e| e.path()))
        .collect::<Result<_, _>>()?;
    assert_eq!(entries.len(), 1, "exactly one job dir was created");
    Ok(entries.remove(0))
}

#[test]
fn test_monte_carlo() -> Result<()> {
    let n_runs = 3;
    let (_dir, root) = setup_monte_carlo(n_runs)?;
    run_app(monte_carlo_args(&root), Sbatch::default())?;

    let job_dir = only_job_dir(&root)?;
    let job_name = job_dir.file_name().unwrap().to_str().unwrap();
    assert!(job_name.starts_with("AKNS-spatial_"));
    for file in [
        "monte-carlo.yaml",
        "AKNS_spatial.csv",
        "MIDOSS-MOHID-config_rev.txt",
        "glost-job.sh",
    ] {
        assert!(job_dir.join(file).is_file(), "{file} exists");
    }
    assert!(job_dir.join("results").is_dir());

    let tasks = std::fs::read_to_string(job_dir.join("glost-tasks.txt"))?;
    let tasks: Vec<&str> = tasks.lines().collect();
    assert_eq!(tasks.len(), n_runs);
    for (i, task) in tasks.iter().enumerate() {
        assert!(job_dir.join(format!("mohid-yaml/AKNS-spatial-{i}.yaml")).is_file());
        assert!(job_dir.join(format!("mohid-yaml/Model-{i}.dat")).is_file());
        assert!(job_dir
            .join(format!("forcing-yaml/AKNS-spatial-make-hdf5-{i}.yaml"))
            .is_file());
        assert_eq!(
            *task,
            format!(
                "$HOME/.local/bin/mohid run --no-submit --tmp-run-dir $MONTE_CARLO/AKNS-spatial-{i} \
                 $MONTE_CARLO/mohid-yaml/AKNS-spatial-{i}.yaml $MONTE_CARLO/results/AKNS-spatial-{i}/ \
                 && bash $MONTE_CARLO/AKNS-spatial-{i}/MOHID.sh"
            )
        );
    }
    assert!(!job_dir.join(format!("mohid-yaml/AKNS-spatial-{n_runs}.yaml")).exists());

    let job_dir_str = stringify(&job_dir);
    let mohid_run = std::fs::read_to_string(job_dir.join("mohid-yaml/AKNS-spatial-1.yaml"))?;
    assert_eq!(
        mohid_run,
        format!(
            "run_id: AKNS-spatial-1\n\
             run data files:\n  \
               IN_MODEL: {job_dir_str}/mohid-yaml/Model-1.dat\n  \
               PARTIC_DATA: {job_dir_str}/mohid-yaml/Lagrangian_AKNS_crude-1.dat\n"
        )
    );
    let model = std::fs::read_to_string(job_dir.join("mohid-yaml/Model-0.dat"))?;
    assert_eq!(
        model,
        "START                     : 2017 06 15 02 0 0\nEND                       : 2017 06 22 02 0 0\n"
    );
    let lagrangian =
        std::fs::read_to_string(job_dir.join("mohid-yaml/Lagrangian_AKNS_crude-2.dat"))?;
    assert!(lagrangian.ends_with("POINT_VOLUME              : 5\n"));
    let make_hdf5 =
        std::fs::read_to_string(job_dir.join("forcing-yaml/AKNS-spatial-make-hdf5-0.yaml"))?;
    assert!(make_hdf5.starts_with(&format!(
        "forcing dir: {}/forcing/15jun17-22jun17\n",
        stringify(&root)
    )));

    let glost_job = std::fs::read_to_string(job_dir.join("glost-job.sh"))?;
    assert!(glost_job.contains("#SBATCH --ntasks-per-node=4\n"));
    assert!(glost_job.contains("#SBATCH --mem-per-cpu=14100M\n"));
    assert!(glost_job.contains("#SBATCH --time=2:00:00\n"));
    assert!(glost_job.contains(&format!("export MONTE_CARLO={job_dir_str}\n")));
    Ok(())
}

#[test]
fn test_monte_carlo_submit() -> Result<()> {
    let (_dir, root) = setup_monte_carlo(1)?;
    let settings = monte_carlo_args(&root).try_into()?;
    let app = App::new(settings)
        .with_revisions(revisions())
        .with_sbatch(Sbatch::new("echo"));
    let msg = app.monte_carlo(
        &root.join("monte-carlo.yaml"),
        &root.join("AKNS_spatial.csv"),
        false,
    )?;
    let job_dir = only_job_dir(&root)?;
    assert_eq!(msg, Some(format!("{}/glost-job.sh\n", stringify(&job_dir))));
    Ok(())
}

#[test]
fn test_monte_carlo_missing_template() -> Result<()> {
    let (_dir, root) = setup_monte_carlo(2)?;
    std::fs::remove_file(root.join("MIDOSS-MOHID-config/templates/Lagrangian_AKNS_crude.dat"))?;
    let e = run_app(monte_carlo_args(&root), Sbatch::default()).unwrap_err();
    assert_eq!(mohid_cmd::exit_code(&e), 2);
    // no cleanup for Monte Carlo jobs:
    let job_dir = only_job_dir(&root)?;
    assert!(job_dir.join("mohid-yaml/AKNS-spatial-0.yaml").exists());
    Ok(())
}
