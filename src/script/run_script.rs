use std::path::Path;

use anyhow::Result;

use desc::{PathOpts, RunDesc};

use super::{account, email, mem_per_cpu, Walltime};
use crate::fs::Fs;

/// Build the contents of `MOHID.sh` for the run in `run_dir`.
pub fn build_run_script(
    desc: &RunDesc,
    desc_file: &Path,
    results_dir: &Path,
    run_dir: &Path,
) -> Result<String> {
    let run_id = desc.get_str(&["run_id"])?;
    let mohid_repo = desc.get_path(&["paths", "mohid repo"], PathOpts::default())?;
    let mohid_exe = Fs.mohid_exe(&mohid_repo);
    let lagrangian = match desc.get_opt_str(&["run data files", "PARTIC_DATA"])? {
        Some(partic_data) => Some(util::file_stem(Path::new(&partic_data))?.to_owned()),
        None => None,
    };

    let mut script = String::with_capacity(4096);
    let mut builder = RunScriptBuilder::new(&mut script);
    builder.write_prefix();
    builder.write_sbatch_directives(&SbatchDirectives {
        run_id: &run_id,
        account: &account(desc)?,
        email: &email(desc)?,
        mem_per_cpu: &mem_per_cpu(desc)?,
        walltime: Walltime::from_desc(desc, &["walltime"])?,
        results_dir,
    });
    builder.write_definitions(&run_id, desc_file, run_dir, results_dir);
    builder.write_modules();
    builder.write_execute(&mohid_exe, lagrangian.as_deref());
    builder.write_fix_permissions();
    builder.write_cleanup();
    Ok(script)
}

pub struct SbatchDirectives<'a> {
    pub run_id: &'a str,
    pub account: &'a str,
    pub email: &'a str,
    pub mem_per_cpu: &'a str,
    pub walltime: Walltime,
    pub results_dir: &'a Path,
}

/// Utility for building the contents of a `MOHID.sh` script file.
/// Note that it modifies a String reference held internally;
/// read that String to get the script's contents.
/// Each block ends with a blank line except the last.
#[derive(Debug)]
pub struct RunScriptBuilder<'a> {
    strbuf: &'a mut String,
}

impl<'a> RunScriptBuilder<'a> {
    pub fn new(strbuf: &'a mut String) -> Self {
        Self { strbuf }
    }
}

impl RunScriptBuilder<'_> {
    /// shebang line
    pub fn write_prefix(&mut self) {
        self.strbuf.clear();
        self.strbuf.push_str("#!/bin/bash\n\n");
    }

    /// `#SBATCH` lines and the OpenMP thread count
    pub fn write_sbatch_directives(&mut self, d: &SbatchDirectives) {
        self.write_sbatch("job-name", d.run_id);
        self.write_sbatch("account", d.account);
        self.write_sbatch("mail-user", d.email);
        self.write_sbatch("mail-type", "ALL");
        self.write_sbatch("cpus-per-task", "1");
        self.write_sbatch("mem-per-cpu", d.mem_per_cpu);
        self.write_sbatch("time", &d.walltime.to_string());
        self.write_sbatch("output", &d.results_dir.join("stdout").display().to_string());
        self.write_sbatch("error", &d.results_dir.join("stderr").display().to_string());
        self.strbuf.push_str(
            "\n\
            if ! test -z $SLURM_CPUS_PER_TASK\n\
            then\n\
            \x20 export OMP_NUM_THREADS=$SLURM_CPUS_PER_TASK\n\
            fi\n\n",
        );
    }

    fn write_sbatch(&mut self, key: &str, value: &str) {
        self.strbuf.push_str("#SBATCH --");
        self.strbuf.push_str(key);
        self.strbuf.push('=');
        self.strbuf.push_str(value);
        self.strbuf.push('\n');
    }

    /// shell variables used by the rest of the script
    pub fn write_definitions(
        &mut self,
        run_id: &str,
        desc_file: &Path,
        run_dir: &Path,
        results_dir: &Path,
    ) {
        self.write_assignment_line("RUN_ID", &quoted(run_id));
        self.write_assignment_line("RUN_DESC", &quoted(&desc_file.display().to_string()));
        self.write_assignment_line("WORK_DIR", &quoted(&run_dir.display().to_string()));
        self.write_assignment_line("RESULTS_DIR", &quoted(&results_dir.display().to_string()));
        self.write_assignment_line("HDF5_TO_NETCDF4", "\"${HOME}/.local/bin/hdf5-to-netcdf4\"");
        self.write_assignment_line("GATHER", "\"${HOME}/.local/bin/mohid gather\"");
        self.strbuf.push('\n');
    }

    fn write_assignment_line(&mut self, var_name: &str, var_val: &str) {
        self.strbuf.push_str(var_name);
        self.strbuf.push('=');
        self.strbuf.push_str(var_val);
        self.strbuf.push('\n');
    }

    /// environment modules needed by MOHID and the post-processing tools
    pub fn write_modules(&mut self) {
        for module in ["proj4-fortran/1.0", "python/3.7", "nco/4.6.6"] {
            self.strbuf.push_str("module load ");
            self.strbuf.push_str(module);
            self.strbuf.push('\n');
        }
        self.strbuf.push('\n');
    }

    /// run MOHID, convert the Lagrangian results if there are any, and gather
    pub fn write_execute(&mut self, mohid_exe: &Path, lagrangian: Option<&str>) {
        self.strbuf.push_str(
            "mkdir -p ${RESULTS_DIR}\n\
            cd ${WORK_DIR}\n\
            echo \"working dir: $(pwd)\" >${RESULTS_DIR}/stdout\n\
            \n\
            echo \"Starting run at $(date)\" >>${RESULTS_DIR}/stdout\n",
        );
        self.strbuf.push_str(&format!(
            "{} >>${{RESULTS_DIR}}/stdout 2>>${{RESULTS_DIR}}/stderr\n",
            mohid_exe.display()
        ));
        self.strbuf.push_str(
            "MOHID_EXIT_CODE=$?\n\
            echo \"Ended run at $(date)\" >>${RESULTS_DIR}/stdout\n\n",
        );
        if let Some(stem) = lagrangian {
            self.write_netcdf4_conversion(stem);
        }
        self.strbuf.push_str(
            "echo \"Results gathering started at $(date)\" >>${RESULTS_DIR}/stdout\n\
            ${GATHER} ${RESULTS_DIR} --debug >>${RESULTS_DIR}/stdout 2>>${RESULTS_DIR}/stderr\n\
            echo \"Results gathering ended at $(date)\" >>${RESULTS_DIR}/stdout\n\n",
        );
    }

    fn write_netcdf4_conversion(&mut self, stem: &str) {
        self.strbuf.push_str("TMPDIR=\"${SLURM_TMPDIR}\"\n");
        self.strbuf.push_str(&format!("LAGRANGIAN=\"{stem}_${{RUN_ID}}\"\n"));
        self.strbuf.push_str(
            "if test -f ${WORK_DIR}/res/${LAGRANGIAN}.hdf5\n\
            then\n\
            \x20 echo \"Results hdf5 to netCDF4 conversion started at $(date)\" >>${RESULTS_DIR}/stdout\n\
            \x20 cp -v ${WORK_DIR}/res/${LAGRANGIAN}.hdf5 ${SLURM_TMPDIR}/ >>${RESULTS_DIR}/stdout && \\\n\
            \x20 ${HDF5_TO_NETCDF4} -v info \\\n\
            \x20   ${SLURM_TMPDIR}/${LAGRANGIAN}.hdf5 \\\n\
            \x20   ${SLURM_TMPDIR}/${LAGRANGIAN}.nc >>${RESULTS_DIR}/stdout 2>>${RESULTS_DIR}/stderr && \\\n\
            \x20 mv -v ${SLURM_TMPDIR}/${LAGRANGIAN}.nc ${WORK_DIR}/ >>${RESULTS_DIR}/stdout && \\\n\
            \x20 rm -v ${WORK_DIR}/res/${LAGRANGIAN}.hdf5 >>${RESULTS_DIR}/stdout\n\
            \x20 echo \"Results hdf5 to netCDF4 conversion ended at $(date)\" >>${RESULTS_DIR}/stdout\n\
            fi\n\n",
        );
    }

    /// let the group and others read the results
    pub fn write_fix_permissions(&mut self) {
        self.strbuf.push_str(
            "chmod -v go+rx ${RESULTS_DIR} >>${RESULTS_DIR}/stdout\n\
            chmod -v g+rw ${RESULTS_DIR}/* >>${RESULTS_DIR}/stdout\n\
            chmod -v o+r ${RESULTS_DIR}/* >>${RESULTS_DIR}/stdout\n\n",
        );
    }

    /// remove the (now empty) run dir and exit with MOHID's exit code
    pub fn write_cleanup(&mut self) {
        self.strbuf.push_str(
            "echo \"Deleting run directory\" >>${RESULTS_DIR}/stdout\n\
            rmdir -v $(pwd) >>${RESULTS_DIR}/stdout\n\
            echo \"Finished at $(date)\" >>${RESULTS_DIR}/stdout\n\
            exit ${MOHID_EXIT_CODE}\n",
        );
    }
}

fn quoted(val: &str) -> String {
    format!("\"{val}\"")
}
