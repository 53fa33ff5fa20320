use std::path::Path;

use anyhow::Result;
use chrono::NaiveDateTime;

use template::Context;

use super::RunParams;

/// e.g. `15jun17`, as used in forcing directory names
fn ddmmmyy(t: &NaiveDateTime) -> String {
    t.format("%d%b%y").to_string().to_lowercase()
}

/// MOHID's `START`/`END` layout, e.g. `2017 06 15 02 0 0`
fn mohid_date_hour(t: &NaiveDateTime) -> String {
    t.format("%Y %m %d %H 0 0").to_string()
}

/// Variables for rendering the files of run `i`, on top of those in `job_ctx`.
pub fn run_context(
    job_ctx: &Context,
    i: usize,
    run: &RunParams,
    forcing_root: &Path,
) -> Result<Context> {
    let (start, end) = (run.start, run.end());
    let (start_ddmmmyy, end_ddmmmyy) = (ddmmmyy(&start), ddmmmyy(&end));
    let forcing_dir = forcing_root.join(format!("{start_ddmmmyy}-{end_ddmmmyy}"));

    let mut ctx = job_ctx.clone();
    ctx.insert("run_number", i)
        .insert("run_days", run.run_days)
        .insert("start_yyyymmdd", start.format("%Y%m%d"))
        .insert("end_yyyymmdd", end.format("%Y%m%d"))
        .insert("start_date_hour", mohid_date_hour(&start))
        .insert("end_date_hour", mohid_date_hour(&end))
        .insert("start_ddmmmyy", start_ddmmmyy)
        .insert("end_ddmmmyy", end_ddmmmyy)
        .insert("forcing_dir", forcing_dir.display())
        .insert(
            "Lagrangian_template",
            util::file_stem(Path::new(&run.lagrangian_template))?,
        )
        .insert("spill_lon", run.spill_lon)
        .insert("spill_lat", run.spill_lat)
        .insert("spill_volume", run.spill_volume);
    Ok(ctx)
}
