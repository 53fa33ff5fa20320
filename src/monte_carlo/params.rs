use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::Deserialize;

use super::Error;

const DATE_HOUR_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

/// One row of the parameters CSV file, as written.
#[derive(Debug, Deserialize)]
struct Record {
    spill_date_hour: String,
    run_days: u32,
    #[serde(rename = "Lagrangian_template")]
    lagrangian_template: String,
    spill_lon: f64,
    spill_lat: f64,
    /// litres
    spill_volume: f64,
}

/// Parameters of one Monte Carlo run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunParams {
    pub start: NaiveDateTime,
    pub run_days: u32,
    /// file name of the Lagrangian template in the templates dir
    pub lagrangian_template: String,
    pub spill_lon: f64,
    pub spill_lat: f64,
    /// cubic metres
    pub spill_volume: f64,
}

impl RunParams {
    pub fn end(&self) -> NaiveDateTime {
        self.start + Duration::days(i64::from(self.run_days))
    }

    fn from_record(record: Record, row: usize) -> Result<Self, Error> {
        Ok(Self {
            start: parse_date_hour(&record.spill_date_hour).ok_or_else(|| Error::InvalidRow {
                row,
                msg: format!("can't parse spill_date_hour \"{}\"", record.spill_date_hour),
            })?,
            run_days: record.run_days,
            lagrangian_template: record.lagrangian_template,
            spill_lon: record.spill_lon,
            spill_lat: record.spill_lat,
            spill_volume: record.spill_volume / 1000.0,
        })
    }
}

fn parse_date_hour(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    DATE_HOUR_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

/// Read all rows of a run parameters CSV file, in file order.
pub fn load_params(csv_file: &Path) -> Result<Vec<RunParams>> {
    let mut reader = csv::Reader::from_path(csv_file)
        .with_context(|| format!("opening run parameters file {}", csv_file.display()))?;
    read_params(&mut reader)
}

fn read_params<R: std::io::Read>(reader: &mut csv::Reader<R>) -> Result<Vec<RunParams>> {
    let mut params = Vec::with_capacity(64);
    for (row, record) in reader.deserialize::<Record>().enumerate() {
        let record = record.map_err(|e| Error::InvalidRow {
            row,
            msg: e.to_string(),
        })?;
        params.push(RunParams::from_record(record, row)?);
    }
    if params.is_empty() {
        return Err(Error::NoRuns.into());
    }
    log::debug!("loaded {} run parameter rows", params.len());
    Ok(params)
}
