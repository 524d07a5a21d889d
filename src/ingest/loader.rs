//! Loads a source directory of CSV files into cleaned records.

use std::fs::File;
use std::path::Path;

use anyhow::Result;
use chrono::NaiveDate;
use tracing::{info, warn};

use crate::config::GeoConfig;
use crate::error::PipelineError;
use crate::ingest::geo::{self, GeoDropCounts, GeoOutcome};
use crate::ingest::schema::{FileSchema, Source};

/// Input date format, day-month-year.
const DATE_FORMAT: &str = "%d-%m-%Y";

/// One raw row after date parsing and geography normalization.
///
/// Metric values are non-negative; empty or unparseable numeric cells
/// are zero at this boundary so no downstream stage handles missingness.
#[derive(Debug, Clone)]
pub struct CleanedRecord {
    pub date: NaiveDate,
    pub state: String,
    pub district: String,
    pub metrics: Vec<(String, f64)>,
}

/// Per-source ingestion summary. Every dropped row is counted under the
/// filter that removed it.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoadReport {
    pub files_read: usize,
    pub files_skipped: usize,
    pub rows_read: usize,
    pub rows_kept: usize,
    pub malformed_rows: usize,
    pub invalid_dates: usize,
    pub geo_drops: GeoDropCounts,
}

/// A loaded source: cleaned records plus the ingestion report.
#[derive(Debug, Default)]
pub struct SourceData {
    pub records: Vec<CleanedRecord>,
    pub report: LoadReport,
}

impl SourceData {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Loads and concatenates all CSV files under `dir` for one source.
///
/// A missing or unreadable directory is not fatal: the source simply
/// contributes no activity (all zeros for its metrics downstream).
/// Files with a broken header schema are skipped and counted.
pub fn load_source_dir(dir: &Path, source: Source, geo: &GeoConfig) -> Result<SourceData> {
    let mut data = SourceData::default();

    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(
                source = source.label(),
                dir = %dir.display(),
                error = %e,
                "Source directory unreadable, contributing empty aggregate"
            );
            return Ok(data);
        }
    };

    let mut paths: Vec<_> = entries
        .filter_map(|e| e.ok().map(|e| e.path()))
        .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("csv"))
        .collect();
    // Deterministic file order regardless of directory enumeration
    paths.sort();

    if paths.is_empty() {
        warn!(
            source = source.label(),
            dir = %dir.display(),
            "No CSV files found for source"
        );
        return Ok(data);
    }

    for path in paths {
        match load_file(&path, geo, &mut data) {
            Ok(()) => data.report.files_read += 1,
            Err(err) => {
                warn!(
                    source = source.label(),
                    file = %path.display(),
                    error = %err,
                    "Skipping file"
                );
                data.report.files_skipped += 1;
            }
        }
    }

    let report = &data.report;
    info!(
        source = source.label(),
        files_read = report.files_read,
        files_skipped = report.files_skipped,
        rows_read = report.rows_read,
        rows_kept = report.rows_kept,
        malformed_rows = report.malformed_rows,
        invalid_dates = report.invalid_dates,
        numeric_state = report.geo_drops.numeric_state,
        numeric_district = report.geo_drops.numeric_district,
        unknown_state = report.geo_drops.unknown_state,
        "Source loaded"
    );

    Ok(data)
}

fn load_file(path: &Path, geo: &GeoConfig, data: &mut SourceData) -> Result<(), PipelineError> {
    let file = File::open(path)?;
    let mut rdr = csv::Reader::from_reader(file);

    let headers = rdr.headers()?.clone();
    let schema =
        FileSchema::from_headers(&headers).map_err(|column| PipelineError::SchemaMismatch {
            path: path.to_path_buf(),
            column,
        })?;

    for result in rdr.records() {
        let row = match result {
            Ok(row) => row,
            Err(_) => {
                data.report.malformed_rows += 1;
                continue;
            }
        };
        data.report.rows_read += 1;

        let Some(date) = row
            .get(schema.date_idx)
            .and_then(|s| NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok())
        else {
            data.report.invalid_dates += 1;
            continue;
        };

        let state = row.get(schema.state_idx).unwrap_or("");
        let district = row.get(schema.district_idx).unwrap_or("");

        let outcome = geo::normalize(geo, state, district);
        data.report.geo_drops.record(&outcome);
        let GeoOutcome::Kept(state, district) = outcome else {
            continue;
        };

        let metrics = schema
            .metric_columns
            .iter()
            .map(|(idx, name)| {
                let value = row
                    .get(*idx)
                    .and_then(|s| s.trim().parse::<f64>().ok())
                    .unwrap_or(0.0)
                    .max(0.0);
                (name.clone(), value)
            })
            .collect();

        data.records.push(CleanedRecord {
            date,
            state,
            district,
            metrics,
        });
        data.report.rows_kept += 1;
    }

    Ok(())
}
