//! Persistence of the pipeline's tabular outputs.
//!
//! The presentation layer reads these CSVs by column name, so the
//! headers here are a contract: master columns, the scored additions,
//! the analyzed additions, and the recommendations table.

use std::collections::BTreeSet;
use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tracing::info;

use crate::pipeline::types::{
    AnalyzedRecord, MasterRecord, MetricSums, MonthKey, Recommendation, RiskCategory, ScoredRecord,
};

const MONTH_FORMAT: &str = "%Y-%m-%d";

/// File names within the output directory.
pub const MASTER_FILE: &str = "master.csv";
pub const SCORED_FILE: &str = "scored.csv";
pub const ANALYZED_FILE: &str = "analyzed.csv";
pub const RECOMMENDATIONS_FILE: &str = "recommendations.csv";

/// Writes all four tables into `dir`, creating it if needed.
pub fn write_all(
    dir: &Path,
    analyzed: &[AnalyzedRecord],
    recommendations: &[Recommendation],
) -> Result<()> {
    std::fs::create_dir_all(dir)?;

    write_master(&dir.join(MASTER_FILE), analyzed)?;
    write_scored(&dir.join(SCORED_FILE), analyzed)?;
    write_analyzed(&dir.join(ANALYZED_FILE), analyzed)?;
    write_recommendations_table(&dir.join(RECOMMENDATIONS_FILE), recommendations)?;

    info!(dir = %dir.display(), "Output tables written");
    Ok(())
}

/// Union of metric names per source across the dataset. An absent
/// metric on a given row is written as 0.
fn metric_columns<'a>(
    records: impl Iterator<Item = &'a MasterRecord> + Clone,
    pick: fn(&MasterRecord) -> &MetricSums,
) -> Vec<String> {
    let names: BTreeSet<&str> = records
        .flat_map(|m| pick(m).keys().map(String::as_str))
        .collect();
    names.into_iter().map(String::from).collect()
}

struct MasterColumns {
    enrol: Vec<String>,
    demo: Vec<String>,
    bio: Vec<String>,
}

impl MasterColumns {
    fn collect(analyzed: &[AnalyzedRecord]) -> Self {
        let masters = analyzed.iter().map(|a| &a.scored.master);
        Self {
            enrol: metric_columns(masters.clone(), |m| &m.enrol),
            demo: metric_columns(masters.clone(), |m| &m.demo),
            bio: metric_columns(masters, |m| &m.bio),
        }
    }

    fn headers(&self) -> Vec<String> {
        let mut headers = vec!["month".to_string(), "state".to_string(), "district".to_string()];
        for name in &self.enrol {
            headers.push(format!("enrol_{name}"));
        }
        for name in &self.demo {
            headers.push(format!("demo_{name}"));
        }
        for name in &self.bio {
            headers.push(format!("bio_{name}"));
        }
        headers
    }

    fn row(&self, master: &MasterRecord) -> Vec<String> {
        let mut row = vec![
            master.key.month.format(MONTH_FORMAT).to_string(),
            master.key.state.clone(),
            master.key.district.clone(),
        ];
        for (names, sums) in [
            (&self.enrol, &master.enrol),
            (&self.demo, &master.demo),
            (&self.bio, &master.bio),
        ] {
            for name in names {
                row.push(sums.get(name).copied().unwrap_or(0.0).to_string());
            }
        }
        row
    }
}

fn write_master(path: &Path, analyzed: &[AnalyzedRecord]) -> Result<()> {
    let columns = MasterColumns::collect(analyzed);
    let mut writer = csv::Writer::from_path(path)?;

    writer.write_record(columns.headers())?;
    for record in analyzed {
        writer.write_record(columns.row(&record.scored.master))?;
    }
    writer.flush()?;
    Ok(())
}

fn scored_extras(scored: &ScoredRecord) -> Vec<String> {
    vec![
        scored.total_bio_updates.to_string(),
        scored.total_demo_updates.to_string(),
        scored.total_enrolments.to_string(),
        scored.norm_bio.to_string(),
        scored.norm_demo.to_string(),
        scored.norm_enrol.to_string(),
        scored.stress_score.to_string(),
        scored.risk_category.to_string(),
    ]
}

const SCORED_HEADERS: [&str; 8] = [
    "total_bio_updates",
    "total_demo_updates",
    "total_enrolments",
    "norm_bio",
    "norm_demo",
    "norm_enrol",
    "stress_score",
    "risk_category",
];

fn write_scored(path: &Path, analyzed: &[AnalyzedRecord]) -> Result<()> {
    let columns = MasterColumns::collect(analyzed);
    let mut writer = csv::Writer::from_path(path)?;

    let mut headers = columns.headers();
    headers.extend(SCORED_HEADERS.iter().map(|h| h.to_string()));
    writer.write_record(headers)?;

    for record in analyzed {
        let mut row = columns.row(&record.scored.master);
        row.extend(scored_extras(&record.scored));
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_analyzed(path: &Path, analyzed: &[AnalyzedRecord]) -> Result<()> {
    let columns = MasterColumns::collect(analyzed);
    let mut writer = csv::Writer::from_path(path)?;

    let mut headers = columns.headers();
    headers.extend(SCORED_HEADERS.iter().map(|h| h.to_string()));
    headers.push("z_score".to_string());
    headers.push("is_anomaly".to_string());
    writer.write_record(headers)?;

    for record in analyzed {
        let mut row = columns.row(&record.scored.master);
        row.extend(scored_extras(&record.scored));
        row.push(record.z_score.to_string());
        row.push(record.is_anomaly.to_string());
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes the recommendations table on its own, used when regenerating
/// recommendations from an existing scored table.
pub fn write_recommendations_table(path: &Path, recommendations: &[Recommendation]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["state", "district", "month", "recommendations"])?;
    for rec in recommendations {
        writer.write_record([
            rec.state.as_str(),
            rec.district.as_str(),
            &rec.month.format(MONTH_FORMAT).to_string(),
            rec.recommendations.as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Logs a district forecast as pretty-printed JSON, the form the
/// presentation layer consumes from the forecasting collaborator.
pub fn print_forecast_json(forecast: &crate::forecast::Forecast) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(forecast)?);
    Ok(())
}

/// Reads a scored or analyzed table back into scored records, keeping
/// only the columns the recommendation engine needs. Extra columns
/// (including a present or absent `is_anomaly`) are tolerated; the
/// per-metric master columns are not reconstructed.
pub fn read_scored_table(path: &Path) -> Result<Vec<ScoredRecord>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let mut rdr = csv::Reader::from_reader(file);

    let headers = rdr.headers()?.clone();
    let position = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .with_context(|| format!("{}: missing column `{name}`", path.display()))
    };

    let month_idx = position("month")?;
    let state_idx = position("state")?;
    let district_idx = position("district")?;
    let total_bio_idx = position("total_bio_updates")?;
    let total_demo_idx = position("total_demo_updates")?;
    let total_enrol_idx = position("total_enrolments")?;
    let norm_bio_idx = position("norm_bio")?;
    let norm_demo_idx = position("norm_demo")?;
    let norm_enrol_idx = position("norm_enrol")?;
    let stress_idx = position("stress_score")?;
    let risk_idx = position("risk_category")?;

    let number = |row: &csv::StringRecord, idx: usize| -> f64 {
        row.get(idx).and_then(|s| s.parse().ok()).unwrap_or(0.0)
    };

    let mut records = Vec::new();
    for result in rdr.records() {
        let row = result?;

        let Some(month) = row
            .get(month_idx)
            .and_then(|s| NaiveDate::parse_from_str(s, MONTH_FORMAT).ok())
        else {
            continue;
        };

        let risk_category = match row.get(risk_idx) {
            Some("Red") => RiskCategory::Red,
            Some("Amber") => RiskCategory::Amber,
            _ => RiskCategory::Green,
        };

        records.push(ScoredRecord {
            master: MasterRecord {
                key: MonthKey {
                    month,
                    state: row.get(state_idx).unwrap_or("").to_string(),
                    district: row.get(district_idx).unwrap_or("").to_string(),
                },
                enrol: MetricSums::new(),
                demo: MetricSums::new(),
                bio: MetricSums::new(),
            },
            total_bio_updates: number(&row, total_bio_idx),
            total_demo_updates: number(&row, total_demo_idx),
            total_enrolments: number(&row, total_enrol_idx),
            norm_bio: number(&row, norm_bio_idx),
            norm_demo: number(&row, norm_demo_idx),
            norm_enrol: number(&row, norm_enrol_idx),
            stress_score: number(&row, stress_idx),
            risk_category,
        });
    }

    Ok(records)
}
