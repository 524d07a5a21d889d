//! Record types flowing between pipeline stages.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

/// District-month aggregation key. Orders by (month, state, district),
/// which fixes the row order of every output table.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    pub month: NaiveDate,
    pub state: String,
    pub district: String,
}

/// Per-metric sums for one source at one district-month.
pub type MetricSums = BTreeMap<String, f64>;

/// Outer-merge of the three per-source monthly aggregates.
///
/// Metrics are kept in per-source maps keyed by their raw column name;
/// the source is the category, so the stress calculator never has to
/// infer membership from naming. An absent source is an empty map and
/// serializes as zeros.
#[derive(Debug, Clone)]
pub struct MasterRecord {
    pub key: MonthKey,
    pub enrol: MetricSums,
    pub demo: MetricSums,
    pub bio: MetricSums,
}

/// Risk tier derived from the stress score via fixed thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskCategory {
    Green,
    Amber,
    Red,
}

impl RiskCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            RiskCategory::Green => "Green",
            RiskCategory::Amber => "Amber",
            RiskCategory::Red => "Red",
        }
    }
}

impl fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Master record plus the derived stress index.
#[derive(Debug, Clone)]
pub struct ScoredRecord {
    pub master: MasterRecord,
    pub total_bio_updates: f64,
    pub total_demo_updates: f64,
    pub total_enrolments: f64,
    pub norm_bio: f64,
    pub norm_demo: f64,
    pub norm_enrol: f64,
    pub stress_score: f64,
    pub risk_category: RiskCategory,
}

/// Scored record plus the per-district anomaly flag.
#[derive(Debug, Clone)]
pub struct AnalyzedRecord {
    pub scored: ScoredRecord,
    pub z_score: f64,
    pub is_anomaly: bool,
}

/// Triggered intervention actions for one district-month.
/// `recommendations` is never empty: the default action is present when
/// no rule fires.
#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub state: String,
    pub district: String,
    pub month: NaiveDate,
    pub recommendations: String,
}
