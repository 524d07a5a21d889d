//! Monthly aggregation and the three-way outer merge.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use tracing::info;

use crate::ingest::loader::CleanedRecord;
use crate::pipeline::types::{MasterRecord, MetricSums, MonthKey};

/// One source's records rolled up to district-month granularity.
pub type MonthlyAggregate = BTreeMap<MonthKey, MetricSums>;

/// Truncates a date to the first day of its month.
pub fn month_floor(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1)
        .unwrap_or(date)
}

/// Sums all metric columns grouped by (month, state, district).
pub fn aggregate_monthly(records: &[CleanedRecord]) -> MonthlyAggregate {
    let mut aggregate = MonthlyAggregate::new();

    for record in records {
        let key = MonthKey {
            month: month_floor(record.date),
            state: record.state.clone(),
            district: record.district.clone(),
        };
        let sums = aggregate.entry(key).or_default();
        for (name, value) in &record.metrics {
            *sums.entry(name.clone()).or_insert(0.0) += value;
        }
    }

    aggregate
}

/// Full outer join of the three per-source aggregates on (month, state,
/// district). A key present in only one or two sources gets an empty
/// metric map for the absent sources; it serializes as zeros, never
/// null, reflecting "no record means zero activity".
pub fn merge_sources(
    enrol: MonthlyAggregate,
    demo: MonthlyAggregate,
    bio: MonthlyAggregate,
) -> Vec<MasterRecord> {
    let mut merged: BTreeMap<MonthKey, MasterRecord> = BTreeMap::new();

    let blank = |key: &MonthKey| MasterRecord {
        key: key.clone(),
        enrol: MetricSums::new(),
        demo: MetricSums::new(),
        bio: MetricSums::new(),
    };

    for (key, sums) in enrol {
        merged.entry(key.clone()).or_insert_with(|| blank(&key)).enrol = sums;
    }
    for (key, sums) in demo {
        merged.entry(key.clone()).or_insert_with(|| blank(&key)).demo = sums;
    }
    for (key, sums) in bio {
        merged.entry(key.clone()).or_insert_with(|| blank(&key)).bio = sums;
    }

    let master: Vec<MasterRecord> = merged.into_values().collect();
    info!(rows = master.len(), "Master table merged");
    master
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: &str, state: &str, district: &str, metrics: &[(&str, f64)]) -> CleanedRecord {
        CleanedRecord {
            date: NaiveDate::parse_from_str(date, "%d-%m-%Y").unwrap(),
            state: state.to_string(),
            district: district.to_string(),
            metrics: metrics.iter().map(|(n, v)| (n.to_string(), *v)).collect(),
        }
    }

    fn key(month: &str, state: &str, district: &str) -> MonthKey {
        MonthKey {
            month: NaiveDate::parse_from_str(month, "%Y-%m-%d").unwrap(),
            state: state.to_string(),
            district: district.to_string(),
        }
    }

    #[test]
    fn test_month_floor() {
        let d = NaiveDate::from_ymd_opt(2024, 3, 17).unwrap();
        assert_eq!(month_floor(d), NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    }

    #[test]
    fn test_days_collapse_into_one_month() {
        let records = vec![
            record("05-03-2024", "Bihar", "Patna", &[("count", 3.0)]),
            record("19-03-2024", "Bihar", "Patna", &[("count", 4.0)]),
            record("02-04-2024", "Bihar", "Patna", &[("count", 10.0)]),
        ];

        let agg = aggregate_monthly(&records);

        assert_eq!(agg.len(), 2);
        assert_eq!(agg[&key("2024-03-01", "Bihar", "Patna")]["count"], 7.0);
        assert_eq!(agg[&key("2024-04-01", "Bihar", "Patna")]["count"], 10.0);
    }

    #[test]
    fn test_outer_merge_keeps_single_source_keys() {
        let mut enrol = MonthlyAggregate::new();
        enrol.insert(
            key("2024-03-01", "Bihar", "Patna"),
            [("residents".to_string(), 5.0)].into(),
        );

        let mut bio = MonthlyAggregate::new();
        bio.insert(
            key("2024-03-01", "Goa", "North Goa"),
            [("age_5_17".to_string(), 9.0)].into(),
        );

        let master = merge_sources(enrol, MonthlyAggregate::new(), bio);

        assert_eq!(master.len(), 2);
        // absent sources are empty maps, i.e. zero activity
        let patna = master.iter().find(|m| m.key.district == "Patna").unwrap();
        assert_eq!(patna.enrol["residents"], 5.0);
        assert!(patna.demo.is_empty());
        assert!(patna.bio.is_empty());

        let goa = master.iter().find(|m| m.key.district == "North Goa").unwrap();
        assert!(goa.enrol.is_empty());
        assert_eq!(goa.bio["age_5_17"], 9.0);
    }

    #[test]
    fn test_merge_is_sorted_by_key() {
        let mut demo = MonthlyAggregate::new();
        demo.insert(key("2024-04-01", "Bihar", "Patna"), MetricSums::new());
        demo.insert(key("2024-03-01", "Goa", "North Goa"), MetricSums::new());
        demo.insert(key("2024-03-01", "Bihar", "Patna"), MetricSums::new());

        let master = merge_sources(MonthlyAggregate::new(), demo, MonthlyAggregate::new());
        let keys: Vec<_> = master.iter().map(|m| m.key.clone()).collect();

        assert_eq!(keys[0], key("2024-03-01", "Bihar", "Patna"));
        assert_eq!(keys[1], key("2024-03-01", "Goa", "North Goa"));
        assert_eq!(keys[2], key("2024-04-01", "Bihar", "Patna"));
    }
}
