//! Statistical anomaly detection over each district's stress history.

use std::collections::BTreeMap;

use tracing::info;

use crate::config::AnomalyConfig;
use crate::pipeline::types::{AnalyzedRecord, ScoredRecord};
use crate::pipeline::utility::{mean, sample_stddev};

/// Flags district-months whose stress score deviates more than the
/// configured number of standard deviations from that district's own
/// history.
///
/// Statistics are computed per district name over its full series. A
/// district with zero variance (including fewer than two points) keeps
/// a divisor of 1, so its z-score is just the deviation from the mean
/// and short histories never flag spuriously.
pub fn detect_anomalies(scored: Vec<ScoredRecord>, config: &AnomalyConfig) -> Vec<AnalyzedRecord> {
    let mut series: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for record in &scored {
        series
            .entry(record.master.key.district.as_str())
            .or_default()
            .push(record.stress_score);
    }

    let stats: BTreeMap<String, (f64, f64)> = series
        .into_iter()
        .map(|(district, values)| {
            let m = mean(&values);
            let sd = sample_stddev(&values, m);
            let divisor = if sd == 0.0 { 1.0 } else { sd };
            (district.to_string(), (m, divisor))
        })
        .collect();

    let analyzed: Vec<AnalyzedRecord> = scored
        .into_iter()
        .map(|record| {
            let (m, divisor) = stats[record.master.key.district.as_str()];
            let z_score = (record.stress_score - m) / divisor;
            let is_anomaly = z_score.abs() > config.z_threshold;
            AnalyzedRecord {
                scored: record,
                z_score,
                is_anomaly,
            }
        })
        .collect();

    let anomalies = analyzed.iter().filter(|a| a.is_anomaly).count();
    info!(rows = analyzed.len(), anomalies, "Anomaly detection complete");

    analyzed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::types::{MasterRecord, MetricSums, MonthKey, RiskCategory};
    use chrono::NaiveDate;

    fn scored(district: &str, month: u32, stress_score: f64) -> ScoredRecord {
        ScoredRecord {
            master: MasterRecord {
                key: MonthKey {
                    month: NaiveDate::from_ymd_opt(2024, month, 1).unwrap(),
                    state: "Bihar".to_string(),
                    district: district.to_string(),
                },
                enrol: MetricSums::new(),
                demo: MetricSums::new(),
                bio: MetricSums::new(),
            },
            total_bio_updates: 0.0,
            total_demo_updates: 0.0,
            total_enrolments: 0.0,
            norm_bio: 0.0,
            norm_demo: 0.0,
            norm_enrol: 0.0,
            stress_score,
            risk_category: RiskCategory::Green,
        }
    }

    #[test]
    fn test_spike_is_flagged() {
        let records: Vec<ScoredRecord> = [10.0, 10.0, 10.0, 10.0, 10.0, 10.0, 90.0]
            .iter()
            .enumerate()
            .map(|(i, score)| scored("Patna", (i + 1) as u32, *score))
            .collect();

        let analyzed = detect_anomalies(records, &AnomalyConfig::default());

        let flags: Vec<bool> = analyzed.iter().map(|a| a.is_anomaly).collect();
        assert_eq!(flags, vec![false, false, false, false, false, false, true]);

        let spike = analyzed.last().unwrap();
        assert!(spike.z_score > 2.0);
    }

    #[test]
    fn test_flat_series_never_flags() {
        let records: Vec<ScoredRecord> = (1..=4).map(|m| scored("Patna", m, 50.0)).collect();

        let analyzed = detect_anomalies(records, &AnomalyConfig::default());

        for a in &analyzed {
            // zero variance: divisor 1, z is plain deviation from mean
            assert_eq!(a.z_score, 0.0);
            assert!(!a.is_anomaly);
        }
    }

    #[test]
    fn test_single_point_history() {
        let analyzed = detect_anomalies(vec![scored("Patna", 1, 77.0)], &AnomalyConfig::default());

        assert_eq!(analyzed.len(), 1);
        assert_eq!(analyzed[0].z_score, 0.0);
        assert!(!analyzed[0].is_anomaly);
    }

    #[test]
    fn test_districts_are_independent() {
        let mut records: Vec<ScoredRecord> =
            (1..=6).map(|m| scored("Calm", m, 40.0)).collect();
        records.extend(
            [10.0, 10.0, 10.0, 10.0, 10.0, 95.0]
                .iter()
                .enumerate()
                .map(|(i, score)| scored("Spiky", (i + 1) as u32, *score)),
        );

        let analyzed = detect_anomalies(records, &AnomalyConfig::default());

        assert!(analyzed.iter().filter(|a| a.scored.master.key.district == "Calm").all(|a| !a.is_anomaly));
        assert_eq!(
            analyzed
                .iter()
                .filter(|a| a.scored.master.key.district == "Spiky" && a.is_anomaly)
                .count(),
            1
        );
    }
}
