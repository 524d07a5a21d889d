//! Stress-index computation: category totals, global min-max
//! normalization, weighted composite, and risk tiering.

use tracing::info;

use crate::config::{RiskThresholds, StressWeights};
use crate::pipeline::types::{MasterRecord, RiskCategory, ScoredRecord};
use crate::pipeline::utility::min_max_normalize;

/// Assigns the risk tier for a stress score. Comparisons are strict,
/// so a score sitting exactly on a cutoff falls into the lower tier.
pub fn categorize_risk(score: f64, thresholds: &RiskThresholds) -> RiskCategory {
    if score > thresholds.red {
        RiskCategory::Red
    } else if score > thresholds.amber {
        RiskCategory::Amber
    } else {
        RiskCategory::Green
    }
}

/// Scores every master record.
///
/// Category totals are row-wise sums of each source's metrics.
/// Normalization is min-max over the entire dataset (national scope),
/// so norms are comparable across states and months. The composite is
/// `100 * (w_bio*norm_bio + w_demo*norm_demo + w_enrol*norm_enrol)`.
pub fn calculate_stress_index(
    master: Vec<MasterRecord>,
    weights: &StressWeights,
    thresholds: &RiskThresholds,
) -> Vec<ScoredRecord> {
    let sum = |metrics: &crate::pipeline::types::MetricSums| metrics.values().sum::<f64>();

    let total_bio: Vec<f64> = master.iter().map(|m| sum(&m.bio)).collect();
    let total_demo: Vec<f64> = master.iter().map(|m| sum(&m.demo)).collect();
    let total_enrol: Vec<f64> = master.iter().map(|m| sum(&m.enrol)).collect();

    let norm_bio = min_max_normalize(&total_bio);
    let norm_demo = min_max_normalize(&total_demo);
    let norm_enrol = min_max_normalize(&total_enrol);

    let scored: Vec<ScoredRecord> = master
        .into_iter()
        .enumerate()
        .map(|(i, record)| {
            let raw = weights.bio * norm_bio[i]
                + weights.demo * norm_demo[i]
                + weights.enrol * norm_enrol[i];
            let stress_score = raw * 100.0;

            ScoredRecord {
                master: record,
                total_bio_updates: total_bio[i],
                total_demo_updates: total_demo[i],
                total_enrolments: total_enrol[i],
                norm_bio: norm_bio[i],
                norm_demo: norm_demo[i],
                norm_enrol: norm_enrol[i],
                stress_score,
                risk_category: categorize_risk(stress_score, thresholds),
            }
        })
        .collect();

    let red = scored
        .iter()
        .filter(|s| s.risk_category == RiskCategory::Red)
        .count();
    let amber = scored
        .iter()
        .filter(|s| s.risk_category == RiskCategory::Amber)
        .count();
    info!(rows = scored.len(), red, amber, "Stress index computed");

    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::types::{MetricSums, MonthKey};
    use chrono::NaiveDate;

    fn master(district: &str, enrol: f64, demo: f64, bio: f64) -> MasterRecord {
        let sums = |v: f64| -> MetricSums { [("count".to_string(), v)].into() };
        MasterRecord {
            key: MonthKey {
                month: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
                state: "Bihar".to_string(),
                district: district.to_string(),
            },
            enrol: sums(enrol),
            demo: sums(demo),
            bio: sums(bio),
        }
    }

    #[test]
    fn test_risk_boundaries_are_strict() {
        let t = RiskThresholds::default();
        assert_eq!(categorize_risk(80.0, &t), RiskCategory::Amber);
        assert_eq!(categorize_risk(80.01, &t), RiskCategory::Red);
        assert_eq!(categorize_risk(50.0, &t), RiskCategory::Amber);
        assert_eq!(categorize_risk(49.99, &t), RiskCategory::Green);
        assert_eq!(categorize_risk(0.0, &t), RiskCategory::Green);
    }

    #[test]
    fn test_norms_span_unit_interval() {
        let records = vec![
            master("Low", 0.0, 0.0, 0.0),
            master("Mid", 50.0, 10.0, 20.0),
            master("High", 100.0, 20.0, 40.0),
        ];

        let scored = calculate_stress_index(
            records,
            &StressWeights::default(),
            &RiskThresholds::default(),
        );

        for s in &scored {
            assert!((0.0..=1.0).contains(&s.norm_bio));
            assert!((0.0..=1.0).contains(&s.norm_demo));
            assert!((0.0..=1.0).contains(&s.norm_enrol));
            assert!((0.0..=100.0).contains(&s.stress_score));
        }

        let high = scored.iter().find(|s| s.master.key.district == "High").unwrap();
        assert_eq!(high.norm_bio, 1.0);
        assert_eq!(high.norm_enrol, 1.0);
        assert_eq!(high.stress_score, 100.0);
        assert_eq!(high.risk_category, RiskCategory::Red);

        let low = scored.iter().find(|s| s.master.key.district == "Low").unwrap();
        assert_eq!(low.norm_bio, 0.0);
        assert_eq!(low.stress_score, 0.0);
        assert_eq!(low.risk_category, RiskCategory::Green);
    }

    #[test]
    fn test_zero_variance_normalizes_to_zero() {
        let records = vec![master("A", 5.0, 5.0, 5.0), master("B", 5.0, 5.0, 5.0)];

        let scored = calculate_stress_index(
            records,
            &StressWeights::default(),
            &RiskThresholds::default(),
        );

        for s in &scored {
            assert_eq!(s.norm_bio, 0.0);
            assert_eq!(s.norm_demo, 0.0);
            assert_eq!(s.norm_enrol, 0.0);
            assert_eq!(s.stress_score, 0.0);
            assert!(s.stress_score.is_finite());
        }
    }

    #[test]
    fn test_weighted_composite() {
        // High district totals: bio 40, demo 20, enrol 0; low all zero.
        let records = vec![master("Zero", 0.0, 0.0, 0.0), master("Hot", 0.0, 20.0, 40.0)];

        let scored = calculate_stress_index(
            records,
            &StressWeights::default(),
            &RiskThresholds::default(),
        );

        let hot = scored.iter().find(|s| s.master.key.district == "Hot").unwrap();
        // norm_bio = norm_demo = 1, norm_enrol zero-variance -> 0
        assert!((hot.stress_score - (0.4 + 0.3) * 100.0).abs() < 1e-9);
        assert_eq!(hot.risk_category, RiskCategory::Amber);
    }

    #[test]
    fn test_empty_input() {
        let scored = calculate_stress_index(
            Vec::new(),
            &StressWeights::default(),
            &RiskThresholds::default(),
        );
        assert!(scored.is_empty());
    }
}
