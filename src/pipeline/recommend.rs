//! Rule-based intervention recommendations.

use tracing::info;

use crate::config::RecommendationThresholds;
use crate::pipeline::types::{Recommendation, ScoredRecord};

pub const REC_ENROL_CAMPS: &str = "Deploy Mobile Enrolment Camps (High New Enrolments)";
pub const REC_BIO_DRIVE: &str =
    "Initiate School/Center-based Biometric Update Drive (High Bio Load)";
pub const REC_DEMO_CAPACITY: &str =
    "Increase Demographic Update Capacity (High Correction Volume)";
pub const REC_URGENT_BUDGET: &str = "URGENT: Allocate Special Budget for Capacity Expansion";
pub const REC_MAINTAIN: &str = "Maintain Current Operations";

/// Evaluates the rule set for one scored district-month.
///
/// All matching rules fire and accumulate in fixed order; the joined
/// output is never empty because the maintain action backstops the set.
/// Non-finite inputs are treated as 0 before evaluation.
pub fn recommend(record: &ScoredRecord, thresholds: &RecommendationThresholds) -> Recommendation {
    let value = |v: f64| if v.is_finite() { v } else { 0.0 };

    let norm_enrol = value(record.norm_enrol);
    let norm_bio = value(record.norm_bio);
    let norm_demo = value(record.norm_demo);
    let stress_score = value(record.stress_score);

    let mut actions: Vec<&str> = Vec::new();

    if norm_enrol > thresholds.enrol {
        actions.push(REC_ENROL_CAMPS);
    }
    if norm_bio > thresholds.bio {
        actions.push(REC_BIO_DRIVE);
    }
    if norm_demo > thresholds.demo {
        actions.push(REC_DEMO_CAPACITY);
    }
    if stress_score > thresholds.urgent_score {
        actions.push(REC_URGENT_BUDGET);
    }
    if actions.is_empty() {
        actions.push(REC_MAINTAIN);
    }

    Recommendation {
        state: record.master.key.state.clone(),
        district: record.master.key.district.clone(),
        month: record.master.key.month,
        recommendations: actions.join("; "),
    }
}

/// Generates one recommendation per scored district-month.
pub fn recommend_all(
    scored: &[ScoredRecord],
    thresholds: &RecommendationThresholds,
) -> Vec<Recommendation> {
    let recommendations: Vec<Recommendation> =
        scored.iter().map(|r| recommend(r, thresholds)).collect();
    info!(rows = recommendations.len(), "Recommendations generated");
    recommendations
}

/// Restricts scored records to the latest month present, the view the
/// operations dashboard ships by default.
pub fn latest_month_only(scored: &[ScoredRecord]) -> Vec<ScoredRecord> {
    let Some(latest) = scored.iter().map(|r| r.master.key.month).max() else {
        return Vec::new();
    };
    scored
        .iter()
        .filter(|r| r.master.key.month == latest)
        .cloned()
        .collect()
}
