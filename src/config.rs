//! Immutable configuration objects passed into each pipeline stage.
//!
//! The production constants (alias table, state whitelist, stress
//! weights, risk thresholds) live in the `Default` impls so that unit
//! tests can run the same code with alternate configurations.

use std::collections::{BTreeSet, HashMap};

/// State-name alias table plus the whitelist of canonical states and
/// union territories. Rows whose state resolves outside the whitelist
/// (cities, garbage tokens) are dropped by the normalizer.
#[derive(Debug, Clone)]
pub struct GeoConfig {
    pub aliases: HashMap<String, String>,
    pub valid_states: BTreeSet<String>,
}

impl Default for GeoConfig {
    fn default() -> Self {
        let aliases: HashMap<String, String> = [
            ("Andaman & Nicobar Islands", "Andaman And Nicobar Islands"),
            ("Dadra & Nagar Haveli", "Dadra And Nagar Haveli"),
            ("Daman & Diu", "Daman And Diu"),
            ("Jammu & Kashmir", "Jammu And Kashmir"),
            ("Orissa", "Odisha"),
            ("Pondicherry", "Puducherry"),
            ("West  Bengal", "West Bengal"),
            ("West Bangal", "West Bengal"),
            ("Westbengal", "West Bengal"),
            ("West Bengli", "West Bengal"),
            ("Chhatisgarh", "Chhattisgarh"),
            ("Tamilnadu", "Tamil Nadu"),
            ("Uttaranchal", "Uttarakhand"),
            (
                "The Dadra And Nagar Haveli And Daman And Diu",
                "Dadra And Nagar Haveli And Daman And Diu",
            ),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let valid_states: BTreeSet<String> = [
            "Andaman And Nicobar Islands",
            "Andhra Pradesh",
            "Arunachal Pradesh",
            "Assam",
            "Bihar",
            "Chandigarh",
            "Chhattisgarh",
            "Dadra And Nagar Haveli",
            "Daman And Diu",
            "Dadra And Nagar Haveli And Daman And Diu",
            "Delhi",
            "Goa",
            "Gujarat",
            "Haryana",
            "Himachal Pradesh",
            "Jammu And Kashmir",
            "Jharkhand",
            "Karnataka",
            "Kerala",
            "Ladakh",
            "Lakshadweep",
            "Madhya Pradesh",
            "Maharashtra",
            "Manipur",
            "Meghalaya",
            "Mizoram",
            "Nagaland",
            "Odisha",
            "Puducherry",
            "Punjab",
            "Rajasthan",
            "Sikkim",
            "Tamil Nadu",
            "Telangana",
            "Tripura",
            "Uttar Pradesh",
            "Uttarakhand",
            "West Bengal",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        Self {
            aliases,
            valid_states,
        }
    }
}

/// Fixed policy weights for the stress composite. Biometric updates are
/// operationally the heaviest, hence the larger share.
#[derive(Debug, Clone, Copy)]
pub struct StressWeights {
    pub bio: f64,
    pub demo: f64,
    pub enrol: f64,
}

impl Default for StressWeights {
    fn default() -> Self {
        Self {
            bio: 0.4,
            demo: 0.3,
            enrol: 0.3,
        }
    }
}

/// Risk tier cutoffs, compared with strict `>` so boundary scores fall
/// into the lower tier.
#[derive(Debug, Clone, Copy)]
pub struct RiskThresholds {
    pub red: f64,
    pub amber: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            red: 80.0,
            amber: 50.0,
        }
    }
}

/// Trigger thresholds for the recommendation rules.
#[derive(Debug, Clone, Copy)]
pub struct RecommendationThresholds {
    pub enrol: f64,
    pub bio: f64,
    pub demo: f64,
    pub urgent_score: f64,
}

impl Default for RecommendationThresholds {
    fn default() -> Self {
        Self {
            enrol: 0.5,
            bio: 0.5,
            demo: 0.5,
            urgent_score: 70.0,
        }
    }
}

/// Absolute z-score above which a district-month is flagged anomalous.
#[derive(Debug, Clone, Copy)]
pub struct AnomalyConfig {
    pub z_threshold: f64,
}

impl Default for AnomalyConfig {
    fn default() -> Self {
        Self { z_threshold: 2.0 }
    }
}
