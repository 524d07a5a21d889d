//! Geographic-name normalization.
//!
//! Canonicalizes state and district strings, resolves known aliases,
//! and filters rows whose geography is garbage (numeric tokens) or not
//! an administrative unit (cities in the state column). Rows are only
//! ever repaired through the alias table; everything else is dropped
//! and counted.

use crate::config::GeoConfig;

/// Outcome of normalizing one row's geography.
#[derive(Debug, PartialEq, Eq)]
pub enum GeoOutcome {
    /// Canonical `(state, district)` pair.
    Kept(String, String),
    NumericState,
    NumericDistrict,
    UnknownState,
}

/// Rows dropped per filter, reported at the end of each source load.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GeoDropCounts {
    pub numeric_state: usize,
    pub numeric_district: usize,
    pub unknown_state: usize,
}

impl GeoDropCounts {
    pub fn total(&self) -> usize {
        self.numeric_state + self.numeric_district + self.unknown_state
    }

    pub fn record(&mut self, outcome: &GeoOutcome) {
        match outcome {
            GeoOutcome::Kept(..) => {}
            GeoOutcome::NumericState => self.numeric_state += 1,
            GeoOutcome::NumericDistrict => self.numeric_district += 1,
            GeoOutcome::UnknownState => self.unknown_state += 1,
        }
    }
}

/// Normalizes one raw `(state, district)` pair against the config.
pub fn normalize(config: &GeoConfig, state: &str, district: &str) -> GeoOutcome {
    let state = title_case(state.trim());
    let district = title_case(district.trim());

    if is_numeric(&state) {
        return GeoOutcome::NumericState;
    }
    if is_numeric(&district) {
        return GeoOutcome::NumericDistrict;
    }

    let state = match config.aliases.get(&state) {
        Some(canonical) => canonical.clone(),
        None => state,
    };

    if !config.valid_states.contains(&state) {
        return GeoOutcome::UnknownState;
    }

    GeoOutcome::Kept(state, district)
}

/// Title-cases a string character-wise: the first letter of each
/// alphabetic run is uppercased, the rest lowercased. Interior spacing
/// is preserved so multi-space variants still hit the alias table.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}

fn is_numeric(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_numeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_state_dropped() {
        let config = GeoConfig::default();
        assert_eq!(normalize(&config, "123", "Pune"), GeoOutcome::NumericState);
    }

    #[test]
    fn test_numeric_district_dropped() {
        let config = GeoConfig::default();
        assert_eq!(
            normalize(&config, "Maharashtra", "400001"),
            GeoOutcome::NumericDistrict
        );
    }

    #[test]
    fn test_alias_resolution() {
        let config = GeoConfig::default();
        assert_eq!(
            normalize(&config, "Orissa", "Cuttack"),
            GeoOutcome::Kept("Odisha".to_string(), "Cuttack".to_string())
        );
        assert_eq!(
            normalize(&config, "pondicherry", "Karaikal"),
            GeoOutcome::Kept("Puducherry".to_string(), "Karaikal".to_string())
        );
    }

    #[test]
    fn test_city_in_state_column_dropped() {
        let config = GeoConfig::default();
        assert_eq!(normalize(&config, "Mumbai", "Mumbai"), GeoOutcome::UnknownState);
    }

    #[test]
    fn test_casing_and_whitespace() {
        let config = GeoConfig::default();
        assert_eq!(
            normalize(&config, "  tamilnadu  ", "chennai"),
            GeoOutcome::Kept("Tamil Nadu".to_string(), "Chennai".to_string())
        );
    }

    #[test]
    fn test_double_space_alias() {
        let config = GeoConfig::default();
        assert_eq!(
            normalize(&config, "west  bengal", "Howrah"),
            GeoOutcome::Kept("West Bengal".to_string(), "Howrah".to_string())
        );
    }

    #[test]
    fn test_title_case_preserves_separators() {
        assert_eq!(title_case("jammu & kashmir"), "Jammu & Kashmir");
        assert_eq!(title_case("WEST  BENGAL"), "West  Bengal");
    }

    #[test]
    fn test_drop_counts_accumulate() {
        let config = GeoConfig::default();
        let mut counts = GeoDropCounts::default();
        for (state, district) in [("123", "X"), ("Mumbai", "Y"), ("Bihar", "Patna")] {
            counts.record(&normalize(&config, state, district));
        }
        assert_eq!(counts.numeric_state, 1);
        assert_eq!(counts.unknown_state, 1);
        assert_eq!(counts.total(), 2);
    }
}
