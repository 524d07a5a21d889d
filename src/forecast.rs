//! Interface to the external stress-score forecasting service.
//!
//! The model itself lives outside this crate. Implementors receive a
//! district's historical monthly stress-score series and return point
//! forecasts with confidence bounds for N future months, or `None`
//! when the history is too short to forecast. A forecasting failure
//! degrades to "no forecast"; it never aborts a pipeline run.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::pipeline::types::AnalyzedRecord;

/// Minimum number of monthly observations required before a forecast
/// is attempted.
pub const MIN_HISTORY_POINTS: usize = 2;

/// One forecast month: point estimate with confidence bounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub month: NaiveDate,
    pub predicted: f64,
    pub lower: f64,
    pub upper: f64,
}

/// A district's stress-score forecast for N future months.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Forecast {
    pub district: String,
    pub points: Vec<ForecastPoint>,
}

/// Request/response collaborator producing stress-score forecasts.
pub trait Forecaster {
    /// Forecasts `periods` months beyond the end of `history`.
    /// Returns `None` when the history is insufficient or the service
    /// cannot produce a forecast.
    fn forecast(
        &self,
        district: &str,
        history: &[(NaiveDate, f64)],
        periods: usize,
    ) -> Option<Forecast>;
}

/// Extracts a district's (month, stress_score) history from analyzed
/// records, in month order.
pub fn district_history(analyzed: &[AnalyzedRecord], district: &str) -> Vec<(NaiveDate, f64)> {
    let mut history: Vec<(NaiveDate, f64)> = analyzed
        .iter()
        .filter(|a| a.scored.master.key.district == district)
        .map(|a| (a.scored.master.key.month, a.scored.stress_score))
        .collect();
    history.sort_by_key(|(month, _)| *month);
    history
}
