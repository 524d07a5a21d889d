//! Source identity and column-role resolution for raw CSV files.

use csv::StringRecord;

/// The three independent raw dataset types.
///
/// The source tag is the metric category: every metric column loaded
/// from a source belongs to that source's category, so category
/// membership is declared by provenance rather than inferred from
/// column naming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    Enrolment,
    Demographic,
    Biometric,
}

impl Source {
    /// Prefix applied to this source's metric names in the master table.
    pub fn prefix(self) -> &'static str {
        match self {
            Source::Enrolment => "enrol",
            Source::Demographic => "demo",
            Source::Biometric => "bio",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Source::Enrolment => "enrolment",
            Source::Demographic => "demographic",
            Source::Biometric => "biometric",
        }
    }
}

/// Column roles resolved from one file's header row.
///
/// Headers are lowercased and trimmed before matching. `date`, `state`
/// and `district` are required; `pincode` is recognized and excluded
/// from metrics (postal identifier, never summed); every remaining
/// column is a numeric metric.
#[derive(Debug)]
pub struct FileSchema {
    pub date_idx: usize,
    pub state_idx: usize,
    pub district_idx: usize,
    pub metric_columns: Vec<(usize, String)>,
}

impl FileSchema {
    /// Resolves column roles from a header row. Returns the name of the
    /// first missing required column on failure.
    pub fn from_headers(headers: &StringRecord) -> Result<Self, String> {
        let names: Vec<String> = headers
            .iter()
            .map(|h| h.trim().to_lowercase())
            .collect();

        let position = |name: &str| names.iter().position(|n| n == name);

        let date_idx = position("date").ok_or_else(|| "date".to_string())?;
        let state_idx = position("state").ok_or_else(|| "state".to_string())?;
        let district_idx = position("district").ok_or_else(|| "district".to_string())?;

        let metric_columns = names
            .iter()
            .enumerate()
            .filter(|(i, n)| {
                *i != date_idx && *i != state_idx && *i != district_idx && n.as_str() != "pincode"
            })
            .map(|(i, n)| (i, n.clone()))
            .collect();

        Ok(Self {
            date_idx,
            state_idx,
            district_idx,
            metric_columns,
        })
    }
}
