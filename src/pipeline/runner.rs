//! End-to-end pipeline orchestration.

use std::path::PathBuf;

use anyhow::Result;
use tracing::{info, warn};

use crate::config::{
    AnomalyConfig, GeoConfig, RecommendationThresholds, RiskThresholds, StressWeights,
};
use crate::error::PipelineError;
use crate::ingest::loader::{self, SourceData};
use crate::ingest::schema::Source;
use crate::pipeline::types::{AnalyzedRecord, Recommendation};
use crate::pipeline::{aggregate, anomaly, recommend, stress};

/// Locations of the three raw source directories.
#[derive(Debug, Clone)]
pub struct SourcePaths {
    pub enrolment: PathBuf,
    pub demographic: PathBuf,
    pub biometric: PathBuf,
}

/// Complete pipeline configuration, one immutable object per stage.
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    pub geo: GeoConfig,
    pub weights: StressWeights,
    pub risk: RiskThresholds,
    pub anomaly: AnomalyConfig,
    pub recommendations: RecommendationThresholds,
}

/// All four output stages of one pipeline run. Master and scored rows
/// are reachable through the analyzed records.
#[derive(Debug)]
pub struct PipelineOutput {
    pub analyzed: Vec<AnalyzedRecord>,
    pub recommendations: Vec<Recommendation>,
}

/// Runs the full pipeline over the three raw sources.
///
/// An unreadable source contributes an empty aggregate; only the total
/// absence of data across all three sources is fatal.
pub fn run(paths: &SourcePaths, config: &PipelineConfig) -> Result<PipelineOutput> {
    let enrol = load(&paths.enrolment, Source::Enrolment, config)?;
    let demo = load(&paths.demographic, Source::Demographic, config)?;
    let bio = load(&paths.biometric, Source::Biometric, config)?;

    if enrol.is_empty() && demo.is_empty() && bio.is_empty() {
        return Err(PipelineError::NoData.into());
    }

    let master = aggregate::merge_sources(
        aggregate::aggregate_monthly(&enrol.records),
        aggregate::aggregate_monthly(&demo.records),
        aggregate::aggregate_monthly(&bio.records),
    );

    let scored = stress::calculate_stress_index(master, &config.weights, &config.risk);
    let recommendations = recommend::recommend_all(&scored, &config.recommendations);
    let analyzed = anomaly::detect_anomalies(scored, &config.anomaly);

    info!(rows = analyzed.len(), "Pipeline run complete");

    Ok(PipelineOutput {
        analyzed,
        recommendations,
    })
}

fn load(dir: &PathBuf, source: Source, config: &PipelineConfig) -> Result<SourceData> {
    let data = loader::load_source_dir(dir, source, &config.geo)?;
    if data.is_empty() {
        warn!(source = source.label(), "Source is empty");
    }
    Ok(data)
}
