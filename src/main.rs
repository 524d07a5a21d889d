//! CLI entry point for the district stress analytics pipeline.
//!
//! Provides subcommands for running the full batch pipeline over the
//! three raw sources and for re-generating recommendations from an
//! existing scored or analyzed table.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use aadhaar_pulse::output::{self, RECOMMENDATIONS_FILE};
use aadhaar_pulse::pipeline::recommend::{latest_month_only, recommend_all};
use aadhaar_pulse::pipeline::runner::{self, PipelineConfig, SourcePaths};
use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "aadhaar_pulse")]
#[command(about = "District enrolment-stress analytics pipeline", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline: three raw sources in, four tables out
    Run {
        /// Directory of enrolment CSV files
        #[arg(long, default_value = "datasets/enrolment")]
        enrolment_dir: PathBuf,

        /// Directory of demographic-update CSV files
        #[arg(long, default_value = "datasets/demographic")]
        demographic_dir: PathBuf,

        /// Directory of biometric-update CSV files
        #[arg(long, default_value = "datasets/biometric")]
        biometric_dir: PathBuf,

        /// Directory to write the output tables to
        #[arg(short, long, default_value = "out")]
        output_dir: PathBuf,
    },
    /// Re-generate recommendations from a scored or analyzed table
    Recommend {
        /// Path to an existing scored.csv or analyzed.csv
        #[arg(value_name = "SCORED_CSV")]
        input: PathBuf,

        /// Directory to write recommendations.csv to
        #[arg(short, long, default_value = "out")]
        output_dir: PathBuf,

        /// Only recommend for the latest month present
        #[arg(long, default_value_t = false)]
        latest_only: bool,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/aadhaar_pulse.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("aadhaar_pulse.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            enrolment_dir,
            demographic_dir,
            biometric_dir,
            output_dir,
        } => {
            let paths = SourcePaths {
                enrolment: enrolment_dir,
                demographic: demographic_dir,
                biometric: biometric_dir,
            };
            let config = PipelineConfig::default();

            let result = runner::run(&paths, &config)?;
            output::write_all(&output_dir, &result.analyzed, &result.recommendations)?;

            info!(
                rows = result.analyzed.len(),
                anomalies = result.analyzed.iter().filter(|a| a.is_anomaly).count(),
                output_dir = %output_dir.display(),
                "Run finished"
            );
        }
        Commands::Recommend {
            input,
            output_dir,
            latest_only,
        } => {
            let config = PipelineConfig::default();

            let mut scored = output::read_scored_table(&input)?;
            if latest_only {
                scored = latest_month_only(&scored);
            }
            let recommendations = recommend_all(&scored, &config.recommendations);

            std::fs::create_dir_all(&output_dir)?;
            let path = output_dir.join(RECOMMENDATIONS_FILE);
            output::write_recommendations_table(&path, &recommendations)?;

            info!(
                rows = recommendations.len(),
                latest_only,
                path = %path.display(),
                "Recommendations written"
            );
        }
    }

    Ok(())
}
