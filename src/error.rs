//! Error taxonomy for the batch pipeline.
//!
//! Most conditions are absorbed where they occur (missing source
//! directory, zero variance, short history) and surface only as logged
//! counts. The variants here are the ones that stop a run.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// All three sources were empty or unreadable. There is nothing to
    /// aggregate, so the run cannot produce any output table.
    #[error("no input data: all three sources were empty or unreadable")]
    NoData,

    /// A file is missing one of the required key columns. The loader
    /// absorbs this per file: the file is skipped, counted, and logged.
    #[error("{path}: missing required column `{column}`")]
    SchemaMismatch { path: PathBuf, column: String },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
