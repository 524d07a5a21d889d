//! CSV ingestion: per-source loading, schema resolution, and
//! geographic-name normalization.
//!
//! Each source (enrolment, demographic, biometric) is a directory of
//! CSV files that are loaded, concatenated, and cleaned into a single
//! collection of [`loader::CleanedRecord`]s.

pub mod geo;
pub mod loader;
pub mod schema;
