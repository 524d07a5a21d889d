//! Batch analytics turning per-district daily enrolment, biometric and
//! demographic transaction counts into a monthly operational stress
//! signal, anomaly flags, and intervention recommendations.

pub mod config;
pub mod error;
pub mod forecast;
pub mod ingest;
pub mod output;
pub mod pipeline;
