//! The batch analytics pipeline.
//!
//! Cleaned per-source records are aggregated to district-month
//! granularity, outer-merged into a master table, scored with the
//! weighted stress index, scanned for per-district anomalies, and
//! mapped to intervention recommendations. Every stage is a pure
//! transform of the full dataset; re-running on identical input
//! produces identical output.

pub mod aggregate;
pub mod anomaly;
pub mod recommend;
pub mod runner;
pub mod stress;
pub mod types;
pub mod utility;
