//! Batch aggregation.
//!
//! Turns a validated flight table into an [`types::AnalysisSummary`]:
//! distinct aircraft, mean speed, most frequent origin countries, the
//! bounding box of all positions, and the fastest aircraft.

pub mod aggregate;
pub mod types;
pub mod utility;
