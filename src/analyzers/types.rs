//! Data types produced by the aggregation stage.

use serde::{Serialize, Serializer};

/// Geographic extent covered by a batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoundingBox {
    pub min_latitude: f64,
    pub max_latitude: f64,
    pub min_longitude: f64,
    pub max_longitude: f64,
}

/// One entry of the fastest-aircraft ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FastAircraft {
    pub icao24: String,
    pub callsign: Option<String>,
    pub speed_kmh: f64,
}

/// Summary statistics over one validated batch, written as the analysis
/// artifact.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisSummary {
    pub unique_aircraft_count: usize,
    /// NaN when no row carries a speed; serialized as `null`.
    pub average_speed_kmh: f64,
    /// Most frequent origin countries, most frequent first.
    #[serde(serialize_with = "ordered_map")]
    pub top_countries: Vec<(String, usize)>,
    pub bounding_box: BoundingBox,
    pub fastest_aircraft: Vec<FastAircraft>,
}

// Keeps ranking order in the JSON object instead of sorting by key.
fn ordered_map<S: Serializer>(entries: &[(String, usize)], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_map(entries.iter().map(|(k, v)| (k, v)))
}
