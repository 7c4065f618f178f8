//! Typed flight records and the tables built from them.

use serde::{Deserialize, Serialize};

/// Column names of a persisted flight table, in output order.
pub const COLUMNS: [&str; 9] = [
    "icao24",
    "callsign",
    "origin_country",
    "longitude",
    "latitude",
    "altitude_m",
    "velocity_m_s",
    "heading",
    "speed_kmh",
];

/// One aircraft's normalized state.
///
/// Field order matches [`COLUMNS`]; the CSV writer emits the header from
/// `COLUMNS` and the values in field order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlightRecord {
    pub icao24: String,
    pub callsign: Option<String>,
    pub origin_country: String,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    pub altitude_m: Option<f64>,
    pub velocity_m_s: Option<f64>,
    pub heading: Option<f64>,
    pub speed_kmh: Option<f64>,
}

impl FlightRecord {
    /// A record is usable downstream only when both coordinates are known.
    pub fn has_position(&self) -> bool {
        self.latitude.is_some() && self.longitude.is_some()
    }
}

/// All records of one ingestion batch, in upstream order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlightTable {
    records: Vec<FlightRecord>,
}

impl FlightTable {
    pub fn new(records: Vec<FlightRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[FlightRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<FlightRecord> {
        self.records
    }
}

impl FromIterator<FlightRecord> for FlightTable {
    fn from_iter<I: IntoIterator<Item = FlightRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// A table whose rows all carry latitude and longitude.
///
/// Only [`crate::transform::validate_rows`] constructs one, and it exposes
/// no mutation, so a validated batch stays exactly as validated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidatedTable {
    records: Vec<FlightRecord>,
}

impl ValidatedTable {
    pub(crate) fn from_checked(records: Vec<FlightRecord>) -> Self {
        debug_assert!(records.iter().all(FlightRecord::has_position));
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[FlightRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FlightRecord> {
        self.records.iter()
    }

    /// Gives the rows back as a plain table, e.g. to run them through the
    /// validator again.
    pub fn into_table(self) -> FlightTable {
        FlightTable::new(self.records)
    }
}

impl<'a> IntoIterator for &'a ValidatedTable {
    type Item = &'a FlightRecord;
    type IntoIter = std::slice::Iter<'a, FlightRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
