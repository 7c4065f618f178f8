//! Parser for OpenSky `states/all` snapshots.
//!
//! The upstream API returns every aircraft as a positional array whose
//! slots mix strings, numbers, booleans and nulls. This module is the only
//! place those arrays are looked at; everything downstream works on
//! [`FlightRecord`].

use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};
use crate::table::{FlightRecord, FlightTable};

/// Version of the position-to-field mapping below.
pub const SCHEMA_VERSION: u8 = 1;

/// Number of leading positions of a state vector that are consumed.
pub const STATE_VECTOR_WIDTH: usize = 11;

/// Key of the row list inside a batch object.
pub const STATES_KEY: &str = "states";

// Positions of the fields we keep. 3 and 4 (time_position, last_contact)
// and 8 (on_ground) are never read.
const ICAO24: usize = 0;
const CALLSIGN: usize = 1;
const ORIGIN_COUNTRY: usize = 2;
const LONGITUDE: usize = 5;
const LATITUDE: usize = 6;
const ALTITUDE_M: usize = 7;
const VELOCITY_M_S: usize = 9;
const HEADING: usize = 10;

/// Decodes raw payload bytes into a JSON value.
///
/// # Errors
///
/// Returns [`Error::MalformedBatch`] if the bytes are not valid JSON.
pub fn parse_payload(bytes: &[u8]) -> Result<Value> {
    serde_json::from_slice(bytes).map_err(|e| Error::MalformedBatch(format!("invalid JSON: {e}")))
}

/// Builds a [`FlightTable`] from a wrapped batch `[{"time": .., "states": [..]}]`.
///
/// # Errors
///
/// Returns [`Error::MalformedBatch`] when the outer list is missing or
/// empty, or when the first element has no `states` list.
pub fn build_table(payload: &Value) -> Result<FlightTable> {
    let rows = states(payload)?;
    let table: FlightTable = rows.iter().map(normalize_row).collect();
    debug!(
        rows = table.len(),
        schema_version = SCHEMA_VERSION,
        "Built flight table"
    );
    Ok(table)
}

fn states(payload: &Value) -> Result<&Vec<Value>> {
    let outer = payload
        .as_array()
        .ok_or_else(|| Error::MalformedBatch("top level is not a list".into()))?;
    let batch = outer
        .first()
        .ok_or_else(|| Error::MalformedBatch("outer list is empty".into()))?;
    let batch = batch
        .as_object()
        .ok_or_else(|| Error::MalformedBatch("batch is not an object".into()))?;
    match batch.get(STATES_KEY) {
        None => Err(Error::MalformedBatch(format!("missing `{STATES_KEY}` key"))),
        Some(Value::Array(rows)) => Ok(rows),
        Some(other) => Err(Error::MalformedBatch(format!(
            "`{STATES_KEY}` is not a list (found {})",
            kind(other)
        ))),
    }
}

/// Converts one raw state vector into a [`FlightRecord`].
///
/// Rows shorter than [`STATE_VECTOR_WIDTH`] read as absent in the missing
/// slots, longer rows are truncated, and a row that is not a list at all
/// reads as entirely absent.
pub fn normalize_row(row: &Value) -> FlightRecord {
    let slots: &[Value] = match row {
        Value::Array(values) => &values[..values.len().min(STATE_VECTOR_WIDTH)],
        _ => &[],
    };
    let at = |idx: usize| slots.get(idx);

    FlightRecord {
        icao24: at(ICAO24).and_then(as_text).unwrap_or_default(),
        callsign: at(CALLSIGN).and_then(as_text),
        origin_country: at(ORIGIN_COUNTRY).and_then(as_text).unwrap_or_default(),
        longitude: at(LONGITUDE).and_then(as_float),
        latitude: at(LATITUDE).and_then(as_float),
        altitude_m: at(ALTITUDE_M).and_then(as_float),
        velocity_m_s: at(VELOCITY_M_S).and_then(as_float),
        heading: at(HEADING).and_then(as_float),
        speed_kmh: None,
    }
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn as_float(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}
