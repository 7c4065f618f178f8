//! Per-row derivation and validation stages.

use tracing::debug;

use crate::table::{FlightRecord, FlightTable, ValidatedTable};

/// Metres per second to kilometres per hour.
pub const MS_TO_KMH: f64 = 3.6;

/// Fills `speed_kmh` from `velocity_m_s` on every row.
///
/// Rows without a velocity keep `speed_kmh` absent.
pub fn derive_speed(table: FlightTable) -> FlightTable {
    table
        .into_records()
        .into_iter()
        .map(|record| FlightRecord {
            speed_kmh: record.velocity_m_s.map(|v| v * MS_TO_KMH),
            ..record
        })
        .collect()
}

/// Drops rows missing latitude or longitude.
///
/// Dropping is expected for aircraft without a position fix and is not an
/// error. Surviving rows keep their order.
pub fn validate_rows(table: FlightTable) -> ValidatedTable {
    let before = table.len();
    let records: Vec<FlightRecord> = table
        .into_records()
        .into_iter()
        .filter(FlightRecord::has_position)
        .collect();

    debug!(
        kept = records.len(),
        dropped = before - records.len(),
        "Validated flight rows"
    );
    ValidatedTable::from_checked(records)
}
