use crate::analyzers::types::{AnalysisSummary, BoundingBox, FastAircraft};
use crate::analyzers::utility::{extrema, mean};
use crate::error::{Error, Result};
use crate::table::{FlightRecord, ValidatedTable};
use std::collections::{HashMap, HashSet};

/// Length of the country and fastest-aircraft rankings.
pub const TOP_N: usize = 5;

/// Aggregates a validated batch into an [`AnalysisSummary`].
///
/// Each statistic is computed independently over the whole table. The
/// average speed covers only rows that carry a speed and is NaN when none
/// do.
///
/// # Errors
///
/// Returns [`Error::EmptyTable`] if the table has no rows.
pub fn analyze(table: &ValidatedTable) -> Result<AnalysisSummary> {
    if table.is_empty() {
        return Err(Error::EmptyTable);
    }

    let unique_aircraft_count = table
        .iter()
        .map(|r| r.icao24.as_str())
        .collect::<HashSet<_>>()
        .len();

    let speeds: Vec<f64> = table.iter().filter_map(|r| r.speed_kmh).collect();
    let average_speed_kmh = mean(&speeds);

    let top_countries = top_countries(table, TOP_N);

    let (min_latitude, max_latitude) =
        extrema(table.iter().filter_map(|r| r.latitude)).ok_or(Error::EmptyTable)?;
    let (min_longitude, max_longitude) =
        extrema(table.iter().filter_map(|r| r.longitude)).ok_or(Error::EmptyTable)?;

    let fastest_aircraft = fastest(table, TOP_N);

    Ok(AnalysisSummary {
        unique_aircraft_count,
        average_speed_kmh,
        top_countries,
        bounding_box: BoundingBox {
            min_latitude,
            max_latitude,
            min_longitude,
            max_longitude,
        },
        fastest_aircraft,
    })
}

/// Counts `origin_country` values and keeps the `n` most frequent.
///
/// Countries with equal counts stay in order of first appearance.
fn top_countries(table: &ValidatedTable, n: usize) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for record in table {
        match index.get(record.origin_country.as_str()) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(record.origin_country.as_str(), counts.len());
                counts.push((record.origin_country.clone(), 1));
            }
        }
    }

    // sort_by is stable, which keeps first-appearance order among ties
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(n);
    counts
}

/// The `n` fastest rows, fastest first. Rows without a speed are not ranked
/// and equal speeds keep table order.
fn fastest(table: &ValidatedTable, n: usize) -> Vec<FastAircraft> {
    let mut ranked: Vec<(&FlightRecord, f64)> = table
        .iter()
        .filter_map(|r| r.speed_kmh.map(|speed| (r, speed)))
        .collect();

    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

    ranked
        .into_iter()
        .take(n)
        .map(|(r, speed_kmh)| FastAircraft {
            icao24: r.icao24.clone(),
            callsign: r.callsign.clone(),
            speed_kmh,
        })
        .collect()
}
