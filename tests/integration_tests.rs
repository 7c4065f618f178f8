use chrono::NaiveDate;
use opensky_flights::analyzers::aggregate::analyze;
use opensky_flights::output::{ArtifactWriter, LocalSink, read_table};
use opensky_flights::parser::{build_table, parse_payload};
use opensky_flights::pipeline::{ArtifactStatus, run_batch};
use opensky_flights::table::COLUMNS;
use opensky_flights::transform::{derive_speed, validate_rows};
use std::fs;

fn fixture() -> serde_json::Value {
    let bytes = include_bytes!("fixtures/states_sample.json");
    parse_payload(bytes).expect("Failed to parse fixture")
}

#[test]
fn test_full_transform_and_analysis() {
    let table = build_table(&fixture()).expect("Failed to build table");
    assert_eq!(table.len(), 7);

    let table = validate_rows(derive_speed(table));
    // abcd12 has no position
    assert_eq!(table.len(), 6);
    assert!(table.iter().all(|r| r.icao24 != "abcd12"));

    let summary = analyze(&table).expect("Failed to analyze");
    assert_eq!(summary.unique_aircraft_count, 6);
    assert_eq!(summary.top_countries[0], ("Germany".to_string(), 2));
    assert_eq!(summary.bounding_box.min_longitude, -74.1676);
    assert_eq!(summary.bounding_box.max_latitude, 53.4341);

    // c0ffee has no velocity, so five rows are ranked
    assert_eq!(summary.fastest_aircraft.len(), 5);
    assert_eq!(summary.fastest_aircraft[0].icao24, "5a7821");
    assert_eq!(summary.fastest_aircraft[4].icao24, "ab1644");
}

#[tokio::test]
async fn test_pipeline_writes_readable_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let writer = ArtifactWriter::new(Box::new(LocalSink::new(dir.path())), "processed", "analysis");
    let date = NaiveDate::from_ymd_opt(2025, 3, 30).unwrap();

    let report = run_batch("states_sample.json", &fixture(), &writer, date)
        .await
        .expect("Pipeline failed");
    assert_eq!(report.table, ArtifactStatus::Written("processed/2025-03-30.csv".into()));

    let csv_path = dir.path().join("processed/2025-03-30.csv");
    let header = fs::read_to_string(&csv_path).unwrap().lines().next().unwrap().to_string();
    assert_eq!(header.split(',').collect::<Vec<_>>(), COLUMNS);

    let back = read_table(fs::File::open(&csv_path).unwrap()).unwrap();
    assert_eq!(back.len(), report.rows_valid);

    let json: serde_json::Value =
        serde_json::from_slice(&fs::read(dir.path().join("analysis/2025-03-30.json")).unwrap()).unwrap();
    for key in [
        "unique_aircraft_count",
        "average_speed_kmh",
        "top_countries",
        "bounding_box",
        "fastest_aircraft",
    ] {
        assert!(json.get(key).is_some(), "missing {key}");
    }
}
