//! Archiving of raw API snapshots before they are transformed.

use chrono::{DateTime, Utc};
use flate2::Compression;
use flate2::write::GzEncoder;
use serde_json::Value;
use std::io::Write;
use tracing::info;

use crate::error::{Error, Result};
use crate::output::{ArtifactSink, WriteOutcome};

/// Name of a raw snapshot: `<prefix>/flights_<YYYY-MM-DD_HH-MM-SS>.json[.gz]`.
pub fn raw_snapshot_name(prefix: &str, now: DateTime<Utc>, gzip: bool) -> String {
    let mut name = format!("flights_{}.json", now.format("%Y-%m-%d_%H-%M-%S"));
    if gzip {
        name.push_str(".gz");
    }
    let prefix = prefix.trim_matches('/');
    if prefix.is_empty() {
        name
    } else {
        format!("{prefix}/{name}")
    }
}

/// Returns the batch object of a wrapped snapshot, i.e. the document the API
/// delivered.
///
/// # Errors
///
/// Returns [`Error::MalformedBatch`] when `snapshot` is not a non-empty list.
pub fn first_batch(snapshot: &Value) -> Result<Value> {
    snapshot
        .as_array()
        .and_then(|items| items.first())
        .cloned()
        .ok_or_else(|| Error::MalformedBatch("snapshot has no batch object".into()))
}

/// Stores the payload exactly as fetched, pretty-printed.
///
/// A null or empty payload is skipped.
pub async fn save_raw_snapshot(
    sink: &dyn ArtifactSink,
    prefix: &str,
    payload: &Value,
    now: DateTime<Utc>,
    gzip: bool,
) -> Result<WriteOutcome> {
    if is_empty_payload(payload) {
        info!("No data to save");
        return Ok(WriteOutcome::Skipped);
    }

    let name = raw_snapshot_name(prefix, now, gzip);
    let json = serde_json::to_vec_pretty(payload).map_err(|e| Error::write(&name, e))?;

    let (body, content_type) = if gzip {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&json).map_err(|e| Error::write(&name, e))?;
        let compressed = encoder.finish().map_err(|e| Error::write(&name, e))?;
        (compressed, "application/gzip")
    } else {
        (json, "application/json")
    };

    sink.put(&name, body, content_type).await?;
    info!(location = %sink.location(&name), "Raw snapshot saved");
    Ok(WriteOutcome::Written(name))
}

fn is_empty_payload(payload: &Value) -> bool {
    match payload {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}
