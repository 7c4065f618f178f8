use anyhow::{Context, Result};
use serde::Deserialize;

/// An S3 event notification, as delivered to a function triggered by an
/// object upload. Only the fields we route on are modelled.
#[derive(Debug, Deserialize)]
pub struct S3Event {
    #[serde(rename = "Records", default)]
    pub records: Vec<S3EventRecord>,
}

#[derive(Debug, Deserialize)]
pub struct S3EventRecord {
    pub s3: S3Entity,
}

#[derive(Debug, Deserialize)]
pub struct S3Entity {
    pub bucket: S3Bucket,
    pub object: S3Object,
}

#[derive(Debug, Deserialize)]
pub struct S3Bucket {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct S3Object {
    pub key: String,
}

/// Bucket and key of the object that triggered an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectRef {
    pub bucket: String,
    pub key: String,
}

impl ObjectRef {
    /// Raw snapshots are `.json` objects below `raw_prefix`. Processed
    /// tables and analysis documents written back to the same bucket are
    /// not.
    pub fn is_snapshot(&self, raw_prefix: &str) -> bool {
        let prefix = raw_prefix.trim_matches('/');
        let in_prefix = prefix.is_empty()
            || self
                .key
                .strip_prefix(prefix)
                .is_some_and(|rest| rest.starts_with('/'));
        in_prefix && self.key.ends_with(".json")
    }
}

/// Extracts the object of the first record in an event document.
pub fn parse_event(bytes: &[u8]) -> Result<ObjectRef> {
    let event: S3Event = serde_json::from_slice(bytes).context("event is not an S3 notification")?;
    let record = event
        .records
        .into_iter()
        .next()
        .ok_or_else(|| anyhow::anyhow!("event has no records"))?;

    Ok(ObjectRef {
        bucket: record.s3.bucket.name,
        key: record.s3.object.key,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const EVENT: &str = r#"{
        "Records": [{
            "eventSource": "aws:s3",
            "eventName": "ObjectCreated:Put",
            "s3": {
                "bucket": { "name": "flight-data", "arn": "arn:aws:s3:::flight-data" },
                "object": { "key": "raw_files/flights_2025-03-26_11-30-21.json", "size": 1024 }
            }
        }]
    }"#;

    #[test]
    fn test_parse_event() {
        let object = parse_event(EVENT.as_bytes()).unwrap();

        assert_eq!(object.bucket, "flight-data");
        assert_eq!(object.key, "raw_files/flights_2025-03-26_11-30-21.json");
        assert!(object.is_snapshot("raw_files"));
    }

    fn object(key: &str) -> ObjectRef {
        ObjectRef {
            bucket: "flight-data".into(),
            key: key.into(),
        }
    }

    #[test]
    fn test_written_artifacts_are_not_snapshots() {
        assert!(!object("processed/2025-03-26.csv").is_snapshot("raw_files"));
        assert!(!object("analysis/2025-03-30.json").is_snapshot("raw_files"));
        assert!(!object("raw_files_old/flights.json").is_snapshot("raw_files"));
        assert!(!object("raw_files/flights_2025-03-26.csv").is_snapshot("raw_files"));
    }

    #[test]
    fn test_snapshot_prefix_forms() {
        let raw = object("raw_files/flights_2025-03-26_11-30-21.json");
        assert!(raw.is_snapshot("raw_files/"));
        assert!(raw.is_snapshot(""));
        assert!(!object("analysis/2025-03-30.json").is_snapshot("raw_files/"));
    }

    #[test]
    fn test_event_without_records() {
        assert!(parse_event(br#"{"Records": []}"#).is_err());
        assert!(parse_event(b"{}").is_err());
        assert!(parse_event(b"not json").is_err());
    }
}
