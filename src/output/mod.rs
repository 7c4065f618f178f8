//! Artifact persistence for flight tables and analysis summaries.
//!
//! Tables are written as CSV and summaries as pretty-printed JSON, both
//! named by UTC calendar date (`<prefix>/<YYYY-MM-DD>.<ext>`). A second
//! write on the same day replaces the first.

mod local;
mod s3;
mod sink;

pub use local::LocalSink;
pub use s3::{S3Sink, get_object};
pub use sink::ArtifactSink;

use chrono::NaiveDate;
use std::io::Read;
use tracing::info;

use crate::analyzers::types::AnalysisSummary;
use crate::error::{Error, Result};
use crate::table::{COLUMNS, FlightRecord, FlightTable, ValidatedTable};

/// Result of a write that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The artifact was stored under this name.
    Written(String),
    /// There was nothing to write.
    Skipped,
}

/// Builds `<prefix>/<YYYY-MM-DD>.<ext>`, or `<YYYY-MM-DD>.<ext>` without a prefix.
pub fn artifact_name(prefix: &str, date: NaiveDate, ext: &str) -> String {
    let file = format!("{}.{}", date.format("%Y-%m-%d"), ext);
    let prefix = prefix.trim_matches('/');
    if prefix.is_empty() {
        file
    } else {
        format!("{prefix}/{file}")
    }
}

/// Writes tables and summaries to an [`ArtifactSink`].
pub struct ArtifactWriter {
    sink: Box<dyn ArtifactSink>,
    table_prefix: String,
    summary_prefix: String,
}

impl ArtifactWriter {
    pub fn new(
        sink: Box<dyn ArtifactSink>,
        table_prefix: impl Into<String>,
        summary_prefix: impl Into<String>,
    ) -> Self {
        Self {
            sink,
            table_prefix: table_prefix.into(),
            summary_prefix: summary_prefix.into(),
        }
    }

    /// Writes the table as `<table_prefix>/<date>.csv`.
    ///
    /// An empty table is skipped rather than written as a header-only file.
    pub async fn write_table(&self, table: &ValidatedTable, date: NaiveDate) -> Result<WriteOutcome> {
        let name = artifact_name(&self.table_prefix, date, "csv");
        if table.is_empty() {
            info!(artifact = %name, "No rows to save, skipping table artifact");
            return Ok(WriteOutcome::Skipped);
        }

        let body = table_to_csv(table).map_err(|e| Error::write(&name, e))?;
        self.sink.put(&name, body, "text/csv").await?;

        info!(location = %self.sink.location(&name), rows = table.len(), "Table saved");
        Ok(WriteOutcome::Written(name))
    }

    /// Writes the summary as `<summary_prefix>/<date>.json`.
    pub async fn write_summary(
        &self,
        summary: Option<&AnalysisSummary>,
        date: NaiveDate,
    ) -> Result<WriteOutcome> {
        let name = artifact_name(&self.summary_prefix, date, "json");
        let Some(summary) = summary else {
            info!(artifact = %name, "No analysis to save, skipping summary artifact");
            return Ok(WriteOutcome::Skipped);
        };

        let body = serde_json::to_vec_pretty(summary).map_err(|e| Error::write(&name, e))?;
        self.sink.put(&name, body, "application/json").await?;

        info!(location = %self.sink.location(&name), "Analysis saved");
        Ok(WriteOutcome::Written(name))
    }
}

/// Serializes the rows as CSV, headed by [`COLUMNS`].
pub fn table_to_csv(table: &ValidatedTable) -> std::result::Result<Vec<u8>, csv::Error> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(COLUMNS)?;
    for record in table {
        writer.serialize(record)?;
    }
    writer.into_inner().map_err(|e| e.into_error().into())
}

/// Reads a table previously written by [`ArtifactWriter::write_table`].
///
/// Columns are matched by header name; unknown columns (such as a leading
/// index column) are ignored.
pub fn read_table<R: Read>(reader: R) -> anyhow::Result<FlightTable> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut records = Vec::new();

    for result in rdr.deserialize() {
        let record: FlightRecord = result?;
        records.push(record);
    }

    Ok(FlightTable::new(records))
}
