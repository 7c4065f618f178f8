//! End-to-end processing of one batch.
//!
//! ```text
//! Fetched -> Built -> Derived -> Validated -+-> Persisted (table)
//!                                           +-> Analyzed -> Persisted (summary)
//! ```
//!
//! Only a malformed batch aborts the run. An empty table after validation
//! skips the remaining steps, and a failed write is reported for that
//! artifact alone without undoing earlier writes.

use chrono::NaiveDate;
use serde_json::Value;
use std::fmt;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::analyzers::aggregate::analyze;
use crate::analyzers::types::AnalysisSummary;
use crate::error::Error;
use crate::output::{ArtifactWriter, WriteOutcome};
use crate::parser::build_table;
use crate::transform::{derive_speed, validate_rows};

/// Processing states of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Fetched,
    Built,
    Derived,
    Validated,
    Analyzed,
    Persisted,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Fetched => "fetched",
            Stage::Built => "built",
            Stage::Derived => "derived",
            Stage::Validated => "validated",
            Stage::Analyzed => "analyzed",
            Stage::Persisted => "persisted",
        };
        f.write_str(name)
    }
}

/// A fatal error for one batch, tagged with where it happened.
#[derive(Error, Debug)]
#[error("batch {batch} failed at stage {stage}: {source}")]
pub struct StageError {
    pub batch: String,
    pub stage: Stage,
    #[source]
    pub source: Error,
}

/// What happened to one artifact of a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactStatus {
    Written(String),
    Skipped,
    Failed(String),
}

impl From<crate::error::Result<WriteOutcome>> for ArtifactStatus {
    fn from(result: crate::error::Result<WriteOutcome>) -> Self {
        match result {
            Ok(WriteOutcome::Written(name)) => ArtifactStatus::Written(name),
            Ok(WriteOutcome::Skipped) => ArtifactStatus::Skipped,
            Err(e) => ArtifactStatus::Failed(e.to_string()),
        }
    }
}

/// Outcome of a batch that was not malformed.
#[derive(Debug)]
pub struct BatchReport {
    pub batch: String,
    pub rows_built: usize,
    pub rows_valid: usize,
    pub table: ArtifactStatus,
    pub summary: Option<AnalysisSummary>,
    pub summary_artifact: ArtifactStatus,
}

/// Runs every stage for one wrapped payload and writes its artifacts.
///
/// `date` names the artifacts; callers pass the current UTC date.
///
/// # Errors
///
/// Returns a [`StageError`] only when the payload is malformed. No artifact
/// is written in that case.
#[tracing::instrument(skip(payload, writer))]
pub async fn run_batch(
    batch: &str,
    payload: &Value,
    writer: &ArtifactWriter,
    date: NaiveDate,
) -> Result<BatchReport, StageError> {
    debug!(stage = %Stage::Fetched, "Batch received");

    let table = build_table(payload).map_err(|source| {
        error!(error = %source, "Batch is malformed, aborting");
        StageError {
            batch: batch.to_string(),
            stage: Stage::Built,
            source,
        }
    })?;
    let rows_built = table.len();
    debug!(stage = %Stage::Built, rows = rows_built);

    let table = derive_speed(table);
    debug!(stage = %Stage::Derived);

    let table = validate_rows(table);
    let rows_valid = table.len();
    info!(stage = %Stage::Validated, rows_built, rows_valid, "Batch transformed");

    if table.is_empty() {
        info!("No valid rows in batch, skipping persist and analysis");
        return Ok(BatchReport {
            batch: batch.to_string(),
            rows_built,
            rows_valid,
            table: ArtifactStatus::Skipped,
            summary: None,
            summary_artifact: ArtifactStatus::Skipped,
        });
    }

    let table_status = ArtifactStatus::from(writer.write_table(&table, date).await);
    log_status("table", &table_status);

    let summary = match analyze(&table) {
        Ok(summary) => {
            debug!(stage = %Stage::Analyzed, unique = summary.unique_aircraft_count);
            Some(summary)
        }
        Err(Error::EmptyTable) => None,
        Err(e) => {
            warn!(error = %e, "Analysis failed");
            None
        }
    };

    let summary_status = ArtifactStatus::from(writer.write_summary(summary.as_ref(), date).await);
    log_status("summary", &summary_status);

    Ok(BatchReport {
        batch: batch.to_string(),
        rows_built,
        rows_valid,
        table: table_status,
        summary,
        summary_artifact: summary_status,
    })
}

fn log_status(artifact: &str, status: &ArtifactStatus) {
    match status {
        ArtifactStatus::Written(name) => debug!(stage = %Stage::Persisted, artifact, name = %name),
        ArtifactStatus::Skipped => debug!(artifact, "Artifact skipped"),
        ArtifactStatus::Failed(reason) => error!(artifact, reason = %reason, "Artifact write failed"),
    }
}
