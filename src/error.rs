//! Error types for the flight snapshot pipeline.

use thiserror::Error;

/// Result type alias for pipeline stage operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the pipeline stages.
///
/// Only batch-level problems are represented here. Row-level oddities
/// (short rows, mistyped positions) are absorbed as absent values by the
/// parser and never surface as errors.
#[derive(Error, Debug)]
pub enum Error {
    /// The raw payload does not have the `[{"states": [...]}]` shape.
    #[error("malformed batch: {0}")]
    MalformedBatch(String),

    /// Aggregation was requested over a table with zero rows.
    #[error("table has no rows to analyze")]
    EmptyTable,

    /// An artifact could not be written to its destination.
    #[error("failed to write artifact {artifact}: {source}")]
    Write {
        artifact: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl Error {
    pub fn write(
        artifact: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Error::Write {
            artifact: artifact.into(),
            source: source.into(),
        }
    }
}
