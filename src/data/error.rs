use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

/// Everything that can go wrong between opening a source file and handing
/// derived views to the UI.
#[derive(Debug, Error)]
pub enum DataError {
    /// The source file does not exist. Fatal for the session.
    #[error("{} not found! Please run the data generator first.", .0.display())]
    SourceNotFound(PathBuf),

    #[error("reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parquet: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("source is missing required column '{0}'")]
    MissingColumn(String),

    #[error("row {line}: {message}")]
    Row { line: usize, message: String },

    /// The source parsed but holds a header and no transactions.
    #[error("{} contains no transactions", .0.display())]
    EmptySource(PathBuf),

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("invalid date range: start {start} is after end {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("date range needs both a start and an end date")]
    IncompleteDateRange,

    /// Raised by stages that need at least one row (e.g. min/max date).
    #[error("no transactions match the current selection")]
    EmptyDataset,
}

impl DataError {
    /// Whether the error means the source could not be read at all, as
    /// opposed to a problem with the current selection.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            DataError::InvalidDateRange { .. }
                | DataError::IncompleteDateRange
                | DataError::EmptyDataset
        )
    }
}
