use thiserror::Error;

/// Convenience result type for loading operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// Error type returned when the dataset (or its configuration) cannot be loaded.
///
/// Load failures are fatal for the dashboard: nothing is rendered without a dataset.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "excel")]
    /// Excel ingestion error (feature-gated behind `excel`).
    #[error("excel error: {0}")]
    Excel(#[from] calamine::Error),

    /// CSV ingestion error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// The dashboard configuration file is not valid JSON or has unknown values.
    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),

    /// The input does not conform to the expected schema (missing required columns, etc.).
    #[error("schema mismatch: {message}")]
    SchemaMismatch { message: String },

    /// A value could not be parsed into the required [`crate::types::DataType`].
    #[error("failed to parse value at row {row} column '{column}': {message} (raw='{raw}')")]
    ParseError {
        row: usize,
        column: String,
        raw: String,
        message: String,
    },
}

/// Error type returned by grouped aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AggregateError {
    /// The input dataset has no rows (typically because the filters exclude everything).
    #[error("no rows to aggregate")]
    EmptyDataset,

    /// A group key or metric column is not part of the dataset schema.
    #[error("unknown column '{0}'")]
    UnknownColumn(String),

    /// A (year, month) group key does not name a calendar month.
    #[error("invalid date for group year={year} month={month}")]
    InvalidDate { year: i64, month: i64 },
}
