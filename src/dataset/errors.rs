//! Dataset loading errors
//!
//! A dataset that fails to load is fatal for the service; these errors
//! surface at startup or reload, never during request processing.

use thiserror::Error;

/// Result type for dataset operations
pub type DatasetResult<T> = Result<T, DatasetError>;

/// Errors raised while loading or checking the CSV dataset
#[derive(Debug, Error)]
pub enum DatasetError {
    /// Underlying CSV read failure (I/O or malformed file)
    #[error("CSV read error: {0}")]
    Csv(#[from] csv::Error),

    /// The file has no header row
    #[error("CSV file has no header row")]
    Empty,

    /// A required column is absent from the header
    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),

    /// A cell failed to parse as its column's type
    #[error("line {line}: invalid value '{value}' in column '{column}'")]
    InvalidCell {
        line: u64,
        column: String,
        value: String,
    },
}
