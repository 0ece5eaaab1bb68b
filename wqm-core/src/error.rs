/// Error types for the input layer of the WQM library.
///
/// Classification itself never fails; these only cover reading records
/// and configuration.
use thiserror::Error;

/// Main error type for WQM operations
#[derive(Error, Debug)]
pub enum WqmError {
    /// Failed to parse CSV data
    #[error("Failed to parse CSV: {0}")]
    CsvParse(#[from] csv::Error),

    /// Failed to parse JSON data
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// JSON parsed but is not an array of objects
    #[error("Unexpected JSON shape: {0}")]
    JsonShape(String),

    /// A record lacks a field it cannot do without
    #[error("Record has no `{0}` field")]
    MissingField(String),

    /// Configuration values are inconsistent
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Type alias for Results using WqmError
pub type Result<T> = std::result::Result<T, WqmError>;
