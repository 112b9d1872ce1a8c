//! Error type for scenario loading and results reporting.

use thiserror::Error;

/// Errors that can occur loading a scenario file or emitting a results
/// report.
#[derive(Debug, Error)]
pub enum IoError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    /// A reference to an id that doesn't exist anywhere in the scenario, an
    /// unknown relation type tag, or a structurally invalid link.
    #[error("invalid dataset: {0}")]
    DatasetInvalid(String),
}

/// Alias for `Result<T, IoError>`.
pub type IoResult<T> = Result<T, IoError>;
