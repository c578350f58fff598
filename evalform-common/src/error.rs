//! Common error types for the evaluation service

use thiserror::Error;

/// Common result type for evaluation operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error taxonomy shared by the library and the HTTP layer
#[derive(Error, Debug)]
pub enum Error {
    /// Submission lacks one or more required fields (client-caused)
    #[error("Missing required fields: {}", missing.join(", "))]
    Validation { missing: Vec<String> },

    /// No record at the requested identifier
    #[error("Not found: {0}")]
    NotFound(String),

    /// Export requested over an empty record set
    #[error("No data available")]
    NoData,

    /// Connectivity, pool or constraint failure in the store (wraps sqlx::Error)
    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// CSV serialization error
    #[error("Export error: {0}")]
    Export(#[from] csv::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// True for conditions the caller caused or should treat as "nothing there"
    pub fn is_client_facing(&self) -> bool {
        matches!(
            self,
            Error::Validation { .. } | Error::NotFound(_) | Error::NoData
        )
    }
}
