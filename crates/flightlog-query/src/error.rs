//! Error types for the query engine.

use flightlog_domain::FilterError;
use thiserror::Error;

/// Query operation errors
#[derive(Debug, Error)]
pub enum QueryError {
    /// A lookup argument was unusable
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Search filters failed validation
    #[error("Invalid filter: {0}")]
    Filter(#[from] FilterError),

    /// Storage layer error
    #[error("Storage error: {0}")]
    Store(String),
}
