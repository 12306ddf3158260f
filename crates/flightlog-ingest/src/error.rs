//! Error types for manifest ingestion

use crate::stats::{ErrorKind, ImportStats};
use thiserror::Error;

/// A row that could not be turned into a manifest record
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RowParseError {
    /// The row did not match the header layout
    #[error("Malformed row: {0}")]
    Malformed(String),

    /// A required field was empty
    #[error("Missing field: {0}")]
    MissingField(&'static str),

    /// The date matched none of the accepted layouts
    #[error("Could not parse date: '{0}'")]
    InvalidDate(String),
}

/// An entity reference that could not be resolved
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// Code is empty, too long or not alphanumeric
    #[error("Unusable code: '{0}'")]
    InvalidCode(String),

    /// The store failed to load or persist an entity
    #[error("Store error: {0}")]
    Store(String),
}

/// Why a single row was skipped
#[derive(Error, Debug)]
pub enum RowError {
    /// Row failed validation
    #[error(transparent)]
    Parse(#[from] RowParseError),

    /// Departure or arrival could not be resolved
    #[error("Location: {0}")]
    Location(ResolveError),

    /// A passenger could not be resolved
    #[error("Passenger: {0}")]
    Passenger(ResolveError),

    /// The configured aircraft could not be resolved
    #[error("Aircraft: {0}")]
    Aircraft(ResolveError),

    /// The flight and its links could not be written
    #[error("Flight insert failed: {0}")]
    Insert(String),
}

impl RowError {
    /// Breakdown bucket for the import statistics
    pub fn kind(&self) -> ErrorKind {
        match self {
            RowError::Parse(RowParseError::Malformed(_)) => ErrorKind::MalformedRow,
            RowError::Parse(RowParseError::MissingField(_)) => ErrorKind::MissingField,
            RowError::Parse(RowParseError::InvalidDate(_)) => ErrorKind::InvalidDate,
            RowError::Location(_) => ErrorKind::Location,
            RowError::Passenger(_) => ErrorKind::Passenger,
            RowError::Aircraft(_) => ErrorKind::Aircraft,
            RowError::Insert(_) => ErrorKind::FlightInsert,
        }
    }
}

/// Errors that abort an import run
#[derive(Error, Debug)]
pub enum IngestError {
    /// Invalid import configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Reading the source failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The header could not be read
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The header lacks required columns
    #[error("Header is missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// The resolver caches could not be loaded
    #[error("Store error: {0}")]
    Store(String),

    /// A batch commit failed; rows committed earlier are kept
    #[error("Batch commit failed after {} rows: {message}", .stats.rows_read)]
    BatchCommit {
        /// Store error text
        message: String,
        /// Progress up to the failure
        stats: ImportStats,
    },
}
