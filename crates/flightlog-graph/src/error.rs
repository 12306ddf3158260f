//! Error types for derivation passes

use thiserror::Error;

/// Errors that can occur while deriving connections or patterns
#[derive(Error, Debug)]
pub enum GraphError {
    /// Storage layer error
    #[error("Storage error: {0}")]
    Store(String),
}
