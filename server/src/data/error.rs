//! Unified error type for the data layer

use thiserror::Error;

/// Error returned by repository operations.
///
/// `NotFound` is distinguished from backend failures so callers that degrade
/// gracefully (the cost calculator) can log the two at different levels.
#[derive(Error, Debug)]
pub enum DataError {
    /// Requested row does not exist
    #[error("not found")]
    NotFound,

    /// Backend failure (connection, query, timeout)
    #[error("backend error: {0}")]
    Backend(String),

    /// Row could not be decoded into its domain type
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl DataError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}
