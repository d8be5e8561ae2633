//! Object storage error types

use thiserror::Error;

/// Errors from object store operations
#[derive(Error, Debug)]
pub enum ObjectStorageError {
    #[error("Object not found: {path}")]
    NotFound { path: String },

    #[error("Storage backend error: {0}")]
    Backend(String),
}
