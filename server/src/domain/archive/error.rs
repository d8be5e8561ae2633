//! Archive error types

use thiserror::Error;

use crate::data::storage::ObjectStorageError;

/// Errors from batch archival
#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("cannot archive an empty batch")]
    EmptyBatch,

    #[error("parquet serialization error: {0}")]
    Parquet(String),

    #[error("object storage error: {0}")]
    Storage(#[from] ObjectStorageError),
}
