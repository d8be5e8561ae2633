//! Data layer
//!
//! The ingestion core owns no database; it reaches external backends
//! through capability traits:
//! - `traits` - repository capabilities (models, traces, blob catalogue)
//! - `storage` - object storage backends for batch archival
//! - `types` - shared record and envelope types
//! - `error` - unified repository error type

pub mod error;
pub mod storage;
pub mod traits;
pub mod types;

pub use error::DataError;
pub use storage::{MemoryStorage, ObjectStorage, ObjectStorageError, S3Storage};
pub use traits::{BlobReferenceRepository, ModelRepository, TraceRepository};
