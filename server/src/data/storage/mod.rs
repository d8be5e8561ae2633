//! Object storage backends for batch archival
//!
//! - `s3` - AWS S3 or S3-compatible services
//! - `memory` - in-memory store for tests

mod error;
mod memory;
mod s3;

pub use error::ObjectStorageError;
pub use memory::MemoryStorage;
pub use s3::S3Storage;

use async_trait::async_trait;

/// Trait for object storage backends.
///
/// Uploads are single-shot puts; callers must keep objects under the
/// backend's single-put limit. All implementations must be thread-safe
/// (Send + Sync) for use in async contexts.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Store an object at the given path, overwriting any existing object.
    async fn upload(
        &self,
        path: &str,
        data: &[u8],
        content_type: &str,
    ) -> Result<(), ObjectStorageError>;

    /// Retrieve an object's bytes, or `NotFound`.
    async fn get(&self, path: &str) -> Result<Vec<u8>, ObjectStorageError>;

    /// Check whether an object exists.
    async fn exists(&self, path: &str) -> Result<bool, ObjectStorageError>;
}
