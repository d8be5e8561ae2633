//! Batch archival to the object store
//!
//! Serialises raw telemetry batches to Parquet, uploads them under a
//! deterministic Hive-partitioned path, and records each upload in the
//! blob-reference catalogue. The upload is the durability boundary: a failed
//! upload fails the call, a failed catalogue write does not (the catalogue
//! can be reconciled from the object store).

mod error;
mod partition;
mod write;

pub use error::ArchiveError;
pub use partition::generate_s3_path;
pub use write::write_records_parquet;

use std::sync::Arc;

use chrono::Utc;

use crate::core::constants;
use crate::data::storage::ObjectStorage;
use crate::data::traits::BlobReferenceRepository;
use crate::data::types::{ArchiveBatchResult, BlobReference, RawTelemetryRecord};

/// Entity type recorded for archived batches in the blob catalogue
const BLOB_ENTITY_TYPE: &str = "telemetry_batch";

/// Archive configuration
#[derive(Debug, Clone)]
pub struct ArchiveConfig {
    pub bucket_name: String,
    /// Prepended verbatim to partition paths; include a trailing slash
    pub prefix: String,
    /// zstd-scale compression level, clamped to `[1, 22]`
    pub compression_level: i32,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            bucket_name: String::new(),
            prefix: String::new(),
            compression_level: constants::DEFAULT_ARCHIVE_COMPRESSION_LEVEL,
        }
    }
}

/// Archives raw telemetry batches to the object store.
pub struct ArchiveService {
    storage: Arc<dyn ObjectStorage>,
    blobs: Arc<dyn BlobReferenceRepository>,
    config: ArchiveConfig,
}

impl ArchiveService {
    pub fn new(
        storage: Arc<dyn ObjectStorage>,
        blobs: Arc<dyn BlobReferenceRepository>,
        config: ArchiveConfig,
    ) -> Self {
        Self {
            storage,
            blobs,
            config,
        }
    }

    /// Archive one batch of raw records.
    ///
    /// The batch's signal type and partition date come from the first
    /// record. Uploads are single-shot puts; callers keep batches under the
    /// store's single-put limit.
    pub async fn archive_batch(
        &self,
        project_id: &str,
        batch_id: &str,
        records: &[RawTelemetryRecord],
    ) -> Result<ArchiveBatchResult, ArchiveError> {
        let first = records.first().ok_or(ArchiveError::EmptyBatch)?;
        let signal_type = first.signal_type;

        let path = generate_s3_path(
            &self.config.prefix,
            project_id,
            signal_type,
            first.timestamp,
            batch_id,
        );

        let bytes = write_records_parquet(records, self.config.compression_level)?;
        let file_size_bytes = bytes.len() as u64;

        self.storage
            .upload(&path, &bytes, constants::PARQUET_CONTENT_TYPE)
            .await?;

        let archived_at = Utc::now();

        tracing::debug!(
            project_id,
            batch_id,
            signal = %signal_type,
            path = %path,
            records = records.len(),
            bytes = file_size_bytes,
            "Archived telemetry batch"
        );

        let reference = BlobReference {
            id: ulid::Ulid::new().to_string(),
            project_id: project_id.to_string(),
            entity_type: BLOB_ENTITY_TYPE.to_string(),
            entity_id: batch_id.to_string(),
            event_id: first.record_id.clone(),
            bucket_name: self.config.bucket_name.clone(),
            bucket_path: path.clone(),
            file_size_bytes,
            content_type: constants::PARQUET_CONTENT_TYPE.to_string(),
            compression: constants::ARCHIVE_COMPRESSION.to_string(),
            created_at: archived_at,
        };

        // The object is already durable; a catalogue miss is reconcilable
        if let Err(e) = self.blobs.create_blob_reference(&reference).await {
            tracing::warn!(
                error = %e,
                project_id,
                batch_id,
                path = %path,
                "Failed to record blob reference for archived batch"
            );
        }

        Ok(ArchiveBatchResult {
            s3_path: path,
            bucket_name: self.config.bucket_name.clone(),
            record_count: records.len(),
            file_size_bytes,
            archived_at,
        })
    }
}
