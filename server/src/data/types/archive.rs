//! Raw batch archival types

use chrono::{DateTime, Utc};
use prost::Message;
use serde::{Deserialize, Serialize};

use super::SignalType;

// ============================================================================
// RAW RECORD
// ============================================================================

/// One raw OTLP submission, archived losslessly alongside the converted rows
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawTelemetryRecord {
    pub record_id: String,
    pub project_id: String,
    pub signal_type: SignalType,
    pub timestamp: DateTime<Utc>,
    /// Raw protobuf bytes of the submitted batch
    pub payload: Vec<u8>,
}

impl RawTelemetryRecord {
    /// Capture a decoded OTLP request as a raw archival record.
    pub fn from_proto<M: Message>(
        project_id: &str,
        signal_type: SignalType,
        timestamp: DateTime<Utc>,
        request: &M,
    ) -> Self {
        Self {
            record_id: ulid::Ulid::new().to_string(),
            project_id: project_id.to_string(),
            signal_type,
            timestamp,
            payload: request.encode_to_vec(),
        }
    }
}

// ============================================================================
// ARCHIVE RESULTS
// ============================================================================

/// Outcome of a successful batch archive
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveBatchResult {
    pub s3_path: String,
    pub bucket_name: String,
    pub record_count: usize,
    pub file_size_bytes: u64,
    pub archived_at: DateTime<Utc>,
}

/// Catalogue entry for an uploaded archive object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlobReference {
    pub id: String,
    pub project_id: String,
    pub entity_type: String,
    pub entity_id: String,
    pub event_id: String,
    pub bucket_name: String,
    pub bucket_path: String,
    pub file_size_bytes: u64,
    pub content_type: String,
    pub compression: String,
    pub created_at: DateTime<Utc>,
}
