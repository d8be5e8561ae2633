//! Repository traits for backend capabilities
//!
//! The ingestion core reaches the columnar database and the blob catalogue
//! through these traits; each backend implements them with its own client.
//! All implementations must be thread-safe (Send + Sync) for use in async
//! contexts.

use async_trait::async_trait;

use crate::data::error::DataError;
use crate::data::types::{BlobReference, Model, SpanRecord};

// ============================================================================
// Model Repository Trait
// ============================================================================

/// Read access to model pricing rows.
#[async_trait]
pub trait ModelRepository: Send + Sync {
    /// Look up pricing for a model.
    ///
    /// Resolution is two-level: a row scoped to `project_id` shadows the
    /// globally-scoped row of the same model name. Returns `NotFound` when
    /// neither exists.
    async fn find_by_model_name(
        &self,
        model_name: &str,
        project_id: &str,
    ) -> Result<Model, DataError>;
}

// ============================================================================
// Trace Repository Trait
// ============================================================================

/// Read access to stored spans.
#[async_trait]
pub trait TraceRepository: Send + Sync {
    /// Fetch all spans belonging to a trace.
    async fn get_spans_by_trace_id(&self, trace_id: &str) -> Result<Vec<SpanRecord>, DataError>;
}

// ============================================================================
// Blob Reference Repository Trait
// ============================================================================

/// Write access to the blob-reference catalogue.
#[async_trait]
pub trait BlobReferenceRepository: Send + Sync {
    /// Record an uploaded archive object in the catalogue.
    async fn create_blob_reference(&self, reference: &BlobReference) -> Result<(), DataError>;
}
