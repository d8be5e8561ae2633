//! Shared data types for the ingestion and archival core
//!
//! - `enums` - signal and temporality classifications
//! - `telemetry` - flat columnar records emitted by the converters
//! - `events` - the telemetry event envelope and payload union
//! - `archive` - raw batch records and archive/catalogue results
//! - `pricing` - model pricing rows

mod archive;
mod enums;
mod events;
mod pricing;
mod telemetry;

pub use archive::{ArchiveBatchResult, BlobReference, RawTelemetryRecord};
pub use enums::{AggregationTemporality, SignalType};
pub use events::{TelemetryEventRequest, TelemetryEventType, TelemetryPayload};
pub use pricing::Model;
pub use telemetry::{
    ExemplarColumns, GenAIEventRecord, LogRecord, MetricBase, MetricExponentialHistogramRecord,
    MetricGaugeRecord, MetricHistogramRecord, MetricSumRecord, SpanRecord,
};
