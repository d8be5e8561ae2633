//! Domain logic for telemetry ingestion and archival
//!
//! - `traces` - span conversion and on-demand trace rollups
//! - `metrics` - per-data-point metric conversion
//! - `logs` - log record conversion
//! - `events` - GenAI event extraction from log records
//! - `pricing` - cost calculation from token usage
//! - `archive` - Parquet serialisation and object-store archival

pub mod archive;
pub mod events;
pub mod logs;
pub mod metrics;
pub mod pricing;
pub mod traces;
