//! Brokle telemetry ingestion and archival core
//!
//! Converts OTLP submissions (traces, metrics, logs, GenAI events) into
//! strongly-typed columnar records, prices spans from token usage, computes
//! on-demand trace rollups, and archives raw batches to an object store as
//! zstd-compressed Parquet.
//!
//! The transport that receives OTLP requests, the columnar database, the
//! stream producer, and the blob catalogue are external collaborators; this
//! crate reaches them through the traits in [`data`].

pub mod core;
pub mod data;
pub mod domain;
pub mod utils;
