//! Columnar serialisation of raw telemetry batches
//!
//! Produces one Parquet file per call with the `RawTelemetryRecord` field
//! layout and zstd block compression. A fresh buffer is allocated per call;
//! buffers are not pooled.

use std::sync::Arc;

use arrow::array::{ArrayRef, BinaryArray, RecordBatch, StringArray, TimestampNanosecondArray};
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, ZstdLevel};
use parquet::file::properties::WriterProperties;

use super::error::ArchiveError;
use crate::data::types::RawTelemetryRecord;

/// Serialise a batch of raw records into Parquet bytes.
///
/// `compression_level` is clamped to the zstd range `[1, 22]` and bucketed
/// into an effort tier. Empty input is an error.
pub fn write_records_parquet(
    records: &[RawTelemetryRecord],
    compression_level: i32,
) -> Result<Vec<u8>, ArchiveError> {
    if records.is_empty() {
        return Err(ArchiveError::EmptyBatch);
    }

    let batch = records_to_batch(records)?;

    let zstd_level = ZstdLevel::try_new(zstd_level_for(compression_level))
        .map_err(|e| ArchiveError::Parquet(e.to_string()))?;
    let properties = WriterProperties::builder()
        .set_compression(Compression::ZSTD(zstd_level))
        .build();

    let mut buffer = Vec::new();
    let mut writer = ArrowWriter::try_new(&mut buffer, batch.schema(), Some(properties))
        .map_err(|e| ArchiveError::Parquet(e.to_string()))?;
    writer
        .write(&batch)
        .map_err(|e| ArchiveError::Parquet(e.to_string()))?;
    writer
        .close()
        .map_err(|e| ArchiveError::Parquet(e.to_string()))?;

    Ok(buffer)
}

/// Map a compression-level knob to an effort tier's zstd level.
///
/// Clamped to `[1, 22]`, then bucketed: fastest, default, better, best.
fn zstd_level_for(compression_level: i32) -> i32 {
    match compression_level.clamp(1, 22) {
        1 => 1,
        2..=3 => 3,
        4..=9 => 7,
        _ => 11,
    }
}

fn records_to_batch(records: &[RawTelemetryRecord]) -> Result<RecordBatch, ArchiveError> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("record_id", DataType::Utf8, false),
        Field::new("project_id", DataType::Utf8, false),
        Field::new("signal_type", DataType::Utf8, false),
        Field::new(
            "timestamp",
            DataType::Timestamp(TimeUnit::Nanosecond, Some("UTC".into())),
            false,
        ),
        Field::new("payload", DataType::Binary, false),
    ]));

    let record_ids: ArrayRef = Arc::new(StringArray::from_iter_values(
        records.iter().map(|r| r.record_id.as_str()),
    ));
    let project_ids: ArrayRef = Arc::new(StringArray::from_iter_values(
        records.iter().map(|r| r.project_id.as_str()),
    ));
    let signal_types: ArrayRef = Arc::new(StringArray::from_iter_values(
        records.iter().map(|r| r.signal_type.as_str()),
    ));
    let timestamps: ArrayRef = Arc::new(
        TimestampNanosecondArray::from_iter_values(
            records
                .iter()
                .map(|r| r.timestamp.timestamp_nanos_opt().unwrap_or(0)),
        )
        .with_timezone("UTC"),
    );
    let payloads: ArrayRef = Arc::new(BinaryArray::from_iter_values(
        records.iter().map(|r| r.payload.as_slice()),
    ));

    RecordBatch::try_new(
        schema,
        vec![record_ids, project_ids, signal_types, timestamps, payloads],
    )
    .map_err(|e| ArchiveError::Parquet(e.to_string()))
}
