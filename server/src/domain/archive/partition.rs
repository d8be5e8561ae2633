//! Partition path generation for archived batches
//!
//! Hive-style layout, bit-stable so partitions are addressable by query
//! engines and by the reconciliation tooling:
//!
//! `{prefix}project_id={pid}/signal={signal}/year={YYYY}/month={MM}/day={DD}/{batch_id}.parquet`

use chrono::{DateTime, Datelike, Utc};

use crate::data::types::SignalType;

/// Generate the object-store path for an archived batch.
///
/// Pure function: the calendar fields come from `timestamp` in UTC,
/// zero-padded; hour and minute never participate.
pub fn generate_s3_path(
    prefix: &str,
    project_id: &str,
    signal_type: SignalType,
    timestamp: DateTime<Utc>,
    batch_id: &str,
) -> String {
    format!(
        "{}project_id={}/signal={}/year={:04}/month={:02}/day={:02}/{}.parquet",
        prefix,
        project_id,
        signal_type.as_str(),
        timestamp.year(),
        timestamp.month(),
        timestamp.day(),
        batch_id
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_generate_s3_path() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 7, 11, 22, 33).unwrap();
        let path = generate_s3_path(
            "archive/",
            "P",
            SignalType::Traces,
            ts,
            "01HQX5T9AVRJ4N4WGBK20VVM5Z",
        );

        assert_eq!(
            path,
            "archive/project_id=P/signal=traces/year=2024/month=03/day=07/01HQX5T9AVRJ4N4WGBK20VVM5Z.parquet"
        );
    }

    #[test]
    fn test_path_is_deterministic() {
        let ts = Utc.with_ymd_and_hms(2025, 12, 31, 0, 0, 0).unwrap();
        let a = generate_s3_path("", "proj", SignalType::Logs, ts, "b1");
        let b = generate_s3_path("", "proj", SignalType::Logs, ts, "b1");
        assert_eq!(a, b);
    }

    #[test]
    fn test_hour_and_minute_are_irrelevant() {
        let morning = Utc.with_ymd_and_hms(2024, 3, 7, 0, 1, 0).unwrap();
        let night = Utc.with_ymd_and_hms(2024, 3, 7, 23, 59, 59).unwrap();
        assert_eq!(
            generate_s3_path("", "P", SignalType::Metrics, morning, "b"),
            generate_s3_path("", "P", SignalType::Metrics, night, "b"),
        );
    }

    #[test]
    fn test_single_digit_fields_are_zero_padded() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 5, 12, 0, 0).unwrap();
        let path = generate_s3_path("", "P", SignalType::Events, ts, "b");
        assert!(path.contains("month=01"));
        assert!(path.contains("day=05"));
        assert!(path.contains("signal=events"));
    }

    #[test]
    fn test_empty_prefix() {
        let ts = Utc.with_ymd_and_hms(2024, 6, 15, 8, 0, 0).unwrap();
        let path = generate_s3_path("", "P", SignalType::Traces, ts, "b");
        assert!(path.starts_with("project_id=P/"));
    }
}
