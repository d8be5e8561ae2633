//! Telemetry event envelope
//!
//! Converters wrap every emitted row in a `TelemetryEventRequest` for the
//! downstream stream producer. The payload is a tagged union of the typed
//! records; consumers match on the tag instead of re-parsing JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::telemetry::{
    GenAIEventRecord, LogRecord, MetricExponentialHistogramRecord, MetricGaugeRecord,
    MetricHistogramRecord, MetricSumRecord, SpanRecord,
};

// ============================================================================
// EVENT TYPE
// ============================================================================

/// Discriminant of a telemetry event payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TelemetryEventType {
    Span,
    MetricSum,
    MetricGauge,
    MetricHistogram,
    MetricExponentialHistogram,
    Log,
    GenAiEvent,
}

impl TelemetryEventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Span => "span",
            Self::MetricSum => "metric_sum",
            Self::MetricGauge => "metric_gauge",
            Self::MetricHistogram => "metric_histogram",
            Self::MetricExponentialHistogram => "metric_exponential_histogram",
            Self::Log => "log",
            Self::GenAiEvent => "gen_ai_event",
        }
    }
}

// ============================================================================
// PAYLOAD UNION
// ============================================================================

/// Typed event payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "record", rename_all = "snake_case")]
pub enum TelemetryPayload {
    Span(SpanRecord),
    MetricSum(MetricSumRecord),
    MetricGauge(MetricGaugeRecord),
    MetricHistogram(MetricHistogramRecord),
    MetricExponentialHistogram(MetricExponentialHistogramRecord),
    Log(LogRecord),
    GenAiEvent(GenAIEventRecord),
}

impl TelemetryPayload {
    pub fn event_type(&self) -> TelemetryEventType {
        match self {
            Self::Span(_) => TelemetryEventType::Span,
            Self::MetricSum(_) => TelemetryEventType::MetricSum,
            Self::MetricGauge(_) => TelemetryEventType::MetricGauge,
            Self::MetricHistogram(_) => TelemetryEventType::MetricHistogram,
            Self::MetricExponentialHistogram(_) => TelemetryEventType::MetricExponentialHistogram,
            Self::Log(_) => TelemetryEventType::Log,
            Self::GenAiEvent(_) => TelemetryEventType::GenAiEvent,
        }
    }
}

/// Render a payload's nanosecond clock as a UTC timestamp.
///
/// Nanoseconds past the signed 64-bit range cannot be real wall-clock times;
/// they collapse to the epoch with a warning rather than panicking.
fn nanos_to_utc(nanos: u64) -> DateTime<Utc> {
    match i64::try_from(nanos) {
        Ok(n) => DateTime::from_timestamp_nanos(n),
        Err(_) => {
            tracing::warn!(nanos, "Timestamp out of range, using epoch");
            DateTime::UNIX_EPOCH
        }
    }
}

// ============================================================================
// ENVELOPE
// ============================================================================

/// One telemetry event bound for the downstream stream producer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryEventRequest {
    pub event_type: TelemetryEventType,
    /// Fresh ULID per event
    pub event_id: String,
    /// The payload's primary time field
    pub timestamp: DateTime<Utc>,
    /// Empty for payloads without trace correlation
    pub trace_id: String,
    pub span_id: String,
    pub payload: TelemetryPayload,
}

impl TelemetryEventRequest {
    /// Wrap a payload, stamping a fresh event id and lifting the payload's
    /// primary time field and trace correlation into the envelope.
    pub fn wrap(payload: TelemetryPayload) -> Self {
        let (timestamp_ns, trace_id, span_id) = match &payload {
            TelemetryPayload::Span(s) => (s.start_time_ns, s.trace_id.clone(), s.span_id.clone()),
            TelemetryPayload::MetricSum(m) => (m.base.time_ns, String::new(), String::new()),
            TelemetryPayload::MetricGauge(m) => (m.base.time_ns, String::new(), String::new()),
            TelemetryPayload::MetricHistogram(m) => (m.base.time_ns, String::new(), String::new()),
            TelemetryPayload::MetricExponentialHistogram(m) => {
                (m.base.time_ns, String::new(), String::new())
            }
            TelemetryPayload::Log(l) => {
                // Collectors may omit the event time; fall back to ingest time
                let ts = if l.timestamp_ns > 0 {
                    l.timestamp_ns
                } else {
                    l.observed_timestamp_ns
                };
                (ts, l.trace_id.clone(), l.span_id.clone())
            }
            TelemetryPayload::GenAiEvent(e) => {
                (e.timestamp_ns, e.trace_id.clone(), e.span_id.clone())
            }
        };

        Self {
            event_type: payload.event_type(),
            event_id: ulid::Ulid::new().to_string(),
            timestamp: nanos_to_utc(timestamp_ns),
            trace_id,
            span_id,
            payload,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_span_lifts_correlation() {
        let span = SpanRecord {
            trace_id: "0102030405060708090a0b0c0d0e0f10".to_string(),
            span_id: "0102030405060708".to_string(),
            start_time_ns: 1_704_067_200_000_000_000,
            ..Default::default()
        };
        let event = TelemetryEventRequest::wrap(TelemetryPayload::Span(span));

        assert_eq!(event.event_type, TelemetryEventType::Span);
        assert_eq!(event.trace_id, "0102030405060708090a0b0c0d0e0f10");
        assert_eq!(event.span_id, "0102030405060708");
        assert_eq!(event.event_id.len(), 26);
        assert_eq!(
            event.timestamp,
            DateTime::from_timestamp_nanos(1_704_067_200_000_000_000)
        );
    }

    #[test]
    fn test_wrap_metric_has_no_correlation() {
        let metric = MetricGaugeRecord {
            base: crate::data::types::MetricBase {
                time_ns: 42,
                ..Default::default()
            },
            ..Default::default()
        };
        let event = TelemetryEventRequest::wrap(TelemetryPayload::MetricGauge(metric));

        assert_eq!(event.event_type, TelemetryEventType::MetricGauge);
        assert_eq!(event.trace_id, "");
        assert_eq!(event.span_id, "");
    }

    #[test]
    fn test_out_of_range_nanos_collapse_to_epoch() {
        assert_eq!(nanos_to_utc(u64::MAX), DateTime::UNIX_EPOCH);
        assert_eq!(nanos_to_utc(0), DateTime::UNIX_EPOCH);
    }

    #[test]
    fn test_event_ids_are_unique() {
        let make = || {
            TelemetryEventRequest::wrap(TelemetryPayload::Log(LogRecord::default())).event_id
        };
        assert_ne!(make(), make());
    }
}
