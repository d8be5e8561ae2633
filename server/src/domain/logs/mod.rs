//! Log conversion from OTLP protobuf
//!
//! Each `LogRecord` becomes one flat log row. Bodies keep their native JSON
//! shape through the rich renderer; severity text is derived from the
//! numeric severity when the producer left it empty. No GenAI filtering
//! happens here.

use std::collections::HashMap;

use opentelemetry_proto::tonic::collector::logs::v1::ExportLogsServiceRequest;

use crate::core::constants;
use crate::data::types::{LogRecord, TelemetryEventRequest, TelemetryPayload};
use crate::utils::otlp::{extract_attributes, log_body_to_string};

/// Convert an OTLP logs export into telemetry events, one per log record.
pub fn convert_logs(
    request: &ExportLogsServiceRequest,
    project_id: &str,
) -> Vec<TelemetryEventRequest> {
    let mut events = Vec::new();

    for resource_logs in &request.resource_logs {
        let resource_attrs = resource_logs
            .resource
            .as_ref()
            .map(|r| extract_attributes(&r.attributes))
            .unwrap_or_default();
        let service_name = resource_attrs
            .get(constants::SERVICE_NAME)
            .cloned()
            .unwrap_or_default();

        for scope_logs in &resource_logs.scope_logs {
            let scope = scope_logs.scope.as_ref();
            let scope_name = scope.map(|s| s.name.clone()).unwrap_or_default();
            let scope_attrs = scope
                .map(|s| extract_attributes(&s.attributes))
                .unwrap_or_default();

            for log_record in &scope_logs.log_records {
                let record = convert_log_record(
                    log_record,
                    project_id,
                    &resource_attrs,
                    &service_name,
                    &scope_name,
                    &scope_attrs,
                );
                events.push(TelemetryEventRequest::wrap(TelemetryPayload::Log(record)));
            }
        }
    }

    events
}

fn convert_log_record(
    log_record: &opentelemetry_proto::tonic::logs::v1::LogRecord,
    project_id: &str,
    resource_attrs: &HashMap<String, String>,
    service_name: &str,
    scope_name: &str,
    scope_attrs: &HashMap<String, String>,
) -> LogRecord {
    let severity_text = if log_record.severity_text.is_empty() {
        severity_text_from_number(log_record.severity_number).to_string()
    } else {
        log_record.severity_text.clone()
    };

    LogRecord {
        timestamp_ns: log_record.time_unix_nano,
        observed_timestamp_ns: log_record.observed_time_unix_nano,
        trace_id: hex::encode(&log_record.trace_id),
        span_id: hex::encode(&log_record.span_id),
        trace_flags: log_record.flags,
        severity_text,
        severity_number: log_record.severity_number,
        body: log_record
            .body
            .as_ref()
            .map(log_body_to_string)
            .unwrap_or_default(),
        resource_attributes: resource_attrs.clone(),
        service_name: service_name.to_string(),
        scope_name: scope_name.to_string(),
        scope_attributes: scope_attrs.clone(),
        log_attributes: extract_attributes(&log_record.attributes),
        project_id: project_id.to_string(),
    }
}

/// Fixed severity bucket mapping for producers that only send numbers.
fn severity_text_from_number(severity_number: i32) -> &'static str {
    match severity_number {
        1..=4 => "TRACE",
        5..=8 => "DEBUG",
        9..=12 => "INFO",
        13..=16 => "WARN",
        17..=20 => "ERROR",
        21..=24 => "FATAL",
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opentelemetry_proto::tonic::common::v1::{
        AnyValue, InstrumentationScope, KeyValue, any_value,
    };
    use opentelemetry_proto::tonic::logs::v1::{LogRecord as OtlpLogRecord, ResourceLogs, ScopeLogs};
    use opentelemetry_proto::tonic::resource::v1::Resource;

    fn string_attr(key: &str, value: &str) -> KeyValue {
        KeyValue {
            key: key.to_string(),
            value: Some(AnyValue {
                value: Some(any_value::Value::StringValue(value.to_string())),
            }),
        }
    }

    fn text_body(s: &str) -> Option<AnyValue> {
        Some(AnyValue {
            value: Some(any_value::Value::StringValue(s.to_string())),
        })
    }

    fn request_with(log_records: Vec<OtlpLogRecord>) -> ExportLogsServiceRequest {
        ExportLogsServiceRequest {
            resource_logs: vec![ResourceLogs {
                resource: Some(Resource {
                    attributes: vec![string_attr("service.name", "log-service")],
                    dropped_attributes_count: 0,
                }),
                scope_logs: vec![ScopeLogs {
                    scope: Some(InstrumentationScope {
                        name: "brokle-sdk".to_string(),
                        version: "0.3.0".to_string(),
                        attributes: vec![],
                        dropped_attributes_count: 0,
                    }),
                    log_records,
                    schema_url: String::new(),
                }],
                schema_url: String::new(),
            }],
        }
    }

    fn log_payload(event: &TelemetryEventRequest) -> &LogRecord {
        match &event.payload {
            TelemetryPayload::Log(record) => record,
            other => panic!("expected log payload, got {other:?}"),
        }
    }

    #[test]
    fn test_one_event_per_log_record() {
        let request = request_with(vec![OtlpLogRecord::default(), OtlpLogRecord::default()]);
        let events = convert_logs(&request, "proj_1");
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn test_core_fields() {
        let record = OtlpLogRecord {
            time_unix_nano: 1_709_810_553_000_000_000,
            observed_time_unix_nano: 1_709_810_554_000_000_000,
            severity_number: 9,
            severity_text: "INFO".to_string(),
            body: text_body("request served"),
            attributes: vec![string_attr("http.route", "/v1/chat")],
            trace_id: vec![1; 16],
            span_id: vec![2; 8],
            flags: 1,
            ..Default::default()
        };
        let events = convert_logs(&request_with(vec![record]), "proj_1");
        let log = log_payload(&events[0]);

        assert_eq!(log.timestamp_ns, 1_709_810_553_000_000_000);
        assert_eq!(log.observed_timestamp_ns, 1_709_810_554_000_000_000);
        assert_eq!(log.trace_id, "01".repeat(16));
        assert_eq!(log.span_id, "02".repeat(8));
        assert_eq!(log.trace_flags, 1);
        assert_eq!(log.severity_text, "INFO");
        assert_eq!(log.severity_number, 9);
        assert_eq!(log.body, "request served");
        assert_eq!(log.service_name, "log-service");
        assert_eq!(log.scope_name, "brokle-sdk");
        assert_eq!(log.log_attributes["http.route"], "/v1/chat");
        assert_eq!(log.project_id, "proj_1");
    }

    #[test]
    fn test_severity_text_derived_when_empty() {
        for (number, expected) in [
            (1, "TRACE"),
            (4, "TRACE"),
            (5, "DEBUG"),
            (9, "INFO"),
            (13, "WARN"),
            (16, "WARN"),
            (17, "ERROR"),
            (21, "FATAL"),
            (24, "FATAL"),
            (0, ""),
            (25, ""),
        ] {
            let record = OtlpLogRecord {
                severity_number: number,
                ..Default::default()
            };
            let events = convert_logs(&request_with(vec![record]), "proj_1");
            assert_eq!(
                log_payload(&events[0]).severity_text,
                expected,
                "severity_number {number}"
            );
        }
    }

    #[test]
    fn test_producer_severity_text_wins() {
        let record = OtlpLogRecord {
            severity_number: 13,
            severity_text: "warning".to_string(),
            ..Default::default()
        };
        let events = convert_logs(&request_with(vec![record]), "proj_1");
        assert_eq!(log_payload(&events[0]).severity_text, "warning");
    }

    #[test]
    fn test_structured_body_renders_as_json() {
        let body = AnyValue {
            value: Some(any_value::Value::KvlistValue(
                opentelemetry_proto::tonic::common::v1::KeyValueList {
                    values: vec![KeyValue {
                        key: "code".to_string(),
                        value: Some(AnyValue {
                            value: Some(any_value::Value::IntValue(502)),
                        }),
                    }],
                },
            )),
        };
        let record = OtlpLogRecord {
            body: Some(body),
            ..Default::default()
        };
        let events = convert_logs(&request_with(vec![record]), "proj_1");
        assert_eq!(log_payload(&events[0]).body, r#"{"code":502}"#);
    }

    #[test]
    fn test_missing_body_is_empty_string() {
        let events = convert_logs(&request_with(vec![OtlpLogRecord::default()]), "proj_1");
        assert_eq!(log_payload(&events[0]).body, "");
    }

    #[test]
    fn test_envelope_falls_back_to_observed_time() {
        let record = OtlpLogRecord {
            time_unix_nano: 0,
            observed_time_unix_nano: 1_709_810_554_000_000_000,
            ..Default::default()
        };
        let events = convert_logs(&request_with(vec![record]), "proj_1");
        assert_eq!(
            events[0].timestamp,
            chrono::DateTime::from_timestamp_nanos(1_709_810_554_000_000_000)
        );
    }
}
