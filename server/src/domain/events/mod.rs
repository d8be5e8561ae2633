//! GenAI event conversion from OTLP log records
//!
//! Scans the same `LogRecord` stream as the logs converter but emits a
//! record only for recognised GenAI event names; everything else is left to
//! the logs converter. Numeric attributes parse tolerantly so one malformed
//! producer cannot poison a batch.

use std::collections::HashMap;

use opentelemetry_proto::tonic::collector::logs::v1::ExportLogsServiceRequest;

use crate::core::constants;
use crate::data::types::{GenAIEventRecord, TelemetryEventRequest, TelemetryPayload};
use crate::utils::otlp::extract_attributes;

/// Convert the GenAI events of an OTLP logs export into telemetry events.
///
/// Log records whose `event.name` attribute is not a recognised GenAI event
/// are ignored here.
pub fn convert_genai_events(
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

        for scope_logs in &resource_logs.scope_logs {
            for log_record in &scope_logs.log_records {
                let attrs = extract_attributes(&log_record.attributes);
                let Some(event_name) = recognised_event_name(&attrs) else {
                    continue;
                };

                let record = convert_event(
                    log_record,
                    event_name,
                    &attrs,
                    &resource_attrs,
                    project_id,
                );
                events.push(TelemetryEventRequest::wrap(TelemetryPayload::GenAiEvent(
                    record,
                )));
            }
        }
    }

    events
}

/// Match the `event.name` attribute against the recognised GenAI events.
fn recognised_event_name(attrs: &HashMap<String, String>) -> Option<&'static str> {
    match attrs.get(constants::EVENT_NAME_ATTR).map(String::as_str) {
        Some(constants::EVENT_INFERENCE_DETAILS) => Some(constants::EVENT_INFERENCE_DETAILS),
        Some(constants::EVENT_EVALUATION_RESULT) => Some(constants::EVENT_EVALUATION_RESULT),
        _ => None,
    }
}

fn convert_event(
    log_record: &opentelemetry_proto::tonic::logs::v1::LogRecord,
    event_name: &str,
    attrs: &HashMap<String, String>,
    resource_attrs: &HashMap<String, String>,
    project_id: &str,
) -> GenAIEventRecord {
    let timestamp_ns = if log_record.time_unix_nano > 0 {
        log_record.time_unix_nano
    } else {
        log_record.observed_time_unix_nano
    };

    let is_evaluation = event_name == constants::EVENT_EVALUATION_RESULT;

    GenAIEventRecord {
        timestamp_ns,
        event_name: event_name.to_string(),
        trace_id: hex::encode(&log_record.trace_id),
        span_id: hex::encode(&log_record.span_id),
        operation_name: attr(attrs, constants::GEN_AI_OPERATION_NAME),
        model_name: attr(attrs, constants::GEN_AI_REQUEST_MODEL),
        provider_name: attr(attrs, constants::GEN_AI_SYSTEM),
        input_messages: attr(attrs, constants::GEN_AI_INPUT_MESSAGES),
        output_messages: attr(attrs, constants::GEN_AI_OUTPUT_MESSAGES),
        input_tokens: parse_or_zero(attrs, constants::GEN_AI_USAGE_INPUT_TOKENS),
        output_tokens: parse_or_zero(attrs, constants::GEN_AI_USAGE_OUTPUT_TOKENS),
        temperature: parse_opt(attrs, constants::GEN_AI_REQUEST_TEMPERATURE),
        top_p: parse_opt(attrs, constants::GEN_AI_REQUEST_TOP_P),
        max_tokens: parse_opt(attrs, constants::GEN_AI_REQUEST_MAX_TOKENS),
        finish_reasons: parse_finish_reasons(attrs),
        response_id: attr(attrs, constants::GEN_AI_RESPONSE_ID),
        evaluation_name: is_evaluation
            .then(|| attrs.get(constants::GEN_AI_EVALUATION_NAME).cloned())
            .flatten(),
        evaluation_label: is_evaluation
            .then(|| attrs.get(constants::GEN_AI_EVALUATION_LABEL).cloned())
            .flatten(),
        evaluation_score: is_evaluation
            .then(|| parse_opt(attrs, constants::GEN_AI_EVALUATION_SCORE))
            .flatten(),
        evaluation_explanation: is_evaluation
            .then(|| attrs.get(constants::GEN_AI_EVALUATION_EXPLANATION).cloned())
            .flatten(),
        project_id: project_id.to_string(),
        user_id: attrs
            .get(constants::BROKLE_USER_ID)
            .or_else(|| resource_attrs.get(constants::USER_ID))
            .cloned()
            .unwrap_or_default(),
        session_id: attrs
            .get(constants::BROKLE_SESSION_ID)
            .or_else(|| attrs.get(constants::SESSION_ID))
            .or_else(|| resource_attrs.get(constants::SESSION_ID))
            .cloned()
            .unwrap_or_default(),
    }
}

fn attr(attrs: &HashMap<String, String>, key: &str) -> String {
    attrs.get(key).cloned().unwrap_or_default()
}

/// Parse an unsigned count; absent or malformed values count as zero.
fn parse_or_zero(attrs: &HashMap<String, String>, key: &str) -> u32 {
    attrs.get(key).and_then(|v| v.parse().ok()).unwrap_or(0)
}

/// Parse an optional numeric; absent and malformed values are both None.
fn parse_opt<T: std::str::FromStr>(attrs: &HashMap<String, String>, key: &str) -> Option<T> {
    attrs.get(key).and_then(|v| v.parse().ok())
}

/// Decode the JSON-encoded finish reasons array.
fn parse_finish_reasons(attrs: &HashMap<String, String>) -> Vec<String> {
    let Some(raw) = attrs.get(constants::GEN_AI_RESPONSE_FINISH_REASONS) else {
        return Vec::new();
    };
    match serde_json::from_str(raw) {
        Ok(reasons) => reasons,
        Err(e) => {
            tracing::warn!(
                error = %e,
                raw = %raw,
                "Malformed finish_reasons attribute, defaulting to empty"
            );
            Vec::new()
        }
    }
}

#[cfg(test)]
#[path = "events_tests.rs"]
mod tests;
