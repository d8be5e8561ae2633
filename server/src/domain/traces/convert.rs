//! Span conversion from OTLP protobuf
//!
//! Walks `ResourceSpans -> ScopeSpans -> Span`, flattening each span into a
//! `SpanRecord` with resource/scope context extracted once per enclosing
//! level. Spans carrying GenAI usage attributes are priced through the cost
//! calculator; pricing problems never block emission.

use std::collections::HashMap;
use std::str::FromStr;

use opentelemetry_proto::tonic::collector::trace::v1::ExportTraceServiceRequest;
use opentelemetry_proto::tonic::common::v1::KeyValue;
use rust_decimal::Decimal;

use crate::core::constants;
use crate::data::types::{SpanRecord, TelemetryEventRequest, TelemetryPayload};
use crate::domain::pricing::{CostCalculator, CostInput};
use crate::utils::otlp::extract_attributes;

/// Convert an OTLP trace export into telemetry events, one per span.
///
/// Emission follows protobuf traversal order: resource, scope, span.
pub async fn convert_traces(
    request: &ExportTraceServiceRequest,
    project_id: &str,
    calculator: &CostCalculator,
) -> Vec<TelemetryEventRequest> {
    let mut events = Vec::new();

    for resource_spans in &request.resource_spans {
        let resource_attrs = attributes_of(
            resource_spans
                .resource
                .as_ref()
                .map(|r| r.attributes.as_slice()),
        );
        let service_name = resource_attrs
            .get(constants::SERVICE_NAME)
            .cloned()
            .unwrap_or_default();

        for scope_spans in &resource_spans.scope_spans {
            let scope = scope_spans.scope.as_ref();
            let scope_name = scope.map(|s| s.name.clone()).unwrap_or_default();
            let scope_version = scope.map(|s| s.version.clone()).unwrap_or_default();
            let scope_attrs = attributes_of(scope.map(|s| s.attributes.as_slice()));

            for span in &scope_spans.spans {
                let record = convert_span(
                    span,
                    project_id,
                    &resource_attrs,
                    &scope_attrs,
                    &service_name,
                    &scope_name,
                    &scope_version,
                    calculator,
                )
                .await;
                events.push(TelemetryEventRequest::wrap(TelemetryPayload::Span(record)));
            }
        }
    }

    events
}

/// Extract an attribute map from anything that carries OTLP key-values.
fn attributes_of(attrs: Option<&[KeyValue]>) -> HashMap<String, String> {
    attrs.map(extract_attributes).unwrap_or_default()
}

#[allow(clippy::too_many_arguments)]
async fn convert_span(
    span: &opentelemetry_proto::tonic::trace::v1::Span,
    project_id: &str,
    resource_attrs: &HashMap<String, String>,
    scope_attrs: &HashMap<String, String>,
    service_name: &str,
    scope_name: &str,
    scope_version: &str,
    calculator: &CostCalculator,
) -> SpanRecord {
    // Merge resource, scope, span attributes; later levels win on conflict
    let mut attributes = resource_attrs.clone();
    attributes.extend(scope_attrs.iter().map(|(k, v)| (k.clone(), v.clone())));
    attributes.extend(extract_attributes(&span.attributes));

    let mut record = SpanRecord {
        trace_id: hex::encode(&span.trace_id),
        span_id: hex::encode(&span.span_id),
        parent_span_id: if span.parent_span_id.is_empty() {
            String::new()
        } else {
            hex::encode(&span.parent_span_id)
        },
        project_id: project_id.to_string(),
        name: span.name.clone(),
        kind: span_kind_to_string(span.kind).to_string(),
        start_time_ns: span.start_time_unix_nano,
        end_time_ns: span.end_time_unix_nano,
        status_code: span
            .status
            .as_ref()
            .map(|st| status_code_to_string(st.code))
            .unwrap_or("UNSET")
            .to_string(),
        status_message: span
            .status
            .as_ref()
            .map(|st| st.message.clone())
            .unwrap_or_default(),
        resource_attributes: resource_attrs.clone(),
        scope_name: scope_name.to_string(),
        scope_version: scope_version.to_string(),
        service_name: service_name.to_string(),
        attributes,
        usage_details: HashMap::new(),
        total_cost: None,
    };

    apply_usage_and_cost(&mut record, project_id, calculator).await;

    record
}

/// Price a span from its GenAI usage attributes.
///
/// Only spans carrying `gen_ai.usage.*` token counts are priced. Token
/// attributes parse tolerantly (failure counts as zero).
async fn apply_usage_and_cost(
    record: &mut SpanRecord,
    project_id: &str,
    calculator: &CostCalculator,
) {
    let input_attr = record.attributes.get(constants::GEN_AI_USAGE_INPUT_TOKENS);
    let output_attr = record.attributes.get(constants::GEN_AI_USAGE_OUTPUT_TOKENS);
    if input_attr.is_none() && output_attr.is_none() {
        return;
    }

    let input_tokens: u32 = input_attr.and_then(|v| v.parse().ok()).unwrap_or(0);
    let output_tokens: u32 = output_attr.and_then(|v| v.parse().ok()).unwrap_or(0);

    record.usage_details.insert("input".to_string(), input_tokens);
    record
        .usage_details
        .insert("output".to_string(), output_tokens);

    let input = CostInput {
        project_id: project_id.to_string(),
        model_name: record
            .attributes
            .get(constants::GEN_AI_REQUEST_MODEL)
            .cloned()
            .unwrap_or_default(),
        input_tokens,
        output_tokens,
        cache_hit: attr_is_true(&record.attributes, constants::BROKLE_CACHE_HIT),
        batch_mode: attr_is_true(&record.attributes, constants::BROKLE_BATCH_MODE),
    };

    let breakdown = calculator.calculate_cost(&input).await;
    match Decimal::from_str(&breakdown.total_cost) {
        Ok(total) => record.total_cost = Some(total),
        Err(e) => {
            // Non-fatal: the span still ships, just without a cost
            tracing::warn!(
                error = %e,
                trace_id = %record.trace_id,
                span_id = %record.span_id,
                "Failed to apply cost breakdown to span"
            );
        }
    }
}

fn attr_is_true(attrs: &HashMap<String, String>, key: &str) -> bool {
    attrs.get(key).is_some_and(|v| v == "true")
}

fn span_kind_to_string(kind: i32) -> &'static str {
    match kind {
        1 => "INTERNAL",
        2 => "SERVER",
        3 => "CLIENT",
        4 => "PRODUCER",
        5 => "CONSUMER",
        _ => "UNSPECIFIED",
    }
}

fn status_code_to_string(code: i32) -> &'static str {
    match code {
        1 => "OK",
        2 => "ERROR",
        _ => "UNSET",
    }
}

#[cfg(test)]
#[path = "convert_tests.rs"]
mod tests;
