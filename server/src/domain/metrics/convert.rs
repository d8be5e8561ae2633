//! Metric conversion from OTLP protobuf
//!
//! Flattens metrics into one typed record per data point. Gauge, Sum,
//! Histogram and ExponentialHistogram are supported; Summary metrics are
//! legacy and lossy and are dropped with a warning. All array fields are
//! copied into freshly-allocated vectors so downstream mutation cannot race
//! the protobuf buffers.

use std::collections::HashMap;

use opentelemetry_proto::tonic::collector::metrics::v1::ExportMetricsServiceRequest;
use opentelemetry_proto::tonic::metrics::v1::{
    Exemplar, ExponentialHistogramDataPoint, HistogramDataPoint, Metric, NumberDataPoint,
    exemplar, metric::Data, number_data_point,
};

use crate::data::types::{
    AggregationTemporality, ExemplarColumns, MetricBase, MetricExponentialHistogramRecord,
    MetricGaugeRecord, MetricHistogramRecord, MetricSumRecord, TelemetryEventRequest,
    TelemetryPayload,
};
use crate::utils::otlp::extract_attributes;

/// Convert an OTLP metrics export into telemetry events, one per data point.
///
/// Emission follows protobuf traversal order: resource, scope, metric,
/// data point.
pub fn convert_metrics(
    request: &ExportMetricsServiceRequest,
    project_id: &str,
) -> Vec<TelemetryEventRequest> {
    let mut events = Vec::new();

    for resource_metrics in &request.resource_metrics {
        let resource_attrs = resource_metrics
            .resource
            .as_ref()
            .map(|r| extract_attributes(&r.attributes))
            .unwrap_or_default();

        for scope_metrics in &resource_metrics.scope_metrics {
            let scope = scope_metrics.scope.as_ref();
            let scope_ctx = ScopeContext {
                name: scope.map(|s| s.name.clone()).unwrap_or_default(),
                version: scope.map(|s| s.version.clone()).unwrap_or_default(),
                attributes: scope
                    .map(|s| extract_attributes(&s.attributes))
                    .unwrap_or_default(),
                schema_url: (!scope_metrics.schema_url.is_empty())
                    .then(|| scope_metrics.schema_url.clone()),
            };

            for metric in &scope_metrics.metrics {
                convert_metric(&mut events, metric, &resource_attrs, &scope_ctx, project_id);
            }
        }
    }

    events
}

/// Scope-level context extracted once per scope_metrics
struct ScopeContext {
    name: String,
    version: String,
    attributes: HashMap<String, String>,
    schema_url: Option<String>,
}

fn convert_metric(
    events: &mut Vec<TelemetryEventRequest>,
    metric: &Metric,
    resource_attrs: &HashMap<String, String>,
    scope: &ScopeContext,
    project_id: &str,
) {
    let Some(ref data) = metric.data else { return };

    match data {
        Data::Gauge(g) => {
            for dp in &g.data_points {
                let record = MetricGaugeRecord {
                    base: base_for_number_dp(metric, resource_attrs, scope, project_id, dp),
                    value: number_value(dp.value.as_ref(), &metric.name),
                    exemplars: extract_exemplars(&dp.exemplars, &metric.name),
                };
                events.push(TelemetryEventRequest::wrap(TelemetryPayload::MetricGauge(
                    record,
                )));
            }
        }
        Data::Sum(s) => {
            let temporality = AggregationTemporality::from_i32(s.aggregation_temporality);
            for dp in &s.data_points {
                let record = MetricSumRecord {
                    base: base_for_number_dp(metric, resource_attrs, scope, project_id, dp),
                    value: number_value(dp.value.as_ref(), &metric.name),
                    aggregation_temporality: temporality,
                    is_monotonic: s.is_monotonic,
                    exemplars: extract_exemplars(&dp.exemplars, &metric.name),
                };
                events.push(TelemetryEventRequest::wrap(TelemetryPayload::MetricSum(
                    record,
                )));
            }
        }
        Data::Histogram(h) => {
            let temporality = AggregationTemporality::from_i32(h.aggregation_temporality);
            for dp in &h.data_points {
                events.push(TelemetryEventRequest::wrap(
                    TelemetryPayload::MetricHistogram(convert_histogram_dp(
                        metric,
                        resource_attrs,
                        scope,
                        project_id,
                        temporality,
                        dp,
                    )),
                ));
            }
        }
        Data::ExponentialHistogram(eh) => {
            let temporality = AggregationTemporality::from_i32(eh.aggregation_temporality);
            for dp in &eh.data_points {
                events.push(TelemetryEventRequest::wrap(
                    TelemetryPayload::MetricExponentialHistogram(convert_exp_histogram_dp(
                        metric,
                        resource_attrs,
                        scope,
                        project_id,
                        temporality,
                        dp,
                    )),
                ));
            }
        }
        Data::Summary(_) => {
            // Legacy and lossy; one warning per metric
            tracing::warn!(metric = %metric.name, "Dropping unsupported summary metric");
        }
    }
}

// ============================================================================
// DATA POINT CONVERSION
// ============================================================================

fn metric_base(
    metric: &Metric,
    resource_attrs: &HashMap<String, String>,
    scope: &ScopeContext,
    project_id: &str,
    attributes: HashMap<String, String>,
    start_time_ns: u64,
    time_ns: u64,
) -> MetricBase {
    MetricBase {
        resource_attributes: resource_attrs.clone(),
        scope_name: scope.name.clone(),
        scope_version: scope.version.clone(),
        scope_attributes: scope.attributes.clone(),
        scope_schema_url: scope.schema_url.clone(),
        metric_name: metric.name.clone(),
        metric_description: metric.description.clone(),
        metric_unit: metric.unit.clone(),
        attributes,
        start_time_ns,
        time_ns,
        project_id: project_id.to_string(),
    }
}

fn base_for_number_dp(
    metric: &Metric,
    resource_attrs: &HashMap<String, String>,
    scope: &ScopeContext,
    project_id: &str,
    dp: &NumberDataPoint,
) -> MetricBase {
    metric_base(
        metric,
        resource_attrs,
        scope,
        project_id,
        extract_attributes(&dp.attributes),
        dp.start_time_unix_nano,
        dp.time_unix_nano,
    )
}

fn convert_histogram_dp(
    metric: &Metric,
    resource_attrs: &HashMap<String, String>,
    scope: &ScopeContext,
    project_id: &str,
    temporality: AggregationTemporality,
    dp: &HistogramDataPoint,
) -> MetricHistogramRecord {
    let raw_sum = dp.sum.unwrap_or(0.0);
    let raw_min = dp.min.unwrap_or(0.0);
    let raw_max = dp.max.unwrap_or(0.0);

    MetricHistogramRecord {
        base: metric_base(
            metric,
            resource_attrs,
            scope,
            project_id,
            extract_attributes(&dp.attributes),
            dp.start_time_unix_nano,
            dp.time_unix_nano,
        ),
        aggregation_temporality: temporality,
        count: dp.count,
        sum: (dp.count > 0 || raw_sum != 0.0).then_some(raw_sum),
        min: (raw_min != 0.0).then_some(raw_min),
        max: (raw_max != 0.0).then_some(raw_max),
        bucket_counts: dp.bucket_counts.clone(),
        explicit_bounds: dp.explicit_bounds.clone(),
        exemplars: extract_exemplars(&dp.exemplars, &metric.name),
    }
}

fn convert_exp_histogram_dp(
    metric: &Metric,
    resource_attrs: &HashMap<String, String>,
    scope: &ScopeContext,
    project_id: &str,
    temporality: AggregationTemporality,
    dp: &ExponentialHistogramDataPoint,
) -> MetricExponentialHistogramRecord {
    let raw_sum = dp.sum.unwrap_or(0.0);
    let raw_min = dp.min.unwrap_or(0.0);
    let raw_max = dp.max.unwrap_or(0.0);

    // Absent bucket structs flatten to (offset = 0, counts = [])
    let (positive_offset, positive_counts) = dp
        .positive
        .as_ref()
        .map(|b| (b.offset, b.bucket_counts.clone()))
        .unwrap_or((0, Vec::new()));
    let (negative_offset, negative_counts) = dp
        .negative
        .as_ref()
        .map(|b| (b.offset, b.bucket_counts.clone()))
        .unwrap_or((0, Vec::new()));

    MetricExponentialHistogramRecord {
        base: metric_base(
            metric,
            resource_attrs,
            scope,
            project_id,
            extract_attributes(&dp.attributes),
            dp.start_time_unix_nano,
            dp.time_unix_nano,
        ),
        aggregation_temporality: temporality,
        count: dp.count,
        sum: (dp.count > 0 || raw_sum != 0.0).then_some(raw_sum),
        min: (raw_min != 0.0).then_some(raw_min),
        max: (raw_max != 0.0).then_some(raw_max),
        scale: dp.scale,
        zero_count: dp.zero_count,
        positive_offset,
        positive_counts,
        negative_offset,
        negative_counts,
        exemplars: extract_exemplars(&dp.exemplars, &metric.name),
    }
}

// ============================================================================
// VALUE AND EXEMPLAR HELPERS
// ============================================================================

/// Extract a number data point value, widening ints to double.
fn number_value(value: Option<&number_data_point::Value>, metric_name: &str) -> f64 {
    match value {
        Some(number_data_point::Value::AsDouble(d)) => *d,
        Some(number_data_point::Value::AsInt(i)) => *i as f64,
        None => {
            tracing::warn!(metric = %metric_name, "Data point without a value, defaulting to 0");
            0.0
        }
    }
}

fn exemplar_value(value: Option<&exemplar::Value>, metric_name: &str) -> f64 {
    match value {
        Some(exemplar::Value::AsDouble(d)) => *d,
        Some(exemplar::Value::AsInt(i)) => *i as f64,
        None => {
            tracing::warn!(metric = %metric_name, "Exemplar without a value, defaulting to 0");
            0.0
        }
    }
}

/// Render an exemplar id, mapping absent or all-zero ids to the empty string.
fn exemplar_id(bytes: &[u8]) -> String {
    if bytes.iter().all(|b| *b == 0) {
        String::new()
    } else {
        hex::encode(bytes)
    }
}

/// Flatten exemplars into parallel columns of equal length.
fn extract_exemplars(exemplars: &[Exemplar], metric_name: &str) -> ExemplarColumns {
    let mut columns = ExemplarColumns::default();

    for exemplar in exemplars {
        columns.exemplars_timestamps.push(exemplar.time_unix_nano);
        columns
            .exemplars_values
            .push(exemplar_value(exemplar.value.as_ref(), metric_name));
        columns.exemplars_filtered_attributes.push(
            serde_json::to_string(&extract_attributes(&exemplar.filtered_attributes))
                .unwrap_or_default(),
        );
        columns
            .exemplars_trace_ids
            .push(exemplar_id(&exemplar.trace_id));
        columns
            .exemplars_span_ids
            .push(exemplar_id(&exemplar.span_id));
    }

    columns
}

#[cfg(test)]
#[path = "convert_tests.rs"]
mod tests;
