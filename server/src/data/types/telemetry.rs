//! Columnar telemetry records
//!
//! Flat row types emitted by the OTLP converters, one row per span, metric
//! data point, log record, or GenAI event. Attribute maps are canonical
//! string maps; identifiers are lowercase hex with the empty string standing
//! in for absent ids. Array columns are always present, zero-length when
//! empty, never null.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ============================================================================
// SPAN
// ============================================================================

/// Flattened trace span row
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpanRecord {
    pub trace_id: String,
    pub span_id: String,
    /// Empty when the span is a trace root
    pub parent_span_id: String,
    pub project_id: String,
    pub name: String,
    /// Canonical kind string (UNSPECIFIED/INTERNAL/SERVER/CLIENT/PRODUCER/CONSUMER)
    pub kind: String,
    pub start_time_ns: u64,
    pub end_time_ns: u64,
    /// Canonical status string (UNSET/OK/ERROR)
    pub status_code: String,
    pub status_message: String,
    /// Merged resource + scope + span attributes (span wins on conflict)
    pub attributes: HashMap<String, String>,
    pub resource_attributes: HashMap<String, String>,
    pub scope_name: String,
    pub scope_version: String,
    /// Materialised from `resource["service.name"]`
    pub service_name: String,
    /// Token usage by kind (`input`, `output`)
    pub usage_details: HashMap<String, u32>,
    /// Total request cost in USD, None when cost calculation failed
    pub total_cost: Option<Decimal>,
}

// ============================================================================
// METRICS
// ============================================================================

/// Shared envelope carried by every metric data point row
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricBase {
    pub resource_attributes: HashMap<String, String>,
    pub scope_name: String,
    pub scope_version: String,
    pub scope_attributes: HashMap<String, String>,
    pub scope_schema_url: Option<String>,
    pub metric_name: String,
    pub metric_description: String,
    pub metric_unit: String,
    pub attributes: HashMap<String, String>,
    pub start_time_ns: u64,
    pub time_ns: u64,
    pub project_id: String,
}

/// Exemplar columns, parallel arrays of equal length per data point
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExemplarColumns {
    pub exemplars_timestamps: Vec<u64>,
    pub exemplars_values: Vec<f64>,
    /// JSON-object string per exemplar
    pub exemplars_filtered_attributes: Vec<String>,
    pub exemplars_trace_ids: Vec<String>,
    pub exemplars_span_ids: Vec<String>,
}

impl ExemplarColumns {
    pub fn len(&self) -> usize {
        self.exemplars_timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exemplars_timestamps.is_empty()
    }
}

/// Sum metric data point row
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricSumRecord {
    #[serde(flatten)]
    pub base: MetricBase,
    pub value: f64,
    pub aggregation_temporality: super::AggregationTemporality,
    pub is_monotonic: bool,
    #[serde(flatten)]
    pub exemplars: ExemplarColumns,
}

/// Gauge metric data point row
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricGaugeRecord {
    #[serde(flatten)]
    pub base: MetricBase,
    pub value: f64,
    #[serde(flatten)]
    pub exemplars: ExemplarColumns,
}

/// Histogram metric data point row
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricHistogramRecord {
    #[serde(flatten)]
    pub base: MetricBase,
    pub aggregation_temporality: super::AggregationTemporality,
    pub count: u64,
    /// Populated iff `count > 0` or the raw sum is non-zero
    pub sum: Option<f64>,
    /// Populated iff the raw value is non-zero
    pub min: Option<f64>,
    /// Populated iff the raw value is non-zero
    pub max: Option<f64>,
    pub bucket_counts: Vec<u64>,
    pub explicit_bounds: Vec<f64>,
    #[serde(flatten)]
    pub exemplars: ExemplarColumns,
}

/// Exponential histogram metric data point row
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricExponentialHistogramRecord {
    #[serde(flatten)]
    pub base: MetricBase,
    pub aggregation_temporality: super::AggregationTemporality,
    pub count: u64,
    pub sum: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub scale: i32,
    pub zero_count: u64,
    pub positive_offset: i32,
    pub positive_counts: Vec<u64>,
    pub negative_offset: i32,
    pub negative_counts: Vec<u64>,
    #[serde(flatten)]
    pub exemplars: ExemplarColumns,
}

// ============================================================================
// LOG
// ============================================================================

/// Flattened log row
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogRecord {
    pub timestamp_ns: u64,
    pub observed_timestamp_ns: u64,
    pub trace_id: String,
    pub span_id: String,
    pub trace_flags: u32,
    pub severity_text: String,
    pub severity_number: i32,
    pub body: String,
    pub resource_attributes: HashMap<String, String>,
    pub service_name: String,
    pub scope_name: String,
    pub scope_attributes: HashMap<String, String>,
    pub log_attributes: HashMap<String, String>,
    pub project_id: String,
}

// ============================================================================
// GENAI EVENT
// ============================================================================

/// GenAI event row (inference details or evaluation result)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenAIEventRecord {
    pub timestamp_ns: u64,
    pub event_name: String,
    pub trace_id: String,
    pub span_id: String,
    pub operation_name: String,
    pub model_name: String,
    pub provider_name: String,
    pub input_messages: String,
    pub output_messages: String,
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
    pub max_tokens: Option<u32>,
    pub finish_reasons: Vec<String>,
    pub response_id: String,
    // Populated only for gen_ai.evaluation.result
    pub evaluation_name: Option<String>,
    pub evaluation_label: Option<String>,
    pub evaluation_score: Option<f64>,
    pub evaluation_explanation: Option<String>,
    pub project_id: String,
    pub user_id: String,
    pub session_id: String,
}
