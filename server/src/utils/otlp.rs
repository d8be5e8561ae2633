//! OTLP attribute normalisation
//!
//! Flattens OTLP `AnyValue`/`KeyValue` unions into the canonical string maps
//! used by the columnar records, plus a rich renderer for log bodies that
//! preserves native JSON types.

use std::collections::HashMap;

use opentelemetry_proto::tonic::common::v1::{AnyValue, KeyValue, any_value};
use serde_json::Value as JsonValue;

// ============================================================================
// ATTRIBUTE EXTRACTION
// ============================================================================

/// Extract attributes from a KeyValue array into a string map.
///
/// Entries without a value are skipped; duplicate keys keep the last value.
pub fn extract_attributes(attrs: &[KeyValue]) -> HashMap<String, String> {
    attrs
        .iter()
        .filter_map(|kv| {
            kv.value
                .as_ref()
                .map(|v| (kv.key.clone(), any_value_to_string(v)))
        })
        .collect()
}

/// Convert an AnyValue to its canonical string rendering.
///
/// Scalars render directly (doubles with fixed six-digit precision, bytes as
/// lowercase hex); arrays render as a JSON array of string-rendered elements,
/// kvlists as a JSON object of the recursed map. An unset value renders as
/// the empty string.
pub fn any_value_to_string(value: &AnyValue) -> String {
    match &value.value {
        Some(any_value::Value::StringValue(s)) => s.clone(),
        Some(any_value::Value::IntValue(i)) => i.to_string(),
        Some(any_value::Value::DoubleValue(d)) => format!("{d:.6}"),
        Some(any_value::Value::BoolValue(b)) => b.to_string(),
        Some(any_value::Value::BytesValue(b)) => hex::encode(b),
        Some(any_value::Value::ArrayValue(arr)) => {
            let values: Vec<String> = arr.values.iter().map(any_value_to_string).collect();
            serde_json::to_string(&values).unwrap_or_default()
        }
        Some(any_value::Value::KvlistValue(kvlist)) => {
            serde_json::to_string(&extract_attributes(&kvlist.values)).unwrap_or_default()
        }
        None => String::new(),
    }
}

// ============================================================================
// RICH RENDERING (LOG BODIES)
// ============================================================================

/// Convert an AnyValue to a JSON value, preserving native types.
///
/// Ints, doubles and bools stay numeric/boolean; bytes render as a hex
/// string; arrays and kvlists recurse into JSON arrays/objects.
pub fn any_value_to_json(value: &AnyValue) -> JsonValue {
    match &value.value {
        Some(any_value::Value::StringValue(s)) => JsonValue::String(s.clone()),
        Some(any_value::Value::IntValue(i)) => JsonValue::from(*i),
        Some(any_value::Value::DoubleValue(d)) => {
            serde_json::Number::from_f64(*d).map_or(JsonValue::Null, JsonValue::Number)
        }
        Some(any_value::Value::BoolValue(b)) => JsonValue::Bool(*b),
        Some(any_value::Value::BytesValue(b)) => JsonValue::String(hex::encode(b)),
        Some(any_value::Value::ArrayValue(arr)) => {
            JsonValue::Array(arr.values.iter().map(any_value_to_json).collect())
        }
        Some(any_value::Value::KvlistValue(kvlist)) => {
            let map: serde_json::Map<String, JsonValue> = kvlist
                .values
                .iter()
                .filter_map(|kv| kv.value.as_ref().map(|v| (kv.key.clone(), any_value_to_json(v))))
                .collect();
            JsonValue::Object(map)
        }
        None => JsonValue::Null,
    }
}

/// Render a log body to its stored string form.
///
/// Plain strings pass through untouched and an unset body is the empty
/// string; any other shape is stored as the JSON encoding of the rich value.
pub fn log_body_to_string(body: &AnyValue) -> String {
    match &body.value {
        Some(any_value::Value::StringValue(s)) => s.clone(),
        None => String::new(),
        Some(_) => serde_json::to_string(&any_value_to_json(body)).unwrap_or_default(),
    }
}
