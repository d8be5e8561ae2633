//! On-demand trace rollups
//!
//! Aggregation is recomputed from stored spans on every call; there is no
//! live trace stitching or cached state.

use std::collections::HashMap;
use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::data::error::DataError;
use crate::data::traits::TraceRepository;
use crate::data::types::SpanRecord;

/// Trace-level rollup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceAggregation {
    pub total_cost: Decimal,
    pub total_tokens: u32,
    pub span_count: usize,
}

/// Computes trace rollups from the span store.
pub struct TraceAggregator {
    traces: Arc<dyn TraceRepository>,
}

impl TraceAggregator {
    pub fn new(traces: Arc<dyn TraceRepository>) -> Self {
        Self { traces }
    }

    /// Aggregate cost, token usage and span count for one trace.
    pub async fn aggregate(&self, trace_id: &str) -> Result<TraceAggregation, DataError> {
        let spans = self.traces.get_spans_by_trace_id(trace_id).await?;
        Ok(aggregate_spans(&spans))
    }

    /// Aggregate a batch of traces.
    ///
    /// A failed span read skips that trace and continues; the returned map
    /// only holds traces that aggregated successfully.
    pub async fn aggregate_batch(
        &self,
        trace_ids: &[String],
    ) -> HashMap<String, TraceAggregation> {
        let mut results = HashMap::with_capacity(trace_ids.len());

        for trace_id in trace_ids {
            match self.aggregate(trace_id).await {
                Ok(aggregation) => {
                    results.insert(trace_id.clone(), aggregation);
                }
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        trace_id = %trace_id,
                        "Skipping trace in batch aggregation"
                    );
                }
            }
        }

        results
    }
}

/// Pure rollup over a trace's spans.
///
/// Costs sum as exact decimals. Token counts come from the
/// `usage_details["total"]` column, falling back to `input + output` for
/// spans without a total.
fn aggregate_spans(spans: &[SpanRecord]) -> TraceAggregation {
    let mut total_cost = Decimal::ZERO;
    let mut total_tokens: u32 = 0;

    for span in spans {
        if let Some(cost) = span.total_cost {
            total_cost += cost;
        }
        let tokens = span.usage_details.get("total").copied().unwrap_or_else(|| {
            let input = span.usage_details.get("input").copied().unwrap_or(0);
            let output = span.usage_details.get("output").copied().unwrap_or(0);
            input.saturating_add(output)
        });
        total_tokens = total_tokens.saturating_add(tokens);
    }

    TraceAggregation {
        total_cost,
        total_tokens,
        span_count: spans.len(),
    }
}
