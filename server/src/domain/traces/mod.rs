//! Trace domain: span conversion and on-demand rollups

mod aggregate;
mod convert;

pub use aggregate::{TraceAggregation, TraceAggregator};
pub use convert::convert_traces;
