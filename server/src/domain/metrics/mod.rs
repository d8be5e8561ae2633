//! Metric domain: per-data-point conversion

mod convert;

pub use convert::convert_metrics;
