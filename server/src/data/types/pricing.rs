//! Model pricing rows

use serde::{Deserialize, Serialize};

/// Pricing row for a model, loaded by the model repository.
///
/// Rows with a `project_id` shadow globally-scoped rows (`project_id = None`)
/// for that project; the fallback chain lives in the repository lookup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Model {
    pub model_name: String,
    pub provider: String,
    /// Cost per input token (USD)
    pub input_per_token: f64,
    /// Cost per output token (USD)
    pub output_per_token: f64,
    /// Input-cost multiplier applied on cache hits; effective only in (0, 1)
    pub cache_read_multiplier: f64,
    /// Percentage discount on the total for batch-mode requests
    pub batch_discount_percentage: f64,
    /// None for globally-scoped rows
    pub project_id: Option<String>,
}
