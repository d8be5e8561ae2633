//! Cost calculation from token usage and model pricing
//!
//! Joins per-request model metadata to the pricing table behind
//! `ModelRepository`. Project-scoped pricing rows shadow global rows; the
//! fallback chain lives in the repository, not here. Pricing problems never
//! fail ingestion: a missing row or a broken pricing backend degrades to a
//! zero-cost breakdown.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::data::traits::ModelRepository;

/// Currency of every breakdown until pricing rows carry their own
const COST_CURRENCY: &str = "USD";

// ============================================================================
// INPUT / OUTPUT
// ============================================================================

/// Per-request cost calculation input
#[derive(Debug, Clone, Default)]
pub struct CostInput {
    pub project_id: String,
    pub model_name: String,
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub cache_hit: bool,
    pub batch_mode: bool,
}

/// Cost breakdown with savings attribution.
///
/// Costs are rendered as strings with exactly nine decimal places because
/// the storage layer keeps them as `Decimal(18,9)`-compatible attribute
/// strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub input_cost: String,
    pub output_cost: String,
    pub total_cost: String,
    pub currency: String,
    pub model_name: String,
    pub provider: String,
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub cache_hit: bool,
    pub batch_mode: bool,
    /// Input cost avoided by the cache-read multiplier, when it applied
    pub cache_savings: Option<f64>,
    /// Total cost avoided by the batch discount, when it applied
    pub batch_savings: Option<f64>,
}

impl CostBreakdown {
    /// Zero-cost breakdown echoing the request metadata.
    fn zero(input: &CostInput) -> Self {
        Self {
            input_cost: format_cost(0.0),
            output_cost: format_cost(0.0),
            total_cost: format_cost(0.0),
            currency: COST_CURRENCY.to_string(),
            model_name: input.model_name.clone(),
            provider: String::new(),
            input_tokens: input.input_tokens,
            output_tokens: input.output_tokens,
            cache_hit: input.cache_hit,
            batch_mode: input.batch_mode,
            cache_savings: None,
            batch_savings: None,
        }
    }
}

/// Render a cost with exactly nine decimal places.
fn format_cost(value: f64) -> String {
    format!("{value:.9}")
}

// ============================================================================
// CALCULATOR
// ============================================================================

/// Stateless cost calculator over a model repository.
///
/// Holds no cache; pricing rows are read per call.
pub struct CostCalculator {
    models: Arc<dyn ModelRepository>,
}

impl CostCalculator {
    pub fn new(models: Arc<dyn ModelRepository>) -> Self {
        Self { models }
    }

    /// Calculate the cost of one request.
    ///
    /// Returns a zero-cost breakdown when there is nothing to price (empty
    /// model name, zero tokens) and when the pricing lookup misses or fails.
    pub async fn calculate_cost(&self, input: &CostInput) -> CostBreakdown {
        if input.model_name.is_empty() || (input.input_tokens == 0 && input.output_tokens == 0) {
            return CostBreakdown::zero(input);
        }

        let model = match self
            .models
            .find_by_model_name(&input.model_name, &input.project_id)
            .await
        {
            Ok(model) => model,
            Err(e) if e.is_not_found() => {
                tracing::debug!(
                    model = %input.model_name,
                    project_id = %input.project_id,
                    "No pricing found for model"
                );
                return CostBreakdown::zero(input);
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    model = %input.model_name,
                    project_id = %input.project_id,
                    "Pricing lookup failed, emitting zero-cost breakdown"
                );
                return CostBreakdown::zero(input);
            }
        };

        let input_tokens = input.input_tokens as f64;
        let output_tokens = input.output_tokens as f64;

        let raw_input_cost = input_tokens * model.input_per_token;

        // Cache-read multiplier is effective only in the open interval (0, 1)
        let cache_applies =
            input.cache_hit && model.cache_read_multiplier > 0.0 && model.cache_read_multiplier < 1.0;
        let input_cost = if cache_applies {
            raw_input_cost * model.cache_read_multiplier
        } else {
            raw_input_cost
        };

        let output_cost = output_tokens * model.output_per_token;
        let subtotal = input_cost + output_cost;

        let batch_applies = input.batch_mode && model.batch_discount_percentage > 0.0;
        let total_cost = if batch_applies {
            subtotal * (1.0 - model.batch_discount_percentage / 100.0)
        } else {
            subtotal
        };

        let cache_savings = cache_applies.then(|| raw_input_cost - input_cost);
        let batch_savings = batch_applies.then(|| subtotal - total_cost);

        tracing::trace!(
            model = %input.model_name,
            total_cost,
            cache_hit = input.cache_hit,
            batch_mode = input.batch_mode,
            "Calculated cost"
        );

        CostBreakdown {
            input_cost: format_cost(input_cost),
            output_cost: format_cost(output_cost),
            total_cost: format_cost(total_cost),
            currency: COST_CURRENCY.to_string(),
            model_name: input.model_name.clone(),
            provider: model.provider.clone(),
            input_tokens: input.input_tokens,
            output_tokens: input.output_tokens,
            cache_hit: input.cache_hit,
            batch_mode: input.batch_mode,
            cache_savings,
            batch_savings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::error::DataError;
    use crate::data::types::Model;
    use async_trait::async_trait;

    /// Fixed pricing table keyed by (model_name, project_id)
    struct StaticModels {
        rows: Vec<Model>,
    }

    #[async_trait]
    impl ModelRepository for StaticModels {
        async fn find_by_model_name(
            &self,
            model_name: &str,
            project_id: &str,
        ) -> Result<Model, DataError> {
            // Project-scoped rows shadow global rows
            self.rows
                .iter()
                .find(|m| {
                    m.model_name == model_name && m.project_id.as_deref() == Some(project_id)
                })
                .or_else(|| {
                    self.rows
                        .iter()
                        .find(|m| m.model_name == model_name && m.project_id.is_none())
                })
                .cloned()
                .ok_or(DataError::NotFound)
        }
    }

    struct BrokenModels;

    #[async_trait]
    impl ModelRepository for BrokenModels {
        async fn find_by_model_name(
            &self,
            _model_name: &str,
            _project_id: &str,
        ) -> Result<Model, DataError> {
            Err(DataError::Backend("connection refused".to_string()))
        }
    }

    fn gpt4o() -> Model {
        Model {
            model_name: "gpt-4o".to_string(),
            provider: "openai".to_string(),
            input_per_token: 0.0000025,
            output_per_token: 0.00001,
            cache_read_multiplier: 0.5,
            batch_discount_percentage: 50.0,
            project_id: None,
        }
    }

    fn calculator(rows: Vec<Model>) -> CostCalculator {
        CostCalculator::new(Arc::new(StaticModels { rows }))
    }

    fn base_input() -> CostInput {
        CostInput {
            project_id: "proj_1".to_string(),
            model_name: "gpt-4o".to_string(),
            input_tokens: 1000,
            output_tokens: 500,
            cache_hit: false,
            batch_mode: false,
        }
    }

    #[tokio::test]
    async fn test_basic_cost() {
        let output = calculator(vec![gpt4o()]).calculate_cost(&base_input()).await;

        assert_eq!(output.input_cost, "0.002500000");
        assert_eq!(output.output_cost, "0.005000000");
        assert_eq!(output.total_cost, "0.007500000");
        assert_eq!(output.currency, "USD");
        assert_eq!(output.provider, "openai");
        assert!(output.cache_savings.is_none());
        assert!(output.batch_savings.is_none());
    }

    #[tokio::test]
    async fn test_cache_hit_applies_multiplier() {
        let input = CostInput {
            cache_hit: true,
            ..base_input()
        };
        let output = calculator(vec![gpt4o()]).calculate_cost(&input).await;

        assert_eq!(output.input_cost, "0.001250000");
        assert_eq!(output.total_cost, "0.006250000");
        let savings = output.cache_savings.expect("cache savings attributed");
        assert!((savings - 0.00125).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_cache_hit_ignores_out_of_range_multiplier() {
        let mut model = gpt4o();
        model.cache_read_multiplier = 1.5;
        let input = CostInput {
            cache_hit: true,
            ..base_input()
        };
        let output = calculator(vec![model]).calculate_cost(&input).await;

        assert_eq!(output.input_cost, "0.002500000");
        assert!(output.cache_savings.is_none());
    }

    #[tokio::test]
    async fn test_batch_mode_applies_discount() {
        let input = CostInput {
            batch_mode: true,
            ..base_input()
        };
        let output = calculator(vec![gpt4o()]).calculate_cost(&input).await;

        assert_eq!(output.total_cost, "0.003750000");
        let savings = output.batch_savings.expect("batch savings attributed");
        assert!((savings - 0.00375).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_unknown_model_is_zero_cost() {
        let input = CostInput {
            model_name: "unknown-model".to_string(),
            ..base_input()
        };
        let output = calculator(vec![gpt4o()]).calculate_cost(&input).await;

        assert_eq!(output.input_cost, "0.000000000");
        assert_eq!(output.output_cost, "0.000000000");
        assert_eq!(output.total_cost, "0.000000000");
        assert_eq!(output.model_name, "unknown-model");
    }

    #[tokio::test]
    async fn test_backend_error_degrades_to_zero_cost() {
        let calculator = CostCalculator::new(Arc::new(BrokenModels));
        let output = calculator.calculate_cost(&base_input()).await;

        assert_eq!(output.total_cost, "0.000000000");
    }

    #[tokio::test]
    async fn test_empty_model_short_circuits() {
        let input = CostInput {
            model_name: String::new(),
            ..base_input()
        };
        let output = calculator(vec![gpt4o()]).calculate_cost(&input).await;

        assert_eq!(output.total_cost, "0.000000000");
    }

    #[tokio::test]
    async fn test_zero_tokens_short_circuits() {
        let input = CostInput {
            input_tokens: 0,
            output_tokens: 0,
            ..base_input()
        };
        let output = calculator(vec![gpt4o()]).calculate_cost(&input).await;

        assert_eq!(output.total_cost, "0.000000000");
    }

    #[tokio::test]
    async fn test_input_only_is_priced() {
        let input = CostInput {
            output_tokens: 0,
            ..base_input()
        };
        let output = calculator(vec![gpt4o()]).calculate_cost(&input).await;

        assert_eq!(output.input_cost, "0.002500000");
        assert_eq!(output.output_cost, "0.000000000");
        assert_eq!(output.total_cost, "0.002500000");
    }

    #[tokio::test]
    async fn test_project_scoped_row_shadows_global() {
        let mut project_row = gpt4o();
        project_row.project_id = Some("proj_1".to_string());
        project_row.input_per_token = 0.000005;

        let output = calculator(vec![gpt4o(), project_row])
            .calculate_cost(&base_input())
            .await;

        assert_eq!(output.input_cost, "0.005000000");
    }

    #[tokio::test]
    async fn test_determinism() {
        let calc = calculator(vec![gpt4o()]);
        let input = base_input();
        let a = calc.calculate_cost(&input).await;
        let b = calc.calculate_cost(&input).await;
        assert_eq!(a.input_cost, b.input_cost);
        assert_eq!(a.output_cost, b.output_cost);
        assert_eq!(a.total_cost, b.total_cost);
    }

    #[test]
    fn test_cost_string_format() {
        assert_eq!(format_cost(0.0), "0.000000000");
        assert_eq!(format_cost(0.0075), "0.007500000");
        assert_eq!(format_cost(-0.5), "-0.500000000");
        // Exactly nine decimal places
        assert!(format_cost(1.23456789012).len() == 11);
    }
}
