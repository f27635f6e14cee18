//! Meal nutrition estimation behind a swappable strategy.
//!
//! The strategy is chosen once from configuration and injected through
//! `AppState`. Implementations never fail: whatever happens, the caller gets
//! a complete [`MealAnalysis`] back before anything is persisted.

mod mock;
mod openai;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::EstimatorConfig;
use crate::nutrition::parser::ParsedFoodItem;

pub use mock::MockEstimator;
pub use openai::OpenAiEstimator;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MealAnalysis {
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
    pub fiber_g: f64,
    pub recommendations: Vec<String>,
    /// In `[0, 1]`.
    pub confidence_score: f64,
}

#[async_trait]
pub trait Estimator: Send + Sync {
    async fn estimate(&self, description: &str, foods: &[ParsedFoodItem]) -> MealAnalysis;

    fn name(&self) -> &'static str;
}

pub fn from_config(config: &EstimatorConfig) -> anyhow::Result<Arc<dyn Estimator>> {
    let estimator: Arc<dyn Estimator> = if config.use_external {
        Arc::new(OpenAiEstimator::new(config.clone())?)
    } else {
        Arc::new(MockEstimator)
    };
    info!(estimator = estimator.name(), "nutrition estimator selected");
    Ok(estimator)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(use_external: bool) -> EstimatorConfig {
        EstimatorConfig {
            use_external,
            ..EstimatorConfig::default()
        }
    }

    #[test]
    fn selects_strategy_from_config() {
        assert_eq!(from_config(&config(false)).unwrap().name(), "mock");
        assert_eq!(from_config(&config(true)).unwrap().name(), "openai");
    }
}
