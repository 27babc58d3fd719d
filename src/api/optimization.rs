//! Optimization resource: Sharpe-maximizing and minimum-volatility
//! weights, the efficient frontier, Monte Carlo simulation and
//! rebalancing recommendations.
//!
//! These are the most expensive analytics upstream, which is why the
//! query layer gives them the longest staleness window. Failure to
//! optimize (too few holdings, too little history) comes back as
//! `success: false` with a message, not as an HTTP error.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{ApiClient, ApiError};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OptimizationMetrics {
    #[serde(default)]
    pub expected_return: f64,
    #[serde(default)]
    pub volatility: f64,
    #[serde(default)]
    pub sharpe_ratio: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationResult {
    #[serde(default)]
    pub success: bool,
    pub message: Option<String>,
    #[serde(default)]
    pub weights: BTreeMap<String, f64>,
    #[serde(default)]
    pub metrics: OptimizationMetrics,
    #[serde(default)]
    pub tickers: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrontierPoint {
    #[serde(rename = "return", default)]
    pub expected_return: f64,
    #[serde(default)]
    pub volatility: f64,
    #[serde(default)]
    pub sharpe: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EfficientFrontier {
    #[serde(default)]
    pub success: bool,
    pub message: Option<String>,
    #[serde(default)]
    pub frontier: Vec<FrontierPoint>,
    #[serde(default)]
    pub tickers: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimulationStatistics {
    #[serde(default)]
    pub mean: f64,
    #[serde(default)]
    pub median: f64,
    #[serde(default)]
    pub std: f64,
    #[serde(default)]
    pub min: f64,
    #[serde(default)]
    pub max: f64,
    #[serde(default)]
    pub percentile_5: f64,
    #[serde(default)]
    pub percentile_25: f64,
    #[serde(default)]
    pub percentile_75: f64,
    #[serde(default)]
    pub percentile_95: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonteCarloResult {
    #[serde(default)]
    pub success: bool,
    pub message: Option<String>,
    #[serde(default)]
    pub current_value: f64,
    #[serde(default)]
    pub statistics: SimulationStatistics,
    #[serde(default)]
    pub num_simulations: u32,
    #[serde(default)]
    pub time_horizon_days: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RebalanceAction {
    pub ticker: String,
    pub action: String,
    #[serde(default)]
    pub current_weight: f64,
    #[serde(default)]
    pub target_weight: f64,
    #[serde(default)]
    pub difference: f64,
    #[serde(default)]
    pub amount: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RebalancingPlan {
    #[serde(default)]
    pub success: bool,
    pub message: Option<String>,
    #[serde(default)]
    pub current_allocation: BTreeMap<String, f64>,
    #[serde(default)]
    pub optimal_allocation: BTreeMap<String, f64>,
    #[serde(default)]
    pub recommendations: Vec<RebalanceAction>,
    #[serde(default)]
    pub optimal_metrics: OptimizationMetrics,
}

impl ApiClient {
    pub async fn optimize_max_sharpe(&self, days: u32) -> Result<OptimizationResult, ApiError> {
        self.get_json(
            "/optimization/max-sharpe",
            &[("days", days.to_string())],
            "max-sharpe optimization",
        )
        .await
    }

    pub async fn optimize_min_volatility(&self, days: u32) -> Result<OptimizationResult, ApiError> {
        self.get_json(
            "/optimization/min-volatility",
            &[("days", days.to_string())],
            "min-volatility optimization",
        )
        .await
    }

    pub async fn efficient_frontier(
        &self,
        days: u32,
        points: u32,
    ) -> Result<EfficientFrontier, ApiError> {
        self.get_json(
            "/optimization/efficient-frontier",
            &[("days", days.to_string()), ("points", points.to_string())],
            "efficient frontier",
        )
        .await
    }

    pub async fn monte_carlo(
        &self,
        days: u32,
        simulations: u32,
    ) -> Result<MonteCarloResult, ApiError> {
        self.get_json(
            "/optimization/monte-carlo",
            &[
                ("days", days.to_string()),
                ("simulations", simulations.to_string()),
            ],
            "monte carlo",
        )
        .await
    }

    pub async fn rebalancing_plan(&self, days: u32) -> Result<RebalancingPlan, ApiError> {
        self.get_json(
            "/optimization/rebalancing",
            &[("days", days.to_string())],
            "rebalancing plan",
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_data_variant_decodes() {
        let result: OptimizationResult = serde_json::from_str(
            r#"{"success": false, "message": "Insufficient data for optimization", "weights": {}, "metrics": {}}"#,
        )
        .unwrap();
        assert!(!result.success);
        assert!(result.weights.is_empty());
        assert_eq!(result.metrics.sharpe_ratio, 0.0);
    }

    #[test]
    fn test_frontier_point_renames_return_field() {
        let point: FrontierPoint =
            serde_json::from_str(r#"{"return": 0.12, "volatility": 0.18, "sharpe": 0.55}"#).unwrap();
        assert_eq!(point.expected_return, 0.12);
    }
}
