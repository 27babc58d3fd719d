//! Analytics resource: performance metrics (TWR/MWR), return history,
//! per-holding performance, attribution and benchmark comparison.
//!
//! All figures are computed server-side; these models only give the
//! payloads a shape the views can rely on.

use serde::{Deserialize, Serialize};

use super::{ApiClient, ApiError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeWeightedReturn {
    #[serde(default)]
    pub twr: f64,
    #[serde(default)]
    pub twr_percent: f64,
    #[serde(default)]
    pub periods: u32,
    #[serde(default)]
    pub annualized_twr: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoneyWeightedReturn {
    #[serde(default)]
    pub mwr: f64,
    #[serde(default)]
    pub mwr_percent: f64,
    #[serde(default)]
    pub converged: bool,
    #[serde(default)]
    pub cash_flows_count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceSummary {
    #[serde(default)]
    pub period_days: u32,
    pub twr: Option<TimeWeightedReturn>,
    pub mwr: Option<MoneyWeightedReturn>,
    pub simple_return_percent: Option<f64>,
    #[serde(default)]
    pub data_points: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReturnPoint {
    pub timestamp: String,
    #[serde(default)]
    pub cumulative_return_percent: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceHistory {
    #[serde(default)]
    pub data: Vec<ReturnPoint>,
    #[serde(default)]
    pub period_days: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoldingPerformance {
    pub symbol: String,
    #[serde(default)]
    pub period_days: u32,
    #[serde(default)]
    pub return_percent: f64,
    #[serde(default)]
    pub start_value: f64,
    #[serde(default)]
    pub end_value: f64,
    #[serde(default)]
    pub data_points: u32,
}

/// Contribution of one holding (or sector) to overall return
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributionEntry {
    #[serde(alias = "ticker")]
    pub symbol: String,
    #[serde(default)]
    pub weight: f64,
    #[serde(default)]
    pub return_percent: f64,
    #[serde(default)]
    pub contribution: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attribution {
    #[serde(default)]
    pub period_days: u32,
    #[serde(default)]
    pub entries: Vec<AttributionEntry>,
    #[serde(default)]
    pub total_return_percent: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectorAttributionEntry {
    pub sector: String,
    #[serde(default)]
    pub weight: f64,
    #[serde(default)]
    pub return_percent: f64,
    #[serde(default)]
    pub contribution: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectorAttribution {
    #[serde(default)]
    pub period_days: u32,
    #[serde(default)]
    pub entries: Vec<SectorAttributionEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopContributors {
    #[serde(default)]
    pub top_contributors: Vec<AttributionEntry>,
    #[serde(default)]
    pub top_detractors: Vec<AttributionEntry>,
}

/// One point of the benchmark-normalized comparison, both lines indexed
/// to 100 at the start of the period
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonPoint {
    pub timestamp: String,
    #[serde(default)]
    pub portfolio: f64,
    #[serde(default)]
    pub benchmark: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkComparison {
    /// When false the chart must fall back to raw portfolio history
    #[serde(default)]
    pub benchmark_available: bool,
    pub benchmark: Option<String>,
    pub message: Option<String>,
    #[serde(default)]
    pub series: Vec<ComparisonPoint>,
    #[serde(default)]
    pub period_days: u32,
}

impl ApiClient {
    pub async fn performance(&self, days: u32) -> Result<PerformanceSummary, ApiError> {
        self.get_json(
            "/analytics/performance",
            &[("days", days.to_string())],
            "performance",
        )
        .await
    }

    pub async fn performance_history(&self, days: u32) -> Result<PerformanceHistory, ApiError> {
        self.get_json(
            "/analytics/performance/history",
            &[("days", days.to_string())],
            "performance history",
        )
        .await
    }

    pub async fn holding_performance(
        &self,
        symbol: &str,
        days: u32,
    ) -> Result<HoldingPerformance, ApiError> {
        self.get_json(
            &format!("/analytics/holdings/{symbol}/performance"),
            &[("days", days.to_string())],
            "holding performance",
        )
        .await
    }

    pub async fn attribution(&self, days: u32) -> Result<Attribution, ApiError> {
        self.get_json(
            "/analytics/attribution",
            &[("days", days.to_string())],
            "attribution",
        )
        .await
    }

    pub async fn sector_attribution(&self, days: u32) -> Result<SectorAttribution, ApiError> {
        self.get_json(
            "/analytics/attribution/sectors",
            &[("days", days.to_string())],
            "sector attribution",
        )
        .await
    }

    pub async fn top_contributors(&self, days: u32, limit: u32) -> Result<TopContributors, ApiError> {
        self.get_json(
            "/analytics/top-contributors",
            &[("days", days.to_string()), ("limit", limit.to_string())],
            "top contributors",
        )
        .await
    }

    pub async fn benchmark_comparison(
        &self,
        days: u32,
        benchmark: &str,
    ) -> Result<BenchmarkComparison, ApiError> {
        self.get_json(
            "/analytics/benchmark-comparison",
            &[
                ("days", days.to_string()),
                ("benchmark", benchmark.to_string()),
            ],
            "benchmark comparison",
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comparison_defaults_to_unavailable() {
        let comparison: BenchmarkComparison =
            serde_json::from_str(r#"{"message": "no benchmark data"}"#).unwrap();
        assert!(!comparison.benchmark_available);
        assert!(comparison.series.is_empty());
    }

    #[test]
    fn test_attribution_entry_accepts_ticker_alias() {
        let entry: AttributionEntry =
            serde_json::from_str(r#"{"ticker": "MSFT", "contribution": 1.2}"#).unwrap();
        assert_eq!(entry.symbol, "MSFT");
        assert_eq!(entry.contribution, 1.2);
    }
}
