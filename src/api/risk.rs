//! Risk resource: volatility, Sharpe, beta, VaR, max drawdown and the
//! correlation matrix, individually or as one comprehensive report.
//!
//! The backend signals "not enough history" with zeroed metrics and
//! `data_points: 0` (or a `message`), not with an HTTP error; callers
//! render that as an informational banner.

use serde::{Deserialize, Serialize};

use super::{ApiClient, ApiError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Volatility {
    #[serde(default)]
    pub daily_volatility: f64,
    #[serde(default)]
    pub annualized_volatility: f64,
    #[serde(default)]
    pub data_points: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharpeRatio {
    #[serde(default)]
    pub sharpe_ratio: f64,
    #[serde(default)]
    pub annualized_return: f64,
    #[serde(default)]
    pub annualized_volatility: f64,
    #[serde(default)]
    pub risk_free_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Beta {
    #[serde(default)]
    pub beta: f64,
    #[serde(default)]
    pub alpha: f64,
    #[serde(default)]
    pub r_squared: f64,
    #[serde(default)]
    pub correlation: f64,
    #[serde(default)]
    pub data_points: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValueAtRisk {
    #[serde(default)]
    pub var_percent: f64,
    #[serde(default)]
    pub var_amount: f64,
    #[serde(default)]
    pub confidence_level: f64,
    #[serde(default)]
    pub current_value: f64,
    #[serde(default)]
    pub data_points: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaxDrawdown {
    #[serde(default)]
    pub max_drawdown_percent: f64,
    #[serde(default)]
    pub max_drawdown_amount: f64,
    pub peak_date: Option<String>,
    pub trough_date: Option<String>,
    pub recovery_date: Option<String>,
    #[serde(default)]
    pub data_points: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    #[serde(default)]
    pub tickers: Vec<String>,
    #[serde(default)]
    pub matrix: Vec<Vec<f64>>,
    #[serde(default)]
    pub data_points: u32,
    /// Set instead of `matrix` when there is not enough history
    pub message: Option<String>,
}

impl CorrelationMatrix {
    pub fn is_insufficient(&self) -> bool {
        self.matrix.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskReport {
    #[serde(default)]
    pub period_days: u32,
    pub volatility: Option<Volatility>,
    pub sharpe_ratio: Option<SharpeRatio>,
    pub beta: Option<Beta>,
    pub value_at_risk: Option<ValueAtRisk>,
    pub max_drawdown: Option<MaxDrawdown>,
    pub generated_at: Option<String>,
}

impl RiskReport {
    /// True when every section came back without usable history
    pub fn is_insufficient(&self) -> bool {
        self.volatility
            .as_ref()
            .map(|v| v.data_points == 0)
            .unwrap_or(true)
    }
}

impl ApiClient {
    pub async fn risk_report(&self, days: u32) -> Result<RiskReport, ApiError> {
        self.get_json(
            "/risk/comprehensive",
            &[("days", days.to_string())],
            "risk report",
        )
        .await
    }

    pub async fn volatility(&self, days: u32) -> Result<Volatility, ApiError> {
        self.get_json("/risk/volatility", &[("days", days.to_string())], "volatility")
            .await
    }

    pub async fn sharpe_ratio(&self, days: u32) -> Result<SharpeRatio, ApiError> {
        self.get_json("/risk/sharpe", &[("days", days.to_string())], "sharpe ratio")
            .await
    }

    pub async fn beta(&self, days: u32, benchmark: &str) -> Result<Beta, ApiError> {
        self.get_json(
            "/risk/beta",
            &[
                ("days", days.to_string()),
                ("benchmark", benchmark.to_string()),
            ],
            "beta",
        )
        .await
    }

    pub async fn value_at_risk(&self, days: u32, confidence: f64) -> Result<ValueAtRisk, ApiError> {
        self.get_json(
            "/risk/var",
            &[
                ("days", days.to_string()),
                ("confidence", confidence.to_string()),
            ],
            "value at risk",
        )
        .await
    }

    pub async fn max_drawdown(&self, days: u32) -> Result<MaxDrawdown, ApiError> {
        self.get_json(
            "/risk/max-drawdown",
            &[("days", days.to_string())],
            "max drawdown",
        )
        .await
    }

    pub async fn correlation_matrix(&self, days: u32) -> Result<CorrelationMatrix, ApiError> {
        self.get_json(
            "/risk/correlation",
            &[("days", days.to_string())],
            "correlation matrix",
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_report_reads_as_insufficient() {
        let report: RiskReport = serde_json::from_str(r#"{"period_days": 365}"#).unwrap();
        assert!(report.is_insufficient());

        let populated: RiskReport = serde_json::from_str(
            r#"{"period_days": 365,
                "volatility": {"daily_volatility": 1.0, "annualized_volatility": 15.9, "data_points": 200}}"#,
        )
        .unwrap();
        assert!(!populated.is_insufficient());
    }

    #[test]
    fn test_correlation_message_variant() {
        let matrix: CorrelationMatrix = serde_json::from_str(
            r#"{"tickers": ["AAPL"], "matrix": [], "message": "Not enough holdings for correlation analysis"}"#,
        )
        .unwrap();
        assert!(matrix.is_insufficient());
        assert_eq!(matrix.tickers.len(), 1);
    }
}
