//! Portfolio resource: summary, holdings, sector allocation, value history
//! and historical snapshots.

use serde::{Deserialize, Serialize};

use super::{ApiClient, ApiError};

/// Headline numbers for the latest snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioSummary {
    #[serde(default)]
    pub total_value: f64,
    #[serde(default)]
    pub total_holdings: u32,
    pub total_gain_loss: Option<f64>,
    pub total_return_percent: Option<f64>,
    pub last_updated: Option<String>,
}

/// One position in the latest snapshot.
///
/// Numeric fields the backend may omit decode as zero so downstream
/// arithmetic never sees `null`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Holding {
    pub symbol: String,
    pub company_name: Option<String>,
    #[serde(default)]
    pub quantity: f64,
    #[serde(default)]
    pub last_price: f64,
    #[serde(default)]
    pub value: f64,
    pub cost_basis: Option<f64>,
    pub gain_loss: Option<f64>,
    pub gain_loss_percent: Option<f64>,
    pub portfolio_weight: Option<f64>,
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub last_updated: Option<String>,
}

impl Holding {
    /// Unrealized gain with an absent value treated as zero
    pub fn gain_loss_or_zero(&self) -> f64 {
        self.gain_loss.unwrap_or(0.0)
    }

    pub fn weight_or_zero(&self) -> f64 {
        self.portfolio_weight.unwrap_or(0.0)
    }

    pub fn sector_label(&self) -> &str {
        self.sector.as_deref().unwrap_or("Unknown")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectorAllocation {
    pub sector: String,
    #[serde(default)]
    pub value: f64,
    #[serde(default)]
    pub percentage: f64,
    #[serde(default)]
    pub holdings_count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryPoint {
    pub timestamp: String,
    #[serde(default)]
    pub total_value: f64,
    pub cumulative_return_percent: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioHistory {
    #[serde(default)]
    pub data: Vec<HistoryPoint>,
    #[serde(default)]
    pub period_days: u32,
    #[serde(default)]
    pub data_points: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub id: i64,
    pub timestamp: String,
    #[serde(default)]
    pub total_value: f64,
}

impl ApiClient {
    pub async fn portfolio_summary(&self) -> Result<PortfolioSummary, ApiError> {
        self.get_json("/portfolio/summary", &[], "portfolio summary")
            .await
    }

    pub async fn holdings(&self, limit: Option<u32>) -> Result<Vec<Holding>, ApiError> {
        let mut query = Vec::new();
        if let Some(limit) = limit {
            query.push(("limit", limit.to_string()));
        }
        self.get_json("/portfolio/holdings", &query, "holdings").await
    }

    pub async fn top_holdings(&self, limit: u32) -> Result<Vec<Holding>, ApiError> {
        self.get_json(
            "/portfolio/top-holdings",
            &[("limit", limit.to_string())],
            "top holdings",
        )
        .await
    }

    pub async fn sector_allocation(&self) -> Result<Vec<SectorAllocation>, ApiError> {
        self.get_json("/portfolio/sectors", &[], "sector allocation")
            .await
    }

    pub async fn portfolio_history(&self, days: u32) -> Result<PortfolioHistory, ApiError> {
        self.get_json(
            "/portfolio/history",
            &[("days", days.to_string())],
            "portfolio history",
        )
        .await
    }

    pub async fn snapshots(&self, limit: u32, days: Option<u32>) -> Result<Vec<Snapshot>, ApiError> {
        let mut query = vec![("limit", limit.to_string())];
        if let Some(days) = days {
            query.push(("days", days.to_string()));
        }
        self.get_json("/snapshots", &query, "snapshots").await
    }

    pub async fn snapshot_holdings(&self, snapshot_id: i64) -> Result<Vec<Holding>, ApiError> {
        self.get_json(
            &format!("/snapshots/{snapshot_id}/holdings"),
            &[],
            "snapshot holdings",
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_holding_defaults_missing_numerics_to_zero() {
        let holding: Holding = serde_json::from_str(r#"{"symbol": "AAPL"}"#).unwrap();
        assert_eq!(holding.quantity, 0.0);
        assert_eq!(holding.value, 0.0);
        assert_eq!(holding.gain_loss_or_zero(), 0.0);
        assert_eq!(holding.weight_or_zero(), 0.0);
        assert_eq!(holding.sector_label(), "Unknown");
    }

    #[test]
    fn test_history_decodes_wrapped_series() {
        let history: PortfolioHistory = serde_json::from_str(
            r#"{"data": [{"timestamp": "2026-08-01T00:00:00", "total_value": 1000.0}],
                "period_days": 90, "data_points": 1}"#,
        )
        .unwrap();
        assert_eq!(history.data.len(), 1);
        assert_eq!(history.data[0].total_value, 1000.0);
        assert!(history.data[0].cumulative_return_percent.is_none());
    }
}
