//! Benchmarks resource: configured benchmark indices, their price history
//! and period returns, plus the manual benchmark data sync trigger.

use serde::{Deserialize, Serialize};

use super::{ApiClient, ApiError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Benchmark {
    pub ticker: String,
    pub name: Option<String>,
    #[serde(default)]
    pub active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkPoint {
    pub date: String,
    #[serde(default)]
    pub close: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkData {
    pub ticker: String,
    #[serde(default)]
    pub data: Vec<BenchmarkPoint>,
    #[serde(default)]
    pub data_points: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkReturns {
    pub ticker: String,
    #[serde(default)]
    pub period_days: u32,
    #[serde(default)]
    pub cumulative_return_percent: f64,
    #[serde(default)]
    pub annualized_return_percent: f64,
    #[serde(default)]
    pub data_points: u32,
}

/// Per-ticker record counts from a benchmark data sync
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkSyncResult {
    #[serde(default)]
    pub synced: std::collections::BTreeMap<String, u32>,
}

impl ApiClient {
    pub async fn benchmarks(&self) -> Result<Vec<Benchmark>, ApiError> {
        self.get_json("/benchmarks", &[], "benchmarks").await
    }

    pub async fn benchmark_data(&self, ticker: &str, days: u32) -> Result<BenchmarkData, ApiError> {
        self.get_json(
            &format!("/benchmarks/{ticker}/data"),
            &[("days", days.to_string())],
            "benchmark data",
        )
        .await
    }

    pub async fn benchmark_returns(
        &self,
        ticker: &str,
        days: u32,
    ) -> Result<BenchmarkReturns, ApiError> {
        self.get_json(
            &format!("/benchmarks/{ticker}/returns"),
            &[("days", days.to_string())],
            "benchmark returns",
        )
        .await
    }

    pub async fn sync_benchmarks(&self, days: u32) -> Result<BenchmarkSyncResult, ApiError> {
        self.post_empty(
            "/benchmarks/sync",
            &[("days", days.to_string())],
            "benchmark sync",
        )
        .await
    }
}
