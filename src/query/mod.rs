//! Cache-aware query layer between the CLI pages and the HTTP client.
//!
//! Each accessor wraps one backend call behind a cache key built from the
//! resource name and its parameters. Fresh entries are returned
//! immediately; stale entries are served as-is while a deduplicated
//! background refresh runs; misses fetch inline. Network and 5xx failures
//! are retried exactly once — 4xx responses are deterministic and never
//! retried.
//!
//! Mutations never write the cache directly. They invalidate whole
//! resources: transaction writes sweep the transaction list plus every
//! portfolio-derived resource, and a completed sync sweeps the
//! portfolio-derived set (see [`sync`] for how completion is observed).

use std::future::Future;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::api::analytics::{
    Attribution, BenchmarkComparison, HoldingPerformance, PerformanceHistory, PerformanceSummary,
    SectorAttribution, TopContributors,
};
use crate::api::benchmarks::{Benchmark, BenchmarkData, BenchmarkReturns, BenchmarkSyncResult};
use crate::api::optimization::{
    EfficientFrontier, MonteCarloResult, OptimizationResult, RebalancingPlan,
};
use crate::api::portfolio::{
    Holding, PortfolioHistory, PortfolioSummary, SectorAllocation, Snapshot,
};
use crate::api::risk::{
    Beta, CorrelationMatrix, MaxDrawdown, RiskReport, SharpeRatio, ValueAtRisk, Volatility,
};
use crate::api::sync::{HealthStatus, SyncStatus, SyncTriggered};
use crate::api::transactions::{
    ImportReport, NewTransaction, Transaction, TransactionQuery, TransactionSummary,
};
use crate::api::{ApiClient, ApiError};
use crate::cache::{CacheKey, QueryCache, DEFAULT_TTL_SECS, OPTIMIZATION_TTL_SECS, SYNC_STATUS_TTL_SECS};

pub mod sync;

/// Cache resource names. Invalidation sweeps by resource, so every key in
/// the cache uses one of these.
pub mod resource {
    pub const PORTFOLIO: &str = "portfolio";
    pub const TRANSACTIONS: &str = "transactions";
    pub const BENCHMARKS: &str = "benchmarks";
    pub const ANALYTICS: &str = "analytics";
    pub const RISK: &str = "risk";
    pub const OPTIMIZATION: &str = "optimization";
    pub const SYNC: &str = "sync";
}

/// Holdings, performance, risk and optimization are all derived from
/// transaction history, so any transaction write sweeps them all.
pub const TRANSACTION_DERIVED: &[&str] = &[
    resource::TRANSACTIONS,
    resource::PORTFOLIO,
    resource::ANALYTICS,
    resource::RISK,
    resource::OPTIMIZATION,
];

/// Swept when a portfolio sync is observed to complete
pub const SYNC_DERIVED: &[&str] = &[
    resource::PORTFOLIO,
    resource::ANALYTICS,
    resource::RISK,
    resource::OPTIMIZATION,
];

#[derive(Clone)]
pub struct QueryService {
    api: ApiClient,
    cache: Arc<QueryCache>,
}

impl QueryService {
    pub fn new(api: ApiClient, cache: Arc<QueryCache>) -> Self {
        Self { api, cache }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn cache(&self) -> &Arc<QueryCache> {
        &self.cache
    }

    /// Fetch-through-cache with stale-while-revalidate semantics.
    async fn cached<T, F, Fut>(&self, key: CacheKey, ttl_secs: i64, fetch: F) -> Result<T, ApiError>
    where
        T: serde::de::DeserializeOwned + serde::Serialize + Send + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        if let Some(hit) = self.cache.get::<T>(&key) {
            if !hit.stale {
                return Ok(hit.value);
            }

            // Serve the stale value and refresh in the background; the
            // in-flight slot keeps repeated stale reads from piling up
            // duplicate requests for the same key.
            if self.cache.begin_refresh(key.clone()) {
                let cache = Arc::clone(&self.cache);
                let bg_key = key.clone();
                tokio::spawn(async move {
                    match fetch_with_retry(&fetch).await {
                        Ok(value) => cache.put(bg_key.clone(), ttl_secs, &value),
                        Err(e) => warn!(key = %bg_key, error = %e, "background refresh failed"),
                    }
                    cache.end_refresh(&bg_key);
                });
            }
            return Ok(hit.value);
        }

        let value = fetch_with_retry(&fetch).await?;
        self.cache.put(key, ttl_secs, &value);
        Ok(value)
    }

    // --- portfolio ---

    pub async fn portfolio_summary(&self) -> Result<PortfolioSummary, ApiError> {
        let api = self.api.clone();
        self.cached(
            CacheKey::new(resource::PORTFOLIO, "summary"),
            DEFAULT_TTL_SECS,
            move || {
                let api = api.clone();
                async move { api.portfolio_summary().await }
            },
        )
        .await
    }

    pub async fn holdings(&self, limit: Option<u32>) -> Result<Vec<Holding>, ApiError> {
        let api = self.api.clone();
        let params = match limit {
            Some(limit) => format!("holdings&limit={limit}"),
            None => "holdings".to_string(),
        };
        self.cached(
            CacheKey::new(resource::PORTFOLIO, params),
            DEFAULT_TTL_SECS,
            move || {
                let api = api.clone();
                async move { api.holdings(limit).await }
            },
        )
        .await
    }

    pub async fn top_holdings(&self, limit: u32) -> Result<Vec<Holding>, ApiError> {
        let api = self.api.clone();
        self.cached(
            CacheKey::new(resource::PORTFOLIO, format!("top-holdings&limit={limit}")),
            DEFAULT_TTL_SECS,
            move || {
                let api = api.clone();
                async move { api.top_holdings(limit).await }
            },
        )
        .await
    }

    pub async fn sector_allocation(&self) -> Result<Vec<SectorAllocation>, ApiError> {
        let api = self.api.clone();
        self.cached(
            CacheKey::new(resource::PORTFOLIO, "sectors"),
            DEFAULT_TTL_SECS,
            move || {
                let api = api.clone();
                async move { api.sector_allocation().await }
            },
        )
        .await
    }

    pub async fn portfolio_history(&self, days: u32) -> Result<PortfolioHistory, ApiError> {
        let api = self.api.clone();
        self.cached(
            CacheKey::new(resource::PORTFOLIO, format!("history&days={days}")),
            DEFAULT_TTL_SECS,
            move || {
                let api = api.clone();
                async move { api.portfolio_history(days).await }
            },
        )
        .await
    }

    pub async fn snapshots(&self, limit: u32, days: Option<u32>) -> Result<Vec<Snapshot>, ApiError> {
        let api = self.api.clone();
        let params = match days {
            Some(days) => format!("snapshots&limit={limit}&days={days}"),
            None => format!("snapshots&limit={limit}"),
        };
        self.cached(
            CacheKey::new(resource::PORTFOLIO, params),
            DEFAULT_TTL_SECS,
            move || {
                let api = api.clone();
                async move { api.snapshots(limit, days).await }
            },
        )
        .await
    }

    /// Holdings as of one historical snapshot
    pub async fn snapshot_holdings(&self, snapshot_id: i64) -> Result<Vec<Holding>, ApiError> {
        let api = self.api.clone();
        self.cached(
            CacheKey::new(resource::PORTFOLIO, format!("snapshot-holdings&id={snapshot_id}")),
            DEFAULT_TTL_SECS,
            move || {
                let api = api.clone();
                async move { api.snapshot_holdings(snapshot_id).await }
            },
        )
        .await
    }

    // --- transactions ---

    pub async fn transactions(&self, query: &TransactionQuery) -> Result<Vec<Transaction>, ApiError> {
        let api = self.api.clone();
        let fetch_query = query.clone();
        self.cached(
            CacheKey::new(resource::TRANSACTIONS, query.cache_params()),
            DEFAULT_TTL_SECS,
            move || {
                let api = api.clone();
                let query = fetch_query.clone();
                async move { api.transactions(&query).await }
            },
        )
        .await
    }

    pub async fn transaction_summary(&self) -> Result<TransactionSummary, ApiError> {
        let api = self.api.clone();
        self.cached(
            CacheKey::new(resource::TRANSACTIONS, "summary"),
            DEFAULT_TTL_SECS,
            move || {
                let api = api.clone();
                async move { api.transaction_summary().await }
            },
        )
        .await
    }

    /// Uncached read used before destructive confirmation prompts
    pub async fn transaction(&self, id: i64) -> Result<Transaction, ApiError> {
        self.api.transaction(id).await
    }

    pub async fn create_transaction(&self, new: &NewTransaction) -> Result<Transaction, ApiError> {
        let created = self.api.create_transaction(new).await?;
        self.cache.invalidate_resources(TRANSACTION_DERIVED);
        debug!(id = created.id, "transaction created");
        Ok(created)
    }

    pub async fn update_transaction(
        &self,
        id: i64,
        update: &NewTransaction,
    ) -> Result<Transaction, ApiError> {
        let updated = self.api.update_transaction(id, update).await?;
        self.cache.invalidate_resources(TRANSACTION_DERIVED);
        Ok(updated)
    }

    pub async fn delete_transaction(&self, id: i64) -> Result<(), ApiError> {
        self.api.delete_transaction(id).await?;
        self.cache.invalidate_resources(TRANSACTION_DERIVED);
        debug!(id, "transaction deleted");
        Ok(())
    }

    /// CSV import. Dry runs touch nothing; a commit invalidates the same
    /// derived set as any other transaction write.
    pub async fn import_transactions(
        &self,
        file_name: &str,
        contents: Vec<u8>,
        dry_run: bool,
    ) -> Result<ImportReport, ApiError> {
        let report = self.api.import_transactions(file_name, contents, dry_run).await?;
        if !dry_run {
            self.cache.invalidate_resources(TRANSACTION_DERIVED);
        }
        Ok(report)
    }

    // --- benchmarks ---

    pub async fn benchmarks(&self) -> Result<Vec<Benchmark>, ApiError> {
        let api = self.api.clone();
        self.cached(
            CacheKey::new(resource::BENCHMARKS, "list"),
            DEFAULT_TTL_SECS,
            move || {
                let api = api.clone();
                async move { api.benchmarks().await }
            },
        )
        .await
    }

    pub async fn benchmark_data(&self, ticker: &str, days: u32) -> Result<BenchmarkData, ApiError> {
        let api = self.api.clone();
        let fetch_ticker = ticker.to_string();
        self.cached(
            CacheKey::new(resource::BENCHMARKS, format!("data&ticker={ticker}&days={days}")),
            DEFAULT_TTL_SECS,
            move || {
                let api = api.clone();
                let ticker = fetch_ticker.clone();
                async move { api.benchmark_data(&ticker, days).await }
            },
        )
        .await
    }

    pub async fn benchmark_returns(
        &self,
        ticker: &str,
        days: u32,
    ) -> Result<BenchmarkReturns, ApiError> {
        let api = self.api.clone();
        let fetch_ticker = ticker.to_string();
        self.cached(
            CacheKey::new(
                resource::BENCHMARKS,
                format!("returns&ticker={ticker}&days={days}"),
            ),
            DEFAULT_TTL_SECS,
            move || {
                let api = api.clone();
                let ticker = fetch_ticker.clone();
                async move { api.benchmark_returns(&ticker, days).await }
            },
        )
        .await
    }

    pub async fn sync_benchmarks(&self, days: u32) -> Result<BenchmarkSyncResult, ApiError> {
        let result = self.api.sync_benchmarks(days).await?;
        self.cache.invalidate_resource(resource::BENCHMARKS);
        self.cache.invalidate_resource(resource::ANALYTICS);
        Ok(result)
    }

    // --- analytics ---

    pub async fn performance(&self, days: u32) -> Result<PerformanceSummary, ApiError> {
        let api = self.api.clone();
        self.cached(
            CacheKey::new(resource::ANALYTICS, format!("performance&days={days}")),
            DEFAULT_TTL_SECS,
            move || {
                let api = api.clone();
                async move { api.performance(days).await }
            },
        )
        .await
    }

    pub async fn performance_history(&self, days: u32) -> Result<PerformanceHistory, ApiError> {
        let api = self.api.clone();
        self.cached(
            CacheKey::new(resource::ANALYTICS, format!("performance-history&days={days}")),
            DEFAULT_TTL_SECS,
            move || {
                let api = api.clone();
                async move { api.performance_history(days).await }
            },
        )
        .await
    }

    pub async fn holding_performance(
        &self,
        symbol: &str,
        days: u32,
    ) -> Result<HoldingPerformance, ApiError> {
        let api = self.api.clone();
        let fetch_symbol = symbol.to_string();
        self.cached(
            CacheKey::new(
                resource::ANALYTICS,
                format!("holding&symbol={symbol}&days={days}"),
            ),
            DEFAULT_TTL_SECS,
            move || {
                let api = api.clone();
                let symbol = fetch_symbol.clone();
                async move { api.holding_performance(&symbol, days).await }
            },
        )
        .await
    }

    pub async fn attribution(&self, days: u32) -> Result<Attribution, ApiError> {
        let api = self.api.clone();
        self.cached(
            CacheKey::new(resource::ANALYTICS, format!("attribution&days={days}")),
            DEFAULT_TTL_SECS,
            move || {
                let api = api.clone();
                async move { api.attribution(days).await }
            },
        )
        .await
    }

    pub async fn sector_attribution(&self, days: u32) -> Result<SectorAttribution, ApiError> {
        let api = self.api.clone();
        self.cached(
            CacheKey::new(resource::ANALYTICS, format!("sector-attribution&days={days}")),
            DEFAULT_TTL_SECS,
            move || {
                let api = api.clone();
                async move { api.sector_attribution(days).await }
            },
        )
        .await
    }

    pub async fn top_contributors(&self, days: u32, limit: u32) -> Result<TopContributors, ApiError> {
        let api = self.api.clone();
        self.cached(
            CacheKey::new(
                resource::ANALYTICS,
                format!("contributors&days={days}&limit={limit}"),
            ),
            DEFAULT_TTL_SECS,
            move || {
                let api = api.clone();
                async move { api.top_contributors(days, limit).await }
            },
        )
        .await
    }

    pub async fn benchmark_comparison(
        &self,
        days: u32,
        benchmark: &str,
    ) -> Result<BenchmarkComparison, ApiError> {
        let api = self.api.clone();
        let fetch_benchmark = benchmark.to_string();
        self.cached(
            CacheKey::new(
                resource::ANALYTICS,
                format!("comparison&days={days}&benchmark={benchmark}"),
            ),
            DEFAULT_TTL_SECS,
            move || {
                let api = api.clone();
                let benchmark = fetch_benchmark.clone();
                async move { api.benchmark_comparison(days, &benchmark).await }
            },
        )
        .await
    }

    // --- risk ---

    pub async fn risk_report(&self, days: u32) -> Result<RiskReport, ApiError> {
        let api = self.api.clone();
        self.cached(
            CacheKey::new(resource::RISK, format!("comprehensive&days={days}")),
            DEFAULT_TTL_SECS,
            move || {
                let api = api.clone();
                async move { api.risk_report(days).await }
            },
        )
        .await
    }

    pub async fn volatility(&self, days: u32) -> Result<Volatility, ApiError> {
        let api = self.api.clone();
        self.cached(
            CacheKey::new(resource::RISK, format!("volatility&days={days}")),
            DEFAULT_TTL_SECS,
            move || {
                let api = api.clone();
                async move { api.volatility(days).await }
            },
        )
        .await
    }

    pub async fn sharpe_ratio(&self, days: u32) -> Result<SharpeRatio, ApiError> {
        let api = self.api.clone();
        self.cached(
            CacheKey::new(resource::RISK, format!("sharpe&days={days}")),
            DEFAULT_TTL_SECS,
            move || {
                let api = api.clone();
                async move { api.sharpe_ratio(days).await }
            },
        )
        .await
    }

    pub async fn beta(&self, days: u32, benchmark: &str) -> Result<Beta, ApiError> {
        let api = self.api.clone();
        let fetch_benchmark = benchmark.to_string();
        self.cached(
            CacheKey::new(
                resource::RISK,
                format!("beta&days={days}&benchmark={benchmark}"),
            ),
            DEFAULT_TTL_SECS,
            move || {
                let api = api.clone();
                let benchmark = fetch_benchmark.clone();
                async move { api.beta(days, &benchmark).await }
            },
        )
        .await
    }

    pub async fn max_drawdown(&self, days: u32) -> Result<MaxDrawdown, ApiError> {
        let api = self.api.clone();
        self.cached(
            CacheKey::new(resource::RISK, format!("max-drawdown&days={days}")),
            DEFAULT_TTL_SECS,
            move || {
                let api = api.clone();
                async move { api.max_drawdown(days).await }
            },
        )
        .await
    }

    pub async fn value_at_risk(&self, days: u32, confidence: f64) -> Result<ValueAtRisk, ApiError> {
        let api = self.api.clone();
        self.cached(
            CacheKey::new(
                resource::RISK,
                format!("var&days={days}&confidence={confidence}"),
            ),
            DEFAULT_TTL_SECS,
            move || {
                let api = api.clone();
                async move { api.value_at_risk(days, confidence).await }
            },
        )
        .await
    }

    pub async fn correlation_matrix(&self, days: u32) -> Result<CorrelationMatrix, ApiError> {
        let api = self.api.clone();
        self.cached(
            CacheKey::new(resource::RISK, format!("correlation&days={days}")),
            DEFAULT_TTL_SECS,
            move || {
                let api = api.clone();
                async move { api.correlation_matrix(days).await }
            },
        )
        .await
    }

    // --- optimization (longest staleness window) ---

    pub async fn optimize_max_sharpe(&self, days: u32) -> Result<OptimizationResult, ApiError> {
        let api = self.api.clone();
        self.cached(
            CacheKey::new(resource::OPTIMIZATION, format!("max-sharpe&days={days}")),
            OPTIMIZATION_TTL_SECS,
            move || {
                let api = api.clone();
                async move { api.optimize_max_sharpe(days).await }
            },
        )
        .await
    }

    pub async fn optimize_min_volatility(&self, days: u32) -> Result<OptimizationResult, ApiError> {
        let api = self.api.clone();
        self.cached(
            CacheKey::new(resource::OPTIMIZATION, format!("min-volatility&days={days}")),
            OPTIMIZATION_TTL_SECS,
            move || {
                let api = api.clone();
                async move { api.optimize_min_volatility(days).await }
            },
        )
        .await
    }

    pub async fn efficient_frontier(
        &self,
        days: u32,
        points: u32,
    ) -> Result<EfficientFrontier, ApiError> {
        let api = self.api.clone();
        self.cached(
            CacheKey::new(
                resource::OPTIMIZATION,
                format!("frontier&days={days}&points={points}"),
            ),
            OPTIMIZATION_TTL_SECS,
            move || {
                let api = api.clone();
                async move { api.efficient_frontier(days, points).await }
            },
        )
        .await
    }

    pub async fn monte_carlo(
        &self,
        days: u32,
        simulations: u32,
    ) -> Result<MonteCarloResult, ApiError> {
        let api = self.api.clone();
        self.cached(
            CacheKey::new(
                resource::OPTIMIZATION,
                format!("monte-carlo&days={days}&simulations={simulations}"),
            ),
            OPTIMIZATION_TTL_SECS,
            move || {
                let api = api.clone();
                async move { api.monte_carlo(days, simulations).await }
            },
        )
        .await
    }

    pub async fn rebalancing_plan(&self, days: u32) -> Result<RebalancingPlan, ApiError> {
        let api = self.api.clone();
        self.cached(
            CacheKey::new(resource::OPTIMIZATION, format!("rebalancing&days={days}")),
            OPTIMIZATION_TTL_SECS,
            move || {
                let api = api.clone();
                async move { api.rebalancing_plan(days).await }
            },
        )
        .await
    }

    // --- sync & health ---

    pub async fn sync_status(&self) -> Result<SyncStatus, ApiError> {
        let api = self.api.clone();
        self.cached(
            CacheKey::new(resource::SYNC, "status"),
            SYNC_STATUS_TTL_SECS,
            move || {
                let api = api.clone();
                async move { api.sync_status().await }
            },
        )
        .await
    }

    /// Trigger a backend sync. Sync status is invalidated immediately so
    /// the next read observes the run; portfolio-derived caches are only
    /// swept once completion is observed (see [`sync::await_sync_completion`]
    /// and [`QueryService::mark_sync_complete`]).
    pub async fn trigger_sync(&self) -> Result<SyncTriggered, ApiError> {
        let triggered = self.api.trigger_sync().await?;
        self.cache.invalidate_resource(resource::SYNC);
        Ok(triggered)
    }

    /// Called by the sync watcher when a run is observed to finish
    pub fn mark_sync_complete(&self) {
        self.cache.invalidate_resource(resource::SYNC);
        self.cache.invalidate_resources(SYNC_DERIVED);
    }

    /// Health is a liveness probe; caching it would defeat the point
    pub async fn health(&self) -> Result<HealthStatus, ApiError> {
        self.api.health().await
    }
}

/// One retry, and only for failures where a retry could plausibly help.
async fn fetch_with_retry<T, F, Fut>(fetch: &F) -> Result<T, ApiError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    match fetch().await {
        Ok(value) => Ok(value),
        Err(e) if e.is_retryable() => {
            debug!(error = %e, "retrying failed request once");
            fetch().await
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn service() -> QueryService {
        let api = ApiClient::new("http://127.0.0.1:1").unwrap();
        QueryService::new(api, Arc::new(QueryCache::new()))
    }

    #[tokio::test]
    async fn test_fresh_hit_skips_fetch() {
        let svc = service();
        let calls = Arc::new(AtomicU32::new(0));

        for _ in 0..3 {
            let calls = Arc::clone(&calls);
            let value: u32 = svc
                .cached(CacheKey::bare("portfolio"), DEFAULT_TTL_SECS, move || {
                    let calls = Arc::clone(&calls);
                    async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        Ok(7u32)
                    }
                })
                .await
                .unwrap();
            assert_eq!(value, 7);
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_retryable_error_is_retried_once() {
        let svc = service();
        let calls = Arc::new(AtomicU32::new(0));
        let fetch_calls = Arc::clone(&calls);

        let value: u32 = svc
            .cached(CacheKey::bare("risk"), DEFAULT_TTL_SECS, move || {
                let calls = Arc::clone(&fetch_calls);
                async move {
                    if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                        Err(ApiError::from_response(StatusCode::BAD_GATEWAY, ""))
                    } else {
                        Ok(11u32)
                    }
                }
            })
            .await
            .unwrap();

        assert_eq!(value, 11);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_client_errors_are_not_retried() {
        let svc = service();
        let calls = Arc::new(AtomicU32::new(0));
        let fetch_calls = Arc::clone(&calls);

        let result: Result<u32, _> = svc
            .cached(CacheKey::bare("analytics"), DEFAULT_TTL_SECS, move || {
                let calls = Arc::clone(&fetch_calls);
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err(ApiError::from_response(StatusCode::NOT_FOUND, ""))
                }
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_transaction_write_sweeps_derived_resources() {
        let svc = service();
        let cache = svc.cache();
        cache.put(CacheKey::new(resource::TRANSACTIONS, ""), DEFAULT_TTL_SECS, &1u32);
        cache.put(CacheKey::new(resource::PORTFOLIO, "summary"), DEFAULT_TTL_SECS, &2u32);
        cache.put(CacheKey::new(resource::ANALYTICS, "performance&days=90"), DEFAULT_TTL_SECS, &3u32);
        cache.put(CacheKey::new(resource::BENCHMARKS, "list"), DEFAULT_TTL_SECS, &4u32);

        cache.invalidate_resources(TRANSACTION_DERIVED);

        assert!(cache.get::<u32>(&CacheKey::new(resource::TRANSACTIONS, "")).is_none());
        assert!(cache.get::<u32>(&CacheKey::new(resource::PORTFOLIO, "summary")).is_none());
        assert!(cache
            .get::<u32>(&CacheKey::new(resource::ANALYTICS, "performance&days=90"))
            .is_none());
        // benchmarks are independent of transaction history
        assert!(cache.get::<u32>(&CacheKey::new(resource::BENCHMARKS, "list")).is_some());
    }

    #[test]
    fn test_sync_completion_sweeps_portfolio_but_not_transactions() {
        let svc = service();
        let cache = svc.cache();
        cache.put(CacheKey::new(resource::PORTFOLIO, "summary"), DEFAULT_TTL_SECS, &1u32);
        cache.put(CacheKey::new(resource::SYNC, "status"), SYNC_STATUS_TTL_SECS, &2u32);
        cache.put(CacheKey::new(resource::TRANSACTIONS, ""), DEFAULT_TTL_SECS, &3u32);

        svc.mark_sync_complete();

        assert!(cache.get::<u32>(&CacheKey::new(resource::PORTFOLIO, "summary")).is_none());
        assert!(cache.get::<u32>(&CacheKey::new(resource::SYNC, "status")).is_none());
        assert!(cache.get::<u32>(&CacheKey::new(resource::TRANSACTIONS, "")).is_some());
    }
}
