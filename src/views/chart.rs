//! Chart series merge: one precedence rule, not a general join.
//!
//! When a benchmark comparison was requested and the backend reports it
//! available, the chart shows both lines indexed to 100. Otherwise the
//! raw portfolio-value history is charted. An unavailable benchmark is a
//! fallback, never an empty chart.

use crate::api::analytics::BenchmarkComparison;
use crate::api::portfolio::PortfolioHistory;

#[derive(Debug, Clone, PartialEq)]
pub struct SeriesPoint {
    pub timestamp: String,
    pub portfolio: f64,
    /// Present only when the benchmark-relative series is in use
    pub benchmark: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartSource {
    /// Both lines normalized to 100 at period start
    BenchmarkRelative,
    /// Raw portfolio value over time
    RawHistory,
}

#[derive(Debug, Clone)]
pub struct ChartData {
    pub source: ChartSource,
    pub benchmark_ticker: Option<String>,
    pub points: Vec<SeriesPoint>,
}

impl ChartData {
    pub fn portfolio_values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.portfolio).collect()
    }

    pub fn benchmark_values(&self) -> Vec<f64> {
        self.points.iter().filter_map(|p| p.benchmark).collect()
    }
}

/// Merge the two possible sources into one chart-ready series.
pub fn chart_series(
    history: &PortfolioHistory,
    comparison: Option<&BenchmarkComparison>,
    benchmark_on: bool,
) -> ChartData {
    if benchmark_on {
        if let Some(comparison) = comparison {
            if comparison.benchmark_available && !comparison.series.is_empty() {
                return ChartData {
                    source: ChartSource::BenchmarkRelative,
                    benchmark_ticker: comparison.benchmark.clone(),
                    points: comparison
                        .series
                        .iter()
                        .map(|p| SeriesPoint {
                            timestamp: p.timestamp.clone(),
                            portfolio: p.portfolio,
                            benchmark: Some(p.benchmark),
                        })
                        .collect(),
                };
            }
        }
    }

    ChartData {
        source: ChartSource::RawHistory,
        benchmark_ticker: None,
        points: history
            .data
            .iter()
            .map(|p| SeriesPoint {
                timestamp: p.timestamp.clone(),
                portfolio: p.total_value,
                benchmark: None,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::analytics::ComparisonPoint;
    use crate::api::portfolio::HistoryPoint;

    fn history(values: &[f64]) -> PortfolioHistory {
        PortfolioHistory {
            data: values
                .iter()
                .enumerate()
                .map(|(i, v)| HistoryPoint {
                    timestamp: format!("2026-08-0{}T00:00:00", i + 1),
                    total_value: *v,
                    cumulative_return_percent: None,
                })
                .collect(),
            period_days: 90,
            data_points: values.len() as u32,
        }
    }

    fn comparison(available: bool, points: usize) -> BenchmarkComparison {
        BenchmarkComparison {
            benchmark_available: available,
            benchmark: Some("^GSPC".to_string()),
            message: None,
            series: (0..points)
                .map(|i| ComparisonPoint {
                    timestamp: format!("2026-08-0{}T00:00:00", i + 1),
                    portfolio: 100.0 + i as f64,
                    benchmark: 100.0 + i as f64 * 0.5,
                })
                .collect(),
            period_days: 90,
        }
    }

    #[test]
    fn test_benchmark_series_is_preferred_when_available() {
        let data = chart_series(&history(&[1000.0, 1010.0]), Some(&comparison(true, 2)), true);
        assert_eq!(data.source, ChartSource::BenchmarkRelative);
        assert_eq!(data.points.len(), 2);
        assert_eq!(data.points[0].portfolio, 100.0);
        assert_eq!(data.points[0].benchmark, Some(100.0));
    }

    #[test]
    fn test_unavailable_benchmark_falls_back_to_history() {
        let data = chart_series(&history(&[1000.0, 1010.0]), Some(&comparison(false, 0)), true);
        assert_eq!(data.source, ChartSource::RawHistory);
        assert_eq!(data.points.len(), 2);
        assert_eq!(data.points[1].portfolio, 1010.0);
        assert!(data.points[1].benchmark.is_none());
    }

    #[test]
    fn test_empty_comparison_series_falls_back() {
        // available flag set but no points: still not an empty chart
        let data = chart_series(&history(&[1000.0]), Some(&comparison(true, 0)), true);
        assert_eq!(data.source, ChartSource::RawHistory);
        assert_eq!(data.points.len(), 1);
    }

    #[test]
    fn test_toggle_off_ignores_comparison() {
        let data = chart_series(&history(&[1000.0]), Some(&comparison(true, 3)), false);
        assert_eq!(data.source, ChartSource::RawHistory);
    }

    #[test]
    fn test_empty_history_yields_empty_points() {
        let data = chart_series(&history(&[]), None, false);
        assert!(data.points.is_empty());
        assert!(data.portfolio_values().is_empty());
    }
}
