//! Optimize command: Sharpe-maximizing and minimum-volatility weights,
//! the efficient frontier, Monte Carlo simulation and rebalancing
//! recommendations.
//!
//! An unoptimizable portfolio (too few holdings, too little history)
//! reports `success: false` with a message; that renders as a banner,
//! never as an error.

use anyhow::Result;
use clap::{Args, ValueEnum};
use owo_colors::OwoColorize;
use std::collections::BTreeMap;
use tracing::info;

use crate::api::optimization::{
    EfficientFrontier, MonteCarloResult, OptimizationResult, RebalancingPlan,
};
use crate::data_paths::DataPaths;
use crate::display::{fmt_currency, fmt_percent, hbar, info_banner, section, table};
use crate::query::QueryService;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OptimizeMode {
    /// Maximize the Sharpe ratio (default)
    MaxSharpe,
    /// Minimize volatility
    MinVolatility,
    /// Efficient frontier points
    Frontier,
    /// Monte Carlo simulation of final portfolio value
    MonteCarlo,
    /// Current vs optimal weights with buy/sell recommendations
    Rebalance,
}

#[derive(Args, Clone)]
pub struct OptimizeArgs {
    /// Mode of operation
    #[arg(long, short = 'm', value_enum, default_value = "max-sharpe")]
    pub mode: OptimizeMode,

    /// Historical window in days
    #[arg(long, short = 'd', default_value = "365")]
    pub days: u32,

    /// Number of frontier points
    #[arg(long, default_value = "20")]
    pub points: u32,

    /// Number of Monte Carlo simulation paths
    #[arg(long, default_value = "10000")]
    pub simulations: u32,
}

pub struct OptimizeCommand {
    args: OptimizeArgs,
}

impl OptimizeCommand {
    pub fn new(args: OptimizeArgs) -> Self {
        Self { args }
    }

    pub async fn execute(&self, service: &QueryService, _data_paths: &DataPaths) -> Result<()> {
        let days = self.args.days;
        info!(days, mode = ?self.args.mode, "running optimization page");

        println!("\n⚖️  {}", "Portfolio Optimization".bright_white().bold());

        match self.args.mode {
            OptimizeMode::MaxSharpe => {
                let result = service.optimize_max_sharpe(days).await?;
                render_weights("MAX-SHARPE WEIGHTS", &result);
            }
            OptimizeMode::MinVolatility => {
                let result = service.optimize_min_volatility(days).await?;
                render_weights("MIN-VOLATILITY WEIGHTS", &result);
            }
            OptimizeMode::Frontier => {
                let frontier = service.efficient_frontier(days, self.args.points).await?;
                render_frontier(&frontier);
            }
            OptimizeMode::MonteCarlo => {
                let result = service.monte_carlo(days, self.args.simulations).await?;
                render_monte_carlo(&result);
            }
            OptimizeMode::Rebalance => {
                let plan = service.rebalancing_plan(days).await?;
                render_rebalance(&plan);
            }
        }

        println!();
        Ok(())
    }
}

fn render_weights(title: &str, result: &OptimizationResult) {
    section(title);

    if !result.success {
        let message = result.message.as_deref().unwrap_or("Optimization failed");
        info_banner(message);
        return;
    }

    render_allocation(&result.weights);

    println!(
        "\nExpected return {} | Volatility {} | Sharpe {:.2}",
        fmt_percent(result.metrics.expected_return * 100.0),
        fmt_percent(result.metrics.volatility * 100.0),
        result.metrics.sharpe_ratio
    );
}

fn render_allocation(weights: &BTreeMap<String, f64>) {
    let mut sorted: Vec<_> = weights.iter().collect();
    sorted.sort_by(|a, b| b.1.partial_cmp(a.1).unwrap_or(std::cmp::Ordering::Equal));

    for (ticker, weight) in sorted {
        let percent = weight * 100.0;
        println!(
            "{:<8} {} {:>6}",
            ticker,
            hbar(percent, 30).bright_cyan(),
            fmt_percent(percent)
        );
    }
}

fn render_frontier(frontier: &EfficientFrontier) {
    section("EFFICIENT FRONTIER");

    if !frontier.success || frontier.frontier.is_empty() {
        let message = frontier
            .message
            .as_deref()
            .unwrap_or("Insufficient data for the efficient frontier");
        info_banner(message);
        return;
    }

    let mut t = table(vec!["Return", "Volatility", "Sharpe"]);
    for point in &frontier.frontier {
        t.add_row(vec![
            fmt_percent(point.expected_return * 100.0),
            fmt_percent(point.volatility * 100.0),
            format!("{:.2}", point.sharpe),
        ]);
    }
    println!("{t}");
    println!(
        "{}",
        format!("over {} holdings", frontier.tickers.len()).bright_black()
    );
}

fn render_monte_carlo(result: &MonteCarloResult) {
    section("MONTE CARLO SIMULATION");

    if !result.success {
        let message = result
            .message
            .as_deref()
            .unwrap_or("Insufficient data for simulation");
        info_banner(message);
        return;
    }

    let stats = &result.statistics;
    println!(
        "{} paths over {} trading days, starting from {}",
        result.num_simulations,
        result.time_horizon_days,
        fmt_currency(result.current_value)
    );

    println!("\nProjected final value:");
    println!("  5th percentile:  {}", fmt_currency(stats.percentile_5).bright_red());
    println!("  25th percentile: {}", fmt_currency(stats.percentile_25));
    println!("  Median:          {}", fmt_currency(stats.median).bright_white());
    println!("  75th percentile: {}", fmt_currency(stats.percentile_75));
    println!("  95th percentile: {}", fmt_currency(stats.percentile_95).bright_green());
    println!(
        "{}",
        format!("mean {} ± {}", fmt_currency(stats.mean), fmt_currency(stats.std)).bright_black()
    );
}

fn render_rebalance(plan: &RebalancingPlan) {
    section("REBALANCING");

    if !plan.success {
        let message = plan.message.as_deref().unwrap_or("Optimization failed");
        info_banner(message);
        return;
    }

    if plan.recommendations.is_empty() {
        println!(
            "{}",
            "✓ Allocation is within 1% of optimal; nothing to do".bright_green()
        );
        return;
    }

    let mut t = table(vec!["Ticker", "Action", "Current", "Target", "Amount"]);
    for rec in &plan.recommendations {
        let action = match rec.action.as_str() {
            "BUY" => rec.action.bright_green().to_string(),
            "SELL" => rec.action.bright_red().to_string(),
            _ => rec.action.clone(),
        };
        t.add_row(vec![
            rec.ticker.clone(),
            action,
            fmt_percent(rec.current_weight * 100.0),
            fmt_percent(rec.target_weight * 100.0),
            fmt_currency(rec.amount),
        ]);
    }
    println!("{t}");

    println!(
        "\nOptimal portfolio: return {} | volatility {} | Sharpe {:.2}",
        fmt_percent(plan.optimal_metrics.expected_return * 100.0),
        fmt_percent(plan.optimal_metrics.volatility * 100.0),
        plan.optimal_metrics.sharpe_ratio
    );
}
