//! Performance command: TWR/MWR, return history, attribution, top
//! contributors and the benchmark comparison chart.

use anyhow::Result;
use chrono::Utc;
use clap::Args;
use futures::future::OptionFuture;
use owo_colors::OwoColorize;
use tracing::info;

use crate::api::analytics::{
    AttributionEntry, BenchmarkComparison, PerformanceSummary, SectorAttribution, TopContributors,
};
use crate::data_paths::DataPaths;
use crate::display::{
    error_panel, fmt_percent, fmt_signed_percent, info_banner, section, sparkline, table,
};
use crate::query::QueryService;
use crate::views::export::{analytics_report_csv, export_filename, write_export};

#[derive(Args, Clone)]
pub struct PerformanceArgs {
    /// Analysis window in days
    #[arg(long, short = 'd', default_value = "90")]
    pub days: u32,

    /// Compare against a benchmark (e.g. ^GSPC)
    #[arg(long, short = 'b')]
    pub benchmark: Option<String>,

    /// Number of top contributors/detractors to show
    #[arg(long, default_value = "5")]
    pub limit: u32,

    /// Drill into one holding's performance instead of the portfolio view
    #[arg(long)]
    pub symbol: Option<String>,

    /// Also break attribution down by sector
    #[arg(long)]
    pub by_sector: bool,

    /// Write the performance report to a CSV file
    #[arg(long)]
    pub export: bool,
}

pub struct PerformanceCommand {
    args: PerformanceArgs,
}

impl PerformanceCommand {
    pub fn new(args: PerformanceArgs) -> Self {
        Self { args }
    }

    pub async fn execute(&self, service: &QueryService, data_paths: &DataPaths) -> Result<()> {
        let days = self.args.days;
        info!(days, "loading performance page");

        println!("\n📈 {}", "Performance".bright_white().bold());

        // single-holding drill-down replaces the portfolio-level page
        if let Some(symbol) = &self.args.symbol {
            let perf = service.holding_performance(symbol, days).await?;
            section(&format!("{} ({days}d)", perf.symbol));
            if perf.data_points == 0 {
                info_banner("Not enough history for this holding");
                return Ok(());
            }
            println!("Return: {}", fmt_signed_percent(perf.return_percent));
            println!(
                "Value:  ${:.2} → ${:.2}  ({} points)",
                perf.start_value, perf.end_value, perf.data_points
            );
            return Ok(());
        }

        let comparison: OptionFuture<_> = self
            .args
            .benchmark
            .as_deref()
            .map(|ticker| service.benchmark_comparison(days, ticker))
            .into();

        let (performance, history, attribution, contributors, comparison) = tokio::join!(
            service.performance(days),
            service.performance_history(days),
            service.attribution(days),
            service.top_contributors(days, self.args.limit),
            comparison,
        );

        let mut export_summary: Option<PerformanceSummary> = None;
        match performance {
            Ok(summary) => {
                render_returns(&summary, days);
                export_summary = Some(summary);
            }
            Err(e) => error_panel("RETURNS", &e),
        }

        match history {
            Ok(history) => {
                section(&format!("RETURN HISTORY ({days}d)"));
                if history.data.is_empty() {
                    info_banner("Not enough history to chart returns yet");
                } else {
                    let values: Vec<f64> = history
                        .data
                        .iter()
                        .map(|p| p.cumulative_return_percent)
                        .collect();
                    println!("{}", sparkline(&values, 48).bright_cyan());
                    let last = values.last().copied().unwrap_or(0.0);
                    println!("Cumulative: {}", fmt_signed_percent(last));
                }
            }
            Err(e) => error_panel("RETURN HISTORY", &e),
        }

        if let Some(comparison) = comparison {
            match comparison {
                Ok(comparison) => render_comparison(&comparison),
                Err(e) => error_panel("BENCHMARK COMPARISON", &e),
            }
        }

        let mut export_attribution: Vec<AttributionEntry> = Vec::new();
        match attribution {
            Ok(attribution) => {
                render_attribution(&attribution.entries);
                export_attribution = attribution.entries;
            }
            Err(e) => error_panel("ATTRIBUTION", &e),
        }

        if self.args.by_sector {
            match service.sector_attribution(days).await {
                Ok(sectors) => render_sector_attribution(&sectors),
                Err(e) => error_panel("SECTOR ATTRIBUTION", &e),
            }
        }

        match contributors {
            Ok(contributors) => render_contributors(&contributors),
            Err(e) => error_panel("TOP CONTRIBUTORS", &e),
        }

        if self.args.export {
            let summary = export_summary.unwrap_or_else(|| PerformanceSummary {
                period_days: days,
                twr: None,
                mwr: None,
                simple_return_percent: None,
                data_points: 0,
            });
            let csv = analytics_report_csv(&summary, &export_attribution)?;
            let filename = export_filename("performance", Some(days), Utc::now().date_naive());
            let path = write_export(data_paths, &filename, &csv)?;
            println!("\n💾 Exported performance report to {}", path.display());
        }

        println!();
        Ok(())
    }
}

fn render_returns(summary: &PerformanceSummary, days: u32) {
    section(&format!("RETURNS ({days}d)"));

    match &summary.twr {
        Some(twr) => {
            println!(
                "Time-weighted:  {} ({} annualized, {} periods)",
                fmt_signed_percent(twr.twr_percent),
                fmt_percent(twr.annualized_twr * 100.0),
                twr.periods
            );
        }
        None => info_banner("Time-weighted return unavailable for this period"),
    }

    match &summary.mwr {
        Some(mwr) if mwr.converged => {
            println!("Money-weighted: {}", fmt_signed_percent(mwr.mwr_percent));
        }
        Some(_) => info_banner("Money-weighted return did not converge"),
        None => {}
    }

    if let Some(simple) = summary.simple_return_percent {
        println!("Simple return:  {}", fmt_signed_percent(simple));
    }
}

fn render_comparison(comparison: &BenchmarkComparison) {
    section("BENCHMARK COMPARISON");

    if !comparison.benchmark_available || comparison.series.is_empty() {
        // informational, not an error: the chart upstream falls back to
        // raw history in this case
        let message = comparison
            .message
            .as_deref()
            .unwrap_or("Benchmark data unavailable for this period");
        info_banner(message);
        return;
    }

    let ticker = comparison.benchmark.as_deref().unwrap_or("benchmark");
    let portfolio: Vec<f64> = comparison.series.iter().map(|p| p.portfolio).collect();
    let benchmark: Vec<f64> = comparison.series.iter().map(|p| p.benchmark).collect();

    println!("Portfolio  {}", sparkline(&portfolio, 48).bright_cyan());
    println!("{:<10} {}", ticker, sparkline(&benchmark, 48).bright_magenta());

    if let (Some(p), Some(b)) = (portfolio.last(), benchmark.last()) {
        println!(
            "Relative to 100: portfolio {} vs {} {}",
            format!("{p:.1}").bright_cyan(),
            ticker,
            format!("{b:.1}").bright_magenta()
        );
    }
}

fn render_attribution(entries: &[AttributionEntry]) {
    section("ATTRIBUTION");
    if entries.is_empty() {
        info_banner("No attribution data for this period");
        return;
    }

    let mut t = table(vec!["Symbol", "Weight", "Return", "Contribution"]);
    for entry in entries {
        t.add_row(vec![
            entry.symbol.clone(),
            fmt_percent(entry.weight * 100.0),
            fmt_signed_percent(entry.return_percent),
            fmt_signed_percent(entry.contribution),
        ]);
    }
    println!("{t}");
}

fn render_sector_attribution(attribution: &SectorAttribution) {
    section("SECTOR ATTRIBUTION");
    if attribution.entries.is_empty() {
        info_banner("No sector attribution data for this period");
        return;
    }

    let mut t = table(vec!["Sector", "Weight", "Return", "Contribution"]);
    for entry in &attribution.entries {
        t.add_row(vec![
            entry.sector.clone(),
            fmt_percent(entry.weight * 100.0),
            fmt_signed_percent(entry.return_percent),
            fmt_signed_percent(entry.contribution),
        ]);
    }
    println!("{t}");
}

fn render_contributors(contributors: &TopContributors) {
    section("TOP CONTRIBUTORS");
    if contributors.top_contributors.is_empty() && contributors.top_detractors.is_empty() {
        info_banner("No contributor data for this period");
        return;
    }

    for entry in &contributors.top_contributors {
        println!(
            "  {} {:<8} {}",
            "▲".bright_green(),
            entry.symbol,
            fmt_signed_percent(entry.contribution)
        );
    }
    for entry in &contributors.top_detractors {
        println!(
            "  {} {:<8} {}",
            "▼".bright_red(),
            entry.symbol,
            fmt_signed_percent(entry.contribution)
        );
    }
}
