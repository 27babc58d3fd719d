//! Dashboard command: the portfolio overview page.
//!
//! Issues the section fetches concurrently and renders each one
//! independently — a failed analytic shows an inline error panel without
//! blanking the rest of the page.

use anyhow::Result;
use clap::Args;
use futures::future::OptionFuture;
use owo_colors::OwoColorize;
use tracing::info;

use crate::api::portfolio::{Holding, PortfolioSummary, SectorAllocation};
use crate::api::sync::SyncStatus;
use crate::data_paths::DataPaths;
use crate::display::{
    error_panel, fmt_currency, fmt_opt_percent, fmt_percent, fmt_signed_currency, hbar, section,
    sparkline, table,
};
use crate::query::QueryService;
use crate::views::{chart_series, ChartSource};

#[derive(Args, Clone)]
pub struct DashboardArgs {
    /// History window in days
    #[arg(long, short = 'd', default_value = "90")]
    pub days: u32,

    /// Overlay a benchmark (e.g. ^GSPC) on the value history
    #[arg(long, short = 'b')]
    pub benchmark: Option<String>,

    /// Number of top holdings to show
    #[arg(long, default_value = "5")]
    pub top: u32,
}

pub struct DashboardCommand {
    args: DashboardArgs,
}

impl DashboardCommand {
    pub fn new(args: DashboardArgs) -> Self {
        Self { args }
    }

    pub async fn execute(&self, service: &QueryService, _data_paths: &DataPaths) -> Result<()> {
        let days = self.args.days;
        info!(days, "loading dashboard");

        println!("\n📊 {}", "Portfolio Dashboard".bright_white().bold());
        println!("{} {}", "Backend:".bright_black(), service.api().base_url());

        // optional fetch: only issued when a benchmark overlay was requested
        let comparison: OptionFuture<_> = self
            .args
            .benchmark
            .as_deref()
            .map(|ticker| service.benchmark_comparison(days, ticker))
            .into();

        let (summary, top_holdings, sectors, history, sync_status, comparison) = tokio::join!(
            service.portfolio_summary(),
            service.top_holdings(self.args.top),
            service.sector_allocation(),
            service.portfolio_history(days),
            service.sync_status(),
            comparison,
        );

        match summary {
            Ok(summary) => render_summary(&summary),
            Err(e) => error_panel("SUMMARY", &e),
        }

        if let Ok(status) = &sync_status {
            render_sync_banner(status);
        }

        match history {
            Ok(history) => {
                let comparison = match &comparison {
                    Some(Ok(c)) => Some(c),
                    Some(Err(e)) => {
                        error_panel("BENCHMARK COMPARISON", e);
                        None
                    }
                    None => None,
                };
                let chart = chart_series(&history, comparison, self.args.benchmark.is_some());

                section(&format!("VALUE HISTORY ({days}d)"));
                if chart.points.is_empty() {
                    println!("{}", "No history recorded yet".bright_black().italic());
                } else {
                    match chart.source {
                        ChartSource::BenchmarkRelative => {
                            let ticker = chart.benchmark_ticker.as_deref().unwrap_or("benchmark");
                            println!(
                                "Portfolio  {}",
                                sparkline(&chart.portfolio_values(), 48).bright_cyan()
                            );
                            println!(
                                "{:<10} {}",
                                ticker,
                                sparkline(&chart.benchmark_values(), 48).bright_magenta()
                            );
                            println!("{}", "both indexed to 100".bright_black());
                        }
                        ChartSource::RawHistory => {
                            println!("{}", sparkline(&chart.portfolio_values(), 48).bright_cyan());
                            let first = chart.points.first().map(|p| p.portfolio).unwrap_or(0.0);
                            let last = chart.points.last().map(|p| p.portfolio).unwrap_or(0.0);
                            println!(
                                "{} → {}",
                                fmt_currency(first).bright_black(),
                                fmt_currency(last)
                            );
                        }
                    }
                }
            }
            Err(e) => error_panel("VALUE HISTORY", &e),
        }

        match top_holdings {
            Ok(holdings) => render_top_holdings(&holdings),
            Err(e) => error_panel("TOP HOLDINGS", &e),
        }

        match sectors {
            Ok(sectors) => render_sectors(&sectors),
            Err(e) => error_panel("SECTOR ALLOCATION", &e),
        }

        println!();
        Ok(())
    }
}

fn render_summary(summary: &PortfolioSummary) {
    section("SUMMARY");
    println!(
        "💰 Total Value: {}",
        fmt_currency(summary.total_value).bright_green()
    );
    println!("📦 Holdings: {}", summary.total_holdings);
    if let Some(gain) = summary.total_gain_loss {
        println!(
            "📈 Gain/Loss: {} ({})",
            fmt_signed_currency(gain),
            fmt_opt_percent(summary.total_return_percent)
        );
    }
    if let Some(updated) = &summary.last_updated {
        println!("{} {}", "Last updated:".bright_black(), updated);
    }
}

fn render_sync_banner(status: &SyncStatus) {
    if status.is_running() {
        println!(
            "\n{} {}",
            "⟳".bright_blue(),
            "A portfolio sync is running; figures may move shortly".bright_blue()
        );
    } else if let Some(err) = &status.last_error {
        println!(
            "\n{} {}",
            "⚠".yellow(),
            format!("Last sync failed: {err}").yellow()
        );
    }
}

fn render_top_holdings(holdings: &[Holding]) {
    section("TOP HOLDINGS");
    if holdings.is_empty() {
        println!("{}", "No holdings found".bright_black().italic());
        return;
    }

    let mut t = table(vec!["Symbol", "Name", "Value", "Weight", "Gain/Loss"]);
    for h in holdings {
        t.add_row(vec![
            h.symbol.clone(),
            h.company_name.clone().unwrap_or_default(),
            fmt_currency(h.value),
            fmt_opt_percent(h.portfolio_weight),
            fmt_signed_currency(h.gain_loss_or_zero()),
        ]);
    }
    println!("{t}");
}

fn render_sectors(sectors: &[SectorAllocation]) {
    section("SECTOR ALLOCATION");
    if sectors.is_empty() {
        println!("{}", "No sector data".bright_black().italic());
        return;
    }

    for s in sectors {
        println!(
            "{:<24} {} {:>7} {}",
            s.sector,
            hbar(s.percentage, 24).bright_cyan(),
            fmt_percent(s.percentage),
            fmt_currency(s.value).bright_black()
        );
    }
}
