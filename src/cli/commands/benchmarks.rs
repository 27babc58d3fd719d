//! Benchmarks command: configured indices, their history and returns,
//! and the manual benchmark data sync.

use anyhow::Result;
use clap::Args;
use owo_colors::OwoColorize;
use tracing::info;

use crate::data_paths::DataPaths;
use crate::display::{fmt_signed_percent, info_banner, section, sparkline, table};
use crate::query::QueryService;

#[derive(Args, Clone)]
pub struct BenchmarksArgs {
    /// Benchmark ticker to inspect (e.g. ^GSPC); omit to list all
    pub ticker: Option<String>,

    /// History window in days
    #[arg(long, short = 'd', default_value = "365")]
    pub days: u32,

    /// Trigger a benchmark data sync instead of reading
    #[arg(long)]
    pub sync: bool,
}

pub struct BenchmarksCommand {
    args: BenchmarksArgs,
}

impl BenchmarksCommand {
    pub fn new(args: BenchmarksArgs) -> Self {
        Self { args }
    }

    pub async fn execute(&self, service: &QueryService, _data_paths: &DataPaths) -> Result<()> {
        if self.args.sync {
            let result = service.sync_benchmarks(self.args.days).await?;
            section("BENCHMARK SYNC");
            if result.synced.is_empty() {
                info_banner("No active benchmarks to sync");
            } else {
                for (ticker, count) in &result.synced {
                    println!("{:<10} {} records", ticker, count.to_string().bright_green());
                }
            }
            return Ok(());
        }

        match &self.args.ticker {
            Some(ticker) => self.show_benchmark(service, ticker).await,
            None => self.list_benchmarks(service).await,
        }
    }

    async fn list_benchmarks(&self, service: &QueryService) -> Result<()> {
        let benchmarks = service.benchmarks().await?;
        info!(count = benchmarks.len(), "benchmarks listed");

        section("BENCHMARKS");
        if benchmarks.is_empty() {
            info_banner("No benchmarks configured on the backend");
            return Ok(());
        }

        let mut t = table(vec!["Ticker", "Name", "Active"]);
        for b in &benchmarks {
            t.add_row(vec![
                b.ticker.clone(),
                b.name.clone().unwrap_or_default(),
                if b.active {
                    "yes".bright_green().to_string()
                } else {
                    "no".bright_black().to_string()
                },
            ]);
        }
        println!("{t}");
        Ok(())
    }

    async fn show_benchmark(&self, service: &QueryService, ticker: &str) -> Result<()> {
        let days = self.args.days;
        let (data, returns) = tokio::join!(
            service.benchmark_data(ticker, days),
            service.benchmark_returns(ticker, days),
        );

        section(&format!("{ticker} ({days}d)"));

        match data {
            Ok(data) => {
                if data.data.is_empty() {
                    info_banner("No price history stored for this benchmark");
                } else {
                    let closes: Vec<f64> = data.data.iter().map(|p| p.close).collect();
                    println!("{}", sparkline(&closes, 48).bright_magenta());
                    let first = data.data.first();
                    let last = data.data.last();
                    if let (Some(first), Some(last)) = (first, last) {
                        println!(
                            "{} {:.2} → {} {:.2}  ({} points)",
                            first.date.bright_black(),
                            first.close,
                            last.date.bright_black(),
                            last.close,
                            data.data.len()
                        );
                    }
                }
            }
            Err(e) => crate::display::error_panel("PRICE HISTORY", &e),
        }

        match returns {
            Ok(returns) => {
                println!(
                    "\nCumulative return: {}  Annualized: {}",
                    fmt_signed_percent(returns.cumulative_return_percent),
                    fmt_signed_percent(returns.annualized_return_percent)
                );
            }
            Err(e) => crate::display::error_panel("RETURNS", &e),
        }

        Ok(())
    }
}
