//! Risk command: volatility, Sharpe, beta, VaR, max drawdown and the
//! correlation matrix — all computed server-side, rendered here.
//!
//! Insufficient history is a payload condition (`data_points: 0` or a
//! message), rendered as an informational banner rather than an error.

use anyhow::Result;
use chrono::Utc;
use clap::{Args, ValueEnum};
use owo_colors::OwoColorize;
use tracing::info;

use crate::api::risk::{Beta, CorrelationMatrix, MaxDrawdown, RiskReport, SharpeRatio, ValueAtRisk, Volatility};
use crate::data_paths::DataPaths;
use crate::display::{
    error_panel, fmt_currency, fmt_percent, fmt_signed_percent, info_banner, section, table,
};
use crate::query::QueryService;
use crate::views::export::{export_filename, risk_report_csv, write_export};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RiskMetric {
    /// Full report plus correlation matrix (default)
    All,
    Volatility,
    Sharpe,
    Beta,
    Var,
    Drawdown,
    Correlation,
}

#[derive(Args, Clone)]
pub struct RiskArgs {
    /// Analysis window in days
    #[arg(long, short = 'd', default_value = "365")]
    pub days: u32,

    /// Which metric to show
    #[arg(long, short = 'm', value_enum, default_value = "all")]
    pub metric: RiskMetric,

    /// Benchmark for beta
    #[arg(long, short = 'b', default_value = "^GSPC")]
    pub benchmark: String,

    /// VaR confidence level
    #[arg(long, default_value = "0.95")]
    pub confidence: f64,

    /// Write the risk report to a CSV file
    #[arg(long)]
    pub export: bool,
}

pub struct RiskCommand {
    args: RiskArgs,
}

impl RiskCommand {
    pub fn new(args: RiskArgs) -> Self {
        Self { args }
    }

    pub async fn execute(&self, service: &QueryService, data_paths: &DataPaths) -> Result<()> {
        let days = self.args.days;
        info!(days, metric = ?self.args.metric, "loading risk page");

        println!("\n🛡️  {}", "Risk Analysis".bright_white().bold());

        match self.args.metric {
            RiskMetric::All => {
                let (report, correlation) =
                    tokio::join!(service.risk_report(days), service.correlation_matrix(days));

                match report {
                    Ok(report) => {
                        if report.is_insufficient() {
                            info_banner("Not enough history for risk analysis yet");
                        } else {
                            render_report(&report);
                        }

                        if self.args.export {
                            let csv = risk_report_csv(&report)?;
                            let filename =
                                export_filename("risk", Some(days), Utc::now().date_naive());
                            let path = write_export(data_paths, &filename, &csv)?;
                            println!("\n💾 Exported risk report to {}", path.display());
                        }
                    }
                    Err(e) => error_panel("RISK REPORT", &e),
                }

                match correlation {
                    Ok(correlation) => render_correlation(&correlation),
                    Err(e) => error_panel("CORRELATION", &e),
                }
            }
            RiskMetric::Volatility => render_volatility(&service.volatility(days).await?),
            RiskMetric::Sharpe => render_sharpe(&service.sharpe_ratio(days).await?),
            RiskMetric::Beta => {
                render_beta(&service.beta(days, &self.args.benchmark).await?, &self.args.benchmark)
            }
            RiskMetric::Var => {
                render_var(&service.value_at_risk(days, self.args.confidence).await?)
            }
            RiskMetric::Drawdown => render_drawdown(&service.max_drawdown(days).await?),
            RiskMetric::Correlation => render_correlation(&service.correlation_matrix(days).await?),
        }

        println!();
        Ok(())
    }
}

fn render_report(report: &RiskReport) {
    if let Some(v) = &report.volatility {
        render_volatility(v);
    }
    if let Some(s) = &report.sharpe_ratio {
        render_sharpe(s);
    }
    if let Some(b) = &report.beta {
        render_beta(b, "^GSPC");
    }
    if let Some(v) = &report.value_at_risk {
        render_var(v);
    }
    if let Some(d) = &report.max_drawdown {
        render_drawdown(d);
    }
}

fn render_volatility(v: &Volatility) {
    section("VOLATILITY");
    if v.data_points == 0 {
        info_banner("Not enough history to estimate volatility");
        return;
    }
    println!("Annualized: {}", fmt_percent(v.annualized_volatility));
    println!("Daily:      {}", fmt_percent(v.daily_volatility));
    println!("{}", format!("{} data points", v.data_points).bright_black());
}

fn render_sharpe(s: &SharpeRatio) {
    section("SHARPE RATIO");
    let colored = if s.sharpe_ratio >= 1.0 {
        format!("{:.2}", s.sharpe_ratio).bright_green().to_string()
    } else if s.sharpe_ratio >= 0.0 {
        format!("{:.2}", s.sharpe_ratio).yellow().to_string()
    } else {
        format!("{:.2}", s.sharpe_ratio).bright_red().to_string()
    };
    println!("Sharpe: {colored}");
    println!(
        "Return {} / Volatility {} (risk-free {})",
        fmt_percent(s.annualized_return * 100.0),
        fmt_percent(s.annualized_volatility * 100.0),
        fmt_percent(s.risk_free_rate * 100.0)
    );
}

fn render_beta(b: &Beta, benchmark: &str) {
    section(&format!("BETA vs {benchmark}"));
    if b.data_points == 0 {
        info_banner("Not enough overlapping history with the benchmark");
        return;
    }
    println!("Beta:        {:.2}", b.beta);
    println!("Alpha:       {}", fmt_signed_percent(b.alpha * 100.0));
    println!("R²:          {:.3}", b.r_squared);
    println!("Correlation: {:.3}", b.correlation);
}

fn render_var(v: &ValueAtRisk) {
    section(&format!(
        "VALUE AT RISK ({}% confidence)",
        (v.confidence_level * 100.0).round()
    ));
    if v.data_points == 0 {
        info_banner("Not enough history to estimate VaR");
        return;
    }
    println!(
        "One-day VaR: {} ({})",
        fmt_currency(v.var_amount.abs()).bright_red(),
        fmt_percent(v.var_percent.abs())
    );
    println!(
        "{}",
        format!("on a portfolio of {}", fmt_currency(v.current_value)).bright_black()
    );
}

fn render_drawdown(d: &MaxDrawdown) {
    section("MAX DRAWDOWN");
    if d.data_points == 0 {
        info_banner("Not enough history to measure drawdown");
        return;
    }
    println!(
        "Max drawdown: {} ({})",
        fmt_percent(d.max_drawdown_percent.abs()).bright_red(),
        fmt_currency(d.max_drawdown_amount.abs())
    );
    if let (Some(peak), Some(trough)) = (&d.peak_date, &d.trough_date) {
        println!("Peak {} → trough {}", peak, trough);
    }
    match &d.recovery_date {
        Some(recovery) => println!("Recovered: {recovery}"),
        None => println!("{}", "Not yet recovered".yellow()),
    }
}

fn render_correlation(matrix: &CorrelationMatrix) {
    section("CORRELATION MATRIX");

    if matrix.is_insufficient() {
        let message = matrix
            .message
            .as_deref()
            .unwrap_or("Not enough holdings for correlation analysis");
        info_banner(message);
        return;
    }

    let mut headers = vec![""];
    headers.extend(matrix.tickers.iter().map(String::as_str));
    let mut t = table(headers);

    for (ticker, row) in matrix.tickers.iter().zip(&matrix.matrix) {
        let mut cells = vec![ticker.clone()];
        cells.extend(row.iter().map(|c| format!("{c:.2}")));
        t.add_row(cells);
    }
    println!("{t}");
    println!(
        "{}",
        format!("{} data points", matrix.data_points).bright_black()
    );
}
