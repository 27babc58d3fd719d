//! CSV export assembly for the download-style reports.
//!
//! Exports always reflect the currently filtered and sorted view, and the
//! filename embeds the current date plus the selected period where one
//! applies. Quoting goes through the `csv` writer, so embedded delimiters
//! are quoted and embedded quotes doubled per RFC 4180.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::path::PathBuf;

use crate::api::analytics::{AttributionEntry, PerformanceSummary};
use crate::api::portfolio::Holding;
use crate::api::risk::RiskReport;
use crate::api::transactions::Transaction;
use crate::data_paths::DataPaths;

pub fn holdings_csv(rows: &[Holding]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "symbol",
        "company_name",
        "quantity",
        "last_price",
        "value",
        "weight_percent",
        "gain_loss",
        "gain_loss_percent",
        "sector",
    ])?;

    for h in rows {
        writer.write_record([
            h.symbol.clone(),
            h.company_name.clone().unwrap_or_default(),
            h.quantity.to_string(),
            h.last_price.to_string(),
            h.value.to_string(),
            h.weight_or_zero().to_string(),
            h.gain_loss_or_zero().to_string(),
            h.gain_loss_percent.unwrap_or(0.0).to_string(),
            h.sector.clone().unwrap_or_default(),
        ])?;
    }

    finish(writer)
}

pub fn transactions_csv(rows: &[Transaction]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "id",
        "date",
        "ticker",
        "type",
        "quantity",
        "price_per_share",
        "total_amount",
        "fees",
        "notes",
    ])?;

    for t in rows {
        writer.write_record([
            t.id.to_string(),
            t.transaction_date.clone(),
            t.ticker.clone(),
            t.transaction_type.as_str().to_string(),
            t.quantity.to_string(),
            t.price_per_share.map(|p| p.to_string()).unwrap_or_default(),
            t.total_amount.to_string(),
            t.fees.map(|f| f.to_string()).unwrap_or_default(),
            t.notes.clone().unwrap_or_default(),
        ])?;
    }

    finish(writer)
}

/// Analytics report: headline return metrics followed by per-holding
/// attribution rows.
pub fn analytics_report_csv(
    performance: &PerformanceSummary,
    attribution: &[AttributionEntry],
) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["symbol", "weight", "return_percent", "contribution"])?;

    if let Some(twr) = &performance.twr {
        writer.write_record([
            "TWR".to_string(),
            String::new(),
            twr.twr_percent.to_string(),
            String::new(),
        ])?;
    }
    if let Some(mwr) = &performance.mwr {
        writer.write_record([
            "MWR".to_string(),
            String::new(),
            mwr.mwr_percent.to_string(),
            String::new(),
        ])?;
    }

    for entry in attribution {
        writer.write_record([
            entry.symbol.clone(),
            entry.weight.to_string(),
            entry.return_percent.to_string(),
            entry.contribution.to_string(),
        ])?;
    }

    finish(writer)
}

/// Risk report as metric/value rows
pub fn risk_report_csv(report: &RiskReport) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["metric", "value"])?;

    let mut metric = |name: &str, value: f64| writer.write_record([name.to_string(), value.to_string()]);

    if let Some(v) = &report.volatility {
        metric("annualized_volatility", v.annualized_volatility)?;
        metric("daily_volatility", v.daily_volatility)?;
    }
    if let Some(s) = &report.sharpe_ratio {
        metric("sharpe_ratio", s.sharpe_ratio)?;
        metric("annualized_return", s.annualized_return)?;
    }
    if let Some(b) = &report.beta {
        metric("beta", b.beta)?;
        metric("alpha", b.alpha)?;
        metric("r_squared", b.r_squared)?;
    }
    if let Some(v) = &report.value_at_risk {
        metric("var_percent", v.var_percent)?;
        metric("var_amount", v.var_amount)?;
    }
    if let Some(d) = &report.max_drawdown {
        metric("max_drawdown_percent", d.max_drawdown_percent)?;
        metric("max_drawdown_amount", d.max_drawdown_amount)?;
    }

    finish(writer)
}

/// `holdings_2026-08-07.csv` or `performance_90d_2026-08-07.csv`
pub fn export_filename(prefix: &str, period_days: Option<u32>, date: NaiveDate) -> String {
    match period_days {
        Some(days) => format!("{prefix}_{days}d_{}.csv", date.format("%Y-%m-%d")),
        None => format!("{prefix}_{}.csv", date.format("%Y-%m-%d")),
    }
}

/// Write an export under `<data-dir>/exports/` and return its path
pub fn write_export(paths: &DataPaths, filename: &str, contents: &str) -> Result<PathBuf> {
    paths.ensure_directories()?;
    let path = paths.exports().join(filename);
    std::fs::write(&path, contents).with_context(|| format!("writing export {}", path.display()))?;
    Ok(path)
}

fn finish(mut writer: csv::Writer<Vec<u8>>) -> Result<String> {
    writer.flush().context("flushing csv writer")?;
    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("finishing csv writer: {e}"))?;
    String::from_utf8(bytes).context("csv output was not utf-8")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn holding(symbol: &str, company: &str, value: f64) -> Holding {
        Holding {
            symbol: symbol.to_string(),
            company_name: Some(company.to_string()),
            quantity: 10.0,
            last_price: value / 10.0,
            value,
            cost_basis: None,
            gain_loss: Some(50.0),
            gain_loss_percent: Some(5.0),
            portfolio_weight: Some(50.0),
            sector: Some("Technology".to_string()),
            industry: None,
            last_updated: None,
        }
    }

    #[test]
    fn test_export_has_header_plus_one_line_per_row() {
        let rows = vec![
            holding("AAPL", "Apple Inc", 1000.0),
            holding("MSFT", "Microsoft Corp", 1000.0),
        ];
        let csv = holdings_csv(&rows).unwrap();
        let lines: Vec<&str> = csv.trim_end().lines().collect();
        assert_eq!(lines.len(), rows.len() + 1);
    }

    #[test]
    fn test_unquoted_rows_recover_fields_on_comma_split() {
        let rows = vec![holding("AAPL", "Apple Inc", 1000.0)];
        let csv = holdings_csv(&rows).unwrap();
        let data_row: Vec<&str> = csv.trim_end().lines().nth(1).unwrap().split(',').collect();
        assert_eq!(data_row[0], "AAPL");
        assert_eq!(data_row[1], "Apple Inc");
        assert_eq!(data_row[4], "1000");
        assert_eq!(data_row[8], "Technology");
    }

    #[test]
    fn test_fields_with_delimiters_are_quoted() {
        let rows = vec![holding("BRK.B", "Berkshire Hathaway, Class B", 1000.0)];
        let csv = holdings_csv(&rows).unwrap();
        assert!(csv.contains("\"Berkshire Hathaway, Class B\""));
    }

    #[test]
    fn test_embedded_quotes_are_doubled() {
        let rows = vec![holding("Q", "The \"Quoted\" Company", 100.0)];
        let csv = holdings_csv(&rows).unwrap();
        assert!(csv.contains("\"The \"\"Quoted\"\" Company\""));
    }

    #[test]
    fn test_export_filename_embeds_date_and_period() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 7).unwrap();
        assert_eq!(export_filename("holdings", None, date), "holdings_2026-08-07.csv");
        assert_eq!(
            export_filename("performance", Some(90), date),
            "performance_90d_2026-08-07.csv"
        );
    }

    #[test]
    fn test_write_export_lands_in_exports_dir() {
        let dir = tempfile::tempdir().unwrap();
        let paths = DataPaths::new(dir.path().join("data"));
        let written = write_export(&paths, "holdings_2026-08-07.csv", "a,b\n1,2\n").unwrap();
        assert!(written.starts_with(paths.exports()));
        assert_eq!(std::fs::read_to_string(written).unwrap(), "a,b\n1,2\n");
    }
}
