//! Holdings command: the full holdings table with local filter, search,
//! sort and CSV export.

use anyhow::Result;
use chrono::Utc;
use clap::Args;
use owo_colors::OwoColorize;
use tracing::info;

use crate::api::portfolio::Holding;
use crate::data_paths::DataPaths;
use crate::display::{fmt_currency, fmt_percent, fmt_signed_currency, fmt_signed_percent, section, table};
use crate::query::QueryService;
use crate::views::export::{export_filename, holdings_csv, write_export};
use crate::views::summary::{holdings_totals, weight_percent, weighted_average_gain_percent};
use crate::views::{filter_holdings, sort_holdings, HoldingSort};

#[derive(Args, Clone)]
pub struct HoldingsArgs {
    /// Filter by sector ("all" for no filter)
    #[arg(long)]
    pub sector: Option<String>,

    /// Case-insensitive search over symbol and company name
    #[arg(long, short = 'q')]
    pub search: Option<String>,

    /// Sort field
    #[arg(long, short = 's', value_enum, default_value = "value")]
    pub sort: HoldingSort,

    /// Sort descending
    #[arg(long)]
    pub desc: bool,

    /// Maximum number of rows to display
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,

    /// Show holdings as of a historical snapshot id instead of the latest
    #[arg(long)]
    pub snapshot: Option<i64>,

    /// Write the filtered view to a CSV file under the exports directory
    #[arg(long)]
    pub export: bool,
}

pub struct HoldingsCommand {
    args: HoldingsArgs,
}

impl HoldingsCommand {
    pub fn new(args: HoldingsArgs) -> Self {
        Self { args }
    }

    pub async fn execute(&self, service: &QueryService, data_paths: &DataPaths) -> Result<()> {
        let all = match self.args.snapshot {
            Some(snapshot_id) => service.snapshot_holdings(snapshot_id).await?,
            None => service.holdings(None).await?,
        };
        info!(count = all.len(), snapshot = ?self.args.snapshot, "holdings fetched");

        let mut view = filter_holdings(
            &all,
            self.args.sector.as_deref(),
            self.args.search.as_deref(),
        );
        sort_holdings(&mut view, self.args.sort, self.args.desc);

        if let Some(limit) = self.args.limit {
            view.truncate(limit);
        }

        render_holdings(&view, all.len());

        if self.args.export {
            let csv = holdings_csv(&view)?;
            let filename = export_filename("holdings", None, Utc::now().date_naive());
            let path = write_export(data_paths, &filename, &csv)?;
            println!("\n💾 Exported {} rows to {}", view.len(), path.display());
        }

        Ok(())
    }
}

fn render_holdings(holdings: &[Holding], total_count: usize) {
    section(&format!("HOLDINGS ({} of {})", holdings.len(), total_count));

    if holdings.is_empty() {
        println!("{}", "No holdings match the current filters".bright_black().italic());
        return;
    }

    let totals = holdings_totals(holdings);

    let mut t = table(vec![
        "Symbol", "Name", "Qty", "Price", "Value", "Weight", "Gain/Loss", "G/L %", "Sector",
    ]);
    for h in holdings {
        // weight of the filtered view, not the server-side weight, so a
        // filtered table still sums to ~100%
        let view_weight = weight_percent(h.value, totals.total_value);
        t.add_row(vec![
            h.symbol.clone(),
            h.company_name.clone().unwrap_or_default(),
            format!("{:.2}", h.quantity),
            fmt_currency(h.last_price),
            fmt_currency(h.value),
            format!("{:.1}%", view_weight),
            fmt_signed_currency(h.gain_loss_or_zero()),
            h.gain_loss_percent
                .map(fmt_signed_percent)
                .unwrap_or_else(|| "—".to_string()),
            h.sector_label().to_string(),
        ]);
    }
    println!("{t}");

    println!(
        "Total: {} | Gain/Loss: {} ({}) | Weighted avg: {}",
        fmt_currency(totals.total_value).bright_green(),
        fmt_signed_currency(totals.total_gain_loss),
        fmt_percent(totals.gain_loss_percent),
        fmt_signed_percent(weighted_average_gain_percent(holdings)),
    );
}
