//! Transactions command: list with server-side range/limit, local type
//! filter and free-text search, summary statistics and CSV export.

use anyhow::Result;
use chrono::Utc;
use clap::Args;
use owo_colors::OwoColorize;
use tracing::info;

use crate::api::transactions::{Transaction, TransactionQuery, TransactionSummary, TransactionType};
use crate::data_paths::DataPaths;
use crate::display::{fmt_currency, section, table};
use crate::query::QueryService;
use crate::views::export::{export_filename, transactions_csv, write_export};
use crate::views::{filter_transactions, sort_transactions, TransactionSort};

#[derive(Args, Clone)]
pub struct TransactionsArgs {
    /// Filter by ticker (server-side; "all" for no filter)
    #[arg(long, short = 't')]
    pub ticker: Option<String>,

    /// Filter by transaction type
    #[arg(long = "type", value_enum)]
    pub tx_type: Option<TransactionType>,

    /// Case-insensitive search over ticker and notes
    #[arg(long, short = 'q')]
    pub search: Option<String>,

    /// Start date (YYYY-MM-DD, server-side)
    #[arg(long)]
    pub start: Option<String>,

    /// End date (YYYY-MM-DD, server-side)
    #[arg(long)]
    pub end: Option<String>,

    /// Maximum number of transactions to fetch
    #[arg(long, short = 'n')]
    pub limit: Option<u32>,

    /// Sort field
    #[arg(long, short = 's', value_enum, default_value = "date")]
    pub sort: TransactionSort,

    /// Sort descending
    #[arg(long)]
    pub desc: bool,

    /// Show summary statistics instead of the list
    #[arg(long)]
    pub summary: bool,

    /// Write the filtered view to a CSV file
    #[arg(long)]
    pub export: bool,
}

pub struct TransactionsCommand {
    args: TransactionsArgs,
}

impl TransactionsCommand {
    pub fn new(args: TransactionsArgs) -> Self {
        Self { args }
    }

    pub async fn execute(&self, service: &QueryService, data_paths: &DataPaths) -> Result<()> {
        if self.args.summary {
            let summary = service.transaction_summary().await?;
            render_summary(&summary);
            return Ok(());
        }

        let query = TransactionQuery {
            // "all" is a no-filter sentinel shared with the local filters
            ticker: self
                .args
                .ticker
                .clone()
                .filter(|t| !t.eq_ignore_ascii_case("all")),
            transaction_type: None,
            start_date: self.args.start.clone(),
            end_date: self.args.end.clone(),
            limit: self.args.limit,
        };

        let fetched = service.transactions(&query).await?;
        info!(count = fetched.len(), "transactions fetched");

        let mut view = filter_transactions(
            &fetched,
            self.args.tx_type,
            None,
            self.args.search.as_deref(),
        );
        sort_transactions(&mut view, self.args.sort, self.args.desc);

        render_transactions(&view, fetched.len());

        if self.args.export {
            let csv = transactions_csv(&view)?;
            let filename = export_filename("transactions", None, Utc::now().date_naive());
            let path = write_export(data_paths, &filename, &csv)?;
            println!("\n💾 Exported {} rows to {}", view.len(), path.display());
        }

        Ok(())
    }
}

fn render_transactions(transactions: &[Transaction], total_count: usize) {
    section(&format!(
        "TRANSACTIONS ({} of {})",
        transactions.len(),
        total_count
    ));

    if transactions.is_empty() {
        println!(
            "{}",
            "No transactions match the current filters".bright_black().italic()
        );
        return;
    }

    let mut t = table(vec!["Id", "Date", "Ticker", "Type", "Qty", "Price", "Amount", "Notes"]);
    for tx in transactions {
        let type_display = match tx.transaction_type {
            TransactionType::Buy => tx.transaction_type.to_string().bright_green().to_string(),
            TransactionType::Sell => tx.transaction_type.to_string().bright_red().to_string(),
            TransactionType::Dividend => {
                tx.transaction_type.to_string().bright_blue().to_string()
            }
            _ => tx.transaction_type.to_string(),
        };

        t.add_row(vec![
            tx.id.to_string(),
            tx.transaction_date.clone(),
            tx.ticker.clone(),
            type_display,
            format!("{:.2}", tx.quantity),
            tx.price_per_share
                .map(|p| format!("${p:.2}"))
                .unwrap_or_else(|| "—".to_string()),
            format!("${:.2}", tx.total_amount),
            tx.notes.clone().unwrap_or_default(),
        ]);
    }
    println!("{t}");
}

fn render_summary(summary: &TransactionSummary) {
    section("TRANSACTION SUMMARY");

    println!("Total transactions: {}", summary.total_transactions);
    if !summary.by_type.is_empty() {
        for (tx_type, count) in &summary.by_type {
            println!("  {:<10} {}", tx_type, count);
        }
    }

    println!("\nInvested:  {}", fmt_currency(summary.total_invested));
    println!("Proceeds:  {}", fmt_currency(summary.total_proceeds));
    println!(
        "Dividends: {}",
        fmt_currency(summary.total_dividends).bright_green()
    );
    println!("Fees:      {}", fmt_currency(summary.total_fees).bright_red());
}
