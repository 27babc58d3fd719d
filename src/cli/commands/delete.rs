//! Delete command: remove a transaction by id.
//!
//! Destructive, so the record is shown and `--yes` is required before the
//! request is issued. A successful delete invalidates the transaction and
//! portfolio-derived caches through the query service.

use anyhow::Result;
use clap::Args;
use owo_colors::OwoColorize;
use tracing::info;

use crate::data_paths::DataPaths;
use crate::query::QueryService;

#[derive(Args, Clone)]
pub struct DeleteArgs {
    /// Transaction id to delete
    pub id: i64,

    /// Confirm the deletion
    #[arg(long, short = 'y')]
    pub yes: bool,
}

pub struct DeleteCommand {
    args: DeleteArgs,
}

impl DeleteCommand {
    pub fn new(args: DeleteArgs) -> Self {
        Self { args }
    }

    pub async fn execute(&self, service: &QueryService, _data_paths: &DataPaths) -> Result<()> {
        let transaction = service.transaction(self.args.id).await?;

        println!(
            "Transaction {}: {} {} {} on {} for ${:.2}",
            transaction.id,
            transaction.transaction_type,
            transaction.quantity,
            transaction.ticker.bright_white(),
            transaction.transaction_date,
            transaction.total_amount
        );

        if !self.args.yes {
            println!(
                "{}",
                "⚠️  Deletion requires confirmation. Re-run with --yes.".yellow()
            );
            return Ok(());
        }

        service.delete_transaction(self.args.id).await?;
        info!(id = self.args.id, "transaction deleted");

        println!("{} Transaction {} deleted", "✓".bright_green(), self.args.id);
        Ok(())
    }
}
