//! Import command: two-phase CSV transaction import.
//!
//! Phase one is a dry run — the backend parses and validates without
//! persisting, and returns row counts, previews and per-row errors. Any
//! error blocks the commit. Phase two re-sends the file with persistence
//! enabled, after confirmation.

use anyhow::{anyhow, bail, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use crate::api::transactions::ImportReport;
use crate::data_paths::DataPaths;
use crate::display::{section, table};
use crate::query::QueryService;

#[derive(Args, Clone)]
pub struct ImportArgs {
    /// CSV file to import
    pub file: PathBuf,

    /// Skip the interactive confirmation after a clean dry run
    #[arg(long, short = 'y')]
    pub yes: bool,
}

pub struct ImportCommand {
    args: ImportArgs,
}

impl ImportCommand {
    pub fn new(args: ImportArgs) -> Self {
        Self { args }
    }

    pub async fn execute(&self, service: &QueryService, _data_paths: &DataPaths) -> Result<()> {
        let path = &self.args.file;
        validate_extension(path)?;

        let contents = std::fs::read(path)
            .map_err(|e| anyhow!("failed to read {}: {}", path.display(), e))?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("import.csv")
            .to_string();

        // Phase one: dry run
        let progress = spinner("Validating CSV against the backend...");
        let preview = service
            .import_transactions(&file_name, contents.clone(), true)
            .await;
        progress.finish_and_clear();
        let preview = preview?;

        render_preview(&preview);

        if !preview.can_commit() {
            if preview.errors.is_empty() {
                bail!("nothing to import: the file contained no valid rows");
            }
            bail!(
                "import blocked: {} row(s) failed validation — fix the file and run again",
                preview.errors.len()
            );
        }

        if !self.args.yes && !confirm(preview.valid_rows)? {
            println!("{}", "Import cancelled".yellow());
            return Ok(());
        }

        // Phase two: commit
        let progress = spinner("Importing transactions...");
        let report = service.import_transactions(&file_name, contents, false).await;
        progress.finish_and_clear();
        let report = report?;

        info!(imported = report.imported, "csv import committed");
        println!(
            "{} Imported {} transaction(s); portfolio caches refreshed",
            "✓".bright_green(),
            report.imported
        );
        Ok(())
    }
}

fn validate_extension(path: &Path) -> Result<()> {
    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("csv"))
        .unwrap_or(false);
    if !is_csv {
        bail!("{} is not a .csv file", path.display());
    }
    Ok(())
}

fn render_preview(preview: &ImportReport) {
    section("DRY RUN");
    println!(
        "Rows: {} total, {} valid, {} with errors",
        preview.total_rows,
        preview.valid_rows.to_string().bright_green(),
        preview.errors.len().to_string().bright_red()
    );

    if !preview.transactions.is_empty() {
        let mut t = table(vec!["Date", "Ticker", "Type", "Qty", "Amount"]);
        for tx in preview.transactions.iter().take(10) {
            t.add_row(vec![
                tx.transaction_date.clone().unwrap_or_default(),
                tx.ticker.clone().unwrap_or_default(),
                tx.transaction_type.clone().unwrap_or_default(),
                format!("{:.2}", tx.quantity),
                format!("${:.2}", tx.total_amount),
            ]);
        }
        println!("{t}");
        if preview.transactions.len() > 10 {
            println!(
                "{}",
                format!("... and {} more", preview.transactions.len() - 10).bright_black()
            );
        }
    }

    if !preview.errors.is_empty() {
        println!("\n{}", "Errors:".bright_red());
        for error in &preview.errors {
            println!("  {} {}", "•".bright_red(), error);
        }
    }
}

fn confirm(valid_rows: u32) -> Result<bool> {
    print!("Import {valid_rows} transaction(s)? [y/N] ");
    std::io::stdout().flush()?;

    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

fn spinner(message: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(ProgressStyle::default_spinner());
    bar.set_message(message.to_string());
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_check() {
        assert!(validate_extension(Path::new("transactions.csv")).is_ok());
        assert!(validate_extension(Path::new("transactions.CSV")).is_ok());
        assert!(validate_extension(Path::new("transactions.xlsx")).is_err());
        assert!(validate_extension(Path::new("transactions")).is_err());
    }
}
