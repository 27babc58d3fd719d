//! CLI module for folio
//!
//! Argument parsing and command dispatch. Each dashboard page is a
//! subcommand with a dedicated Args/Command pair under `commands/`; the
//! query service (HTTP client + cache) is built once here and handed to
//! whichever command runs.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

pub mod commands;

use crate::api::{ApiClient, DEFAULT_API_URL};
use crate::cache::QueryCache;
use crate::data_paths::{DataPaths, DEFAULT_DATA_DIR};
use crate::logging::{init_logging, LoggingConfig};
use crate::query::QueryService;

use commands::add::{AddArgs, AddCommand};
use commands::benchmarks::{BenchmarksArgs, BenchmarksCommand};
use commands::dashboard::{DashboardArgs, DashboardCommand};
use commands::delete::{DeleteArgs, DeleteCommand};
use commands::health::{HealthArgs, HealthCommand};
use commands::holdings::{HoldingsArgs, HoldingsCommand};
use commands::import::{ImportArgs, ImportCommand};
use commands::optimize::{OptimizeArgs, OptimizeCommand};
use commands::performance::{PerformanceArgs, PerformanceCommand};
use commands::risk::{RiskArgs, RiskCommand};
use commands::sync::{SyncArgs, SyncCommand};
use commands::transactions::{TransactionsArgs, TransactionsCommand};
use commands::version::{VersionArgs, VersionCommand};

#[derive(Parser)]
#[command(name = "folio")]
#[command(version)]
#[command(about = "Terminal dashboard for a self-hosted portfolio analytics API", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Backend API base URL
    #[arg(long, global = true, env = "FOLIO_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Data directory path (logs, CSV exports)
    #[arg(long, global = true, default_value = DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,

    /// Verbose logging
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Portfolio overview: summary, top holdings, sectors, value history
    Dashboard(DashboardArgs),

    /// List holdings with filter, search, sort and CSV export
    Holdings(HoldingsArgs),

    /// Performance metrics, attribution and benchmark comparison
    Performance(PerformanceArgs),

    /// Risk metrics: volatility, Sharpe, beta, VaR, drawdown, correlation
    Risk(RiskArgs),

    /// Portfolio optimization, Monte Carlo and rebalancing
    Optimize(OptimizeArgs),

    /// List transactions with filter, search, summary and CSV export
    Transactions(TransactionsArgs),

    /// Record a new transaction
    Add(AddArgs),

    /// Delete a transaction by id
    Delete(DeleteArgs),

    /// Import transactions from a CSV file (dry run, then commit)
    Import(ImportArgs),

    /// Benchmark indices: list, history, returns, data sync
    Benchmarks(BenchmarksArgs),

    /// Portfolio sync status and manual trigger
    Sync(SyncArgs),

    /// Check backend connectivity
    Health(HealthArgs),

    /// Show version information
    Version(VersionArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        let data_paths = DataPaths::new(&self.data_dir);
        data_paths.ensure_directories()?;

        init_logging(LoggingConfig::new(data_paths.clone(), self.verbose))?;

        let api = ApiClient::new(&self.api_url)?;
        let service = QueryService::new(api, Arc::new(QueryCache::new()));

        match self.command {
            Commands::Dashboard(args) => {
                DashboardCommand::new(args).execute(&service, &data_paths).await
            }
            Commands::Holdings(args) => {
                HoldingsCommand::new(args).execute(&service, &data_paths).await
            }
            Commands::Performance(args) => {
                PerformanceCommand::new(args).execute(&service, &data_paths).await
            }
            Commands::Risk(args) => RiskCommand::new(args).execute(&service, &data_paths).await,
            Commands::Optimize(args) => {
                OptimizeCommand::new(args).execute(&service, &data_paths).await
            }
            Commands::Transactions(args) => {
                TransactionsCommand::new(args).execute(&service, &data_paths).await
            }
            Commands::Add(args) => AddCommand::new(args).execute(&service, &data_paths).await,
            Commands::Delete(args) => DeleteCommand::new(args).execute(&service, &data_paths).await,
            Commands::Import(args) => ImportCommand::new(args).execute(&service, &data_paths).await,
            Commands::Benchmarks(args) => {
                BenchmarksCommand::new(args).execute(&service, &data_paths).await
            }
            Commands::Sync(args) => SyncCommand::new(args).execute(&service, &data_paths).await,
            Commands::Health(args) => HealthCommand::new(args).execute(&service, &data_paths).await,
            Commands::Version(args) => {
                VersionCommand::new(args).execute(&service, &data_paths).await
            }
        }
    }
}
