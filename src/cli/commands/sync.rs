//! Sync command: show sync status, or trigger a manual sync and watch it
//! to completion.
//!
//! Watching polls the status resource on a backoff schedule instead of
//! sleeping a fixed delay; portfolio-derived caches are only invalidated
//! once completion is actually observed.

use anyhow::Result;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use std::time::Duration;
use tracing::{info, warn};

use crate::api::sync::SyncStatus;
use crate::data_paths::DataPaths;
use crate::display::section;
use crate::query::sync::{await_sync_completion, SyncOutcome, WatchConfig, WatchPhase};
use crate::query::QueryService;

#[derive(Args, Clone)]
pub struct SyncArgs {
    /// Trigger a manual sync
    #[arg(long)]
    pub trigger: bool,

    /// Return immediately after triggering instead of watching
    #[arg(long)]
    pub no_wait: bool,

    /// Maximum seconds to wait for completion
    #[arg(long, default_value = "120")]
    pub timeout: u64,

    /// Number of recent snapshots to show alongside the status
    #[arg(long, short = 'n', default_value = "5")]
    pub snapshots: u32,
}

pub struct SyncCommand {
    args: SyncArgs,
}

impl SyncCommand {
    pub fn new(args: SyncArgs) -> Self {
        Self { args }
    }

    pub async fn execute(&self, service: &QueryService, _data_paths: &DataPaths) -> Result<()> {
        if !self.args.trigger {
            let (status, snapshots) =
                tokio::join!(service.sync_status(), service.snapshots(self.args.snapshots, None));

            render_status(&status?);

            match snapshots {
                Ok(snapshots) => render_snapshots(&snapshots),
                Err(e) => crate::display::error_panel("RECENT SNAPSHOTS", &e),
            }
            return Ok(());
        }

        let triggered = service.trigger_sync().await?;
        info!("manual sync triggered");
        if let Some(message) = &triggered.message {
            println!("{} {}", "⟳".bright_blue(), message);
        } else {
            println!("{} Sync triggered", "⟳".bright_blue());
        }

        if self.args.no_wait {
            println!(
                "{}",
                "Not waiting for completion; portfolio data refreshes on its next fetch"
                    .bright_black()
            );
            return Ok(());
        }

        let config = WatchConfig {
            max_wait: Duration::from_secs(self.args.timeout),
            ..WatchConfig::default()
        };

        let bar = ProgressBar::new_spinner();
        bar.set_style(ProgressStyle::default_spinner());
        bar.set_message("Waiting for sync to start...");
        bar.enable_steady_tick(Duration::from_millis(100));

        let outcome = await_sync_completion(service.api(), &config, |phase| {
            let message = match phase {
                WatchPhase::Idle => "Waiting for sync to start...",
                WatchPhase::Syncing => "Sync in progress...",
                WatchPhase::Done => "Finishing up...",
                WatchPhase::Failed => "Sync reported an error",
            };
            bar.set_message(message);
        })
        .await;
        bar.finish_and_clear();

        match outcome? {
            SyncOutcome::Completed(status) => {
                service.mark_sync_complete();
                println!("{} Sync completed; portfolio caches refreshed", "✓".bright_green());
                if let Some(last) = &status.last_sync {
                    println!("{} {}", "Last sync:".bright_black(), last);
                }
            }
            SyncOutcome::Failed(status) => {
                let detail = status.last_error.as_deref().unwrap_or("no detail reported");
                println!("{} Sync failed: {}", "✗".bright_red(), detail.bright_red());
            }
            SyncOutcome::TimedOut => {
                warn!(timeout = self.args.timeout, "sync watch timed out");
                println!(
                    "{}",
                    format!(
                        "⚠️  Still running after {}s; check `folio sync` later. Cached data expires on its own.",
                        self.args.timeout
                    )
                    .yellow()
                );
            }
        }

        Ok(())
    }
}

fn render_snapshots(snapshots: &[crate::api::portfolio::Snapshot]) {
    if snapshots.is_empty() {
        return;
    }
    section("RECENT SNAPSHOTS");
    let mut t = crate::display::table(vec!["Id", "Timestamp", "Total Value"]);
    for s in snapshots {
        t.add_row(vec![
            s.id.to_string(),
            s.timestamp.clone(),
            format!("${:.2}", s.total_value),
        ]);
    }
    println!("{t}");
}

fn render_status(status: &SyncStatus) {
    section("SYNC STATUS");

    if status.is_running() {
        println!("{} {}", "⟳".bright_blue(), "Sync in progress".bright_blue());
    } else {
        println!("{} {}", "●".bright_green(), "Idle");
    }

    if let Some(last) = &status.last_sync {
        println!("{} {}", "Last sync:".bright_black(), last);
    }
    if let Some(next) = &status.next_scheduled {
        println!("{} {}", "Next scheduled:".bright_black(), next);
    }
    if let Some(error) = &status.last_error {
        println!("{} {}", "Last error:".bright_black(), error.bright_red());
    }
}
