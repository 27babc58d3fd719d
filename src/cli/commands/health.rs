//! Health command: backend connectivity check.

use anyhow::Result;
use clap::Args;
use owo_colors::OwoColorize;

use crate::data_paths::DataPaths;
use crate::query::QueryService;

#[derive(Args, Clone)]
pub struct HealthArgs {}

pub struct HealthCommand {
    _args: HealthArgs,
}

impl HealthCommand {
    pub fn new(args: HealthArgs) -> Self {
        Self { _args: args }
    }

    pub async fn execute(&self, service: &QueryService, _data_paths: &DataPaths) -> Result<()> {
        println!("Backend: {}", service.api().base_url());

        match service.health().await {
            Ok(status) if status.is_healthy() => {
                println!("{} Backend is healthy", "✓".bright_green());
                if let Some(timestamp) = &status.timestamp {
                    println!("{} {}", "Reported at:".bright_black(), timestamp);
                }
            }
            Ok(status) => {
                println!(
                    "{} Backend responded with status: {}",
                    "⚠".yellow(),
                    status.status.yellow()
                );
            }
            Err(e) => {
                println!("{} {}", "✗".bright_red(), e.to_string().bright_red());
                return Err(e.into());
            }
        }

        Ok(())
    }
}
