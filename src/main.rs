//! Trend chart CLI application.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands, LogLevel};
use std::path::Path;
use trendchart_config::load_config;
use trendchart_monitor::setup_logging;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::ValidateConfig = cli.command {
        let level = cli.log_level.as_ref().map_or("info", LogLevel::as_str);
        setup_logging(level, cli.json_logs, None);
        return cli::commands::validate::run(&cli.config).await;
    }

    let config = load_config(&cli.config)
        .with_context(|| format!("Failed to load configuration from {:?}", cli.config))?;

    // Keep the guard alive so file logs are flushed on exit
    let json = cli.json_logs || config.logging.format == "json";
    let level = effective_level(cli.log_level.as_ref(), &config.logging.level);
    let _guard = setup_logging(
        level,
        json,
        config.logging.file.as_deref().map(Path::new),
    );

    match cli.command {
        Commands::Batch(args) => cli::commands::batch::run(args, &config).await,
        Commands::Chart(args) => cli::commands::chart::run(args, &config).await,
        Commands::Candles(args) => cli::commands::candles::run(args, &config).await,
        Commands::ValidateConfig => cli::commands::validate::run(&cli.config).await,
    }
}

/// The command-line level wins; otherwise `logging.level` from the config.
fn effective_level<'a>(flag: Option<&LogLevel>, configured: &'a str) -> &'a str {
    flag.map_or(configured, |level| level.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_level() {
        assert_eq!(effective_level(None, "warn"), "warn");
        assert_eq!(effective_level(Some(&LogLevel::Trace), "warn"), "trace");
    }
}
