//! Validate configuration command.

use anyhow::Result;
use std::path::Path;
use trendchart_config::load_config;

pub async fn run(config_path: &Path) -> Result<()> {
    println!("Validating configuration: {:?}", config_path);

    match load_config(config_path) {
        Ok(config) => {
            println!("Configuration is valid!");
            println!();
            println!("App: {}", config.app.name);
            println!("Environment: {}", config.app.environment);
            println!("Log level: {}", config.logging.level);
            println!("Provider: {:?}", config.provider.kind);
            println!("Lookback: {} days", config.chart.lookback_days);
            println!("Fetch timeout: {}s", config.chart.fetch_timeout_secs);
            println!("Chart size: {}x{}", config.chart.width, config.chart.height);
            println!();
            println!("Effective configuration:");
            println!("{}", config.to_toml()?);
        }
        Err(e) => {
            println!("Configuration error: {}", e);
            return Err(e.into());
        }
    }

    Ok(())
}
