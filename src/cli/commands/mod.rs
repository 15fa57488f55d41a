//! CLI command implementations.

pub mod batch;
pub mod candles;
pub mod chart;
pub mod validate;

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use trendchart_config::{AppConfig, ProviderKind};
use trendchart_core::traits::SeriesProvider;
use trendchart_data::{CsvSeriesProvider, YahooConfig, YahooProvider};
use trendchart_render::{PlotlyRenderer, RenderSettings};
use trendchart_service::{ChartService, ServiceConfig};
use tracing::info;

/// Wire provider, renderer and service from configuration.
pub fn build_service(config: &AppConfig) -> Result<ChartService> {
    let provider: Arc<dyn SeriesProvider> = match config.provider.kind {
        ProviderKind::Yahoo => Arc::new(
            YahooProvider::new(YahooConfig {
                base_url: config.provider.base_url.clone(),
                user_agent: config.provider.user_agent.clone(),
                request_timeout_secs: config.provider.request_timeout_secs,
            })
            .context("Failed to create Yahoo provider")?,
        ),
        ProviderKind::Csv => {
            let dir = config
                .provider
                .data_dir
                .as_deref()
                .context("provider.data_dir is required for the csv provider")?;
            Arc::new(CsvSeriesProvider::new(dir).context("Failed to open CSV data directory")?)
        }
    };
    info!(provider = provider.name(), "Using series provider");

    let renderer = PlotlyRenderer::new(RenderSettings {
        width: config.chart.width,
        height: config.chart.height,
    });

    Ok(ChartService::new(
        provider,
        Arc::new(renderer),
        ServiceConfig {
            fetch_timeout: Duration::from_secs(config.chart.fetch_timeout_secs),
            lookback_days: config.chart.lookback_days,
        },
    ))
}

/// Write a rendered page and report where it went.
pub fn write_page(path: &Path, html: &str) -> Result<()> {
    std::fs::write(path, html)
        .with_context(|| format!("Failed to write '{}'", path.display()))?;
    println!("Wrote {}", path.display());
    Ok(())
}
