//! Candlestick command implementation.

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use trendchart_config::AppConfig;
use trendchart_render::{render_page, PageSection, SectionBody};
use trendchart_service::normalize_symbol;

use super::{build_service, write_page};
use crate::cli::CandlesArgs;

fn parse_day(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", raw))
}

pub async fn run(args: CandlesArgs, config: &AppConfig) -> Result<()> {
    let symbol = normalize_symbol(&args.symbol)?.context("A symbol is required")?;
    let start = parse_day(&args.start)?;
    let end = match &args.end {
        Some(raw) => parse_day(raw)?,
        None => Utc::now().date_naive(),
    };

    let service = build_service(config)?;
    let markup = service
        .create_candles(&symbol, start, end)
        .await
        .with_context(|| format!("Failed to chart {}", symbol))?;

    let title = format!("{} Candlestick Chart", symbol);
    let page = render_page(
        &title,
        &[PageSection {
            heading: &format!("{} to {}", start, end),
            body: SectionBody::Chart(&markup),
        }],
    );
    write_page(&args.output, &page)
}
