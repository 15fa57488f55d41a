//! Batch command implementation.

use anyhow::Result;
use trendchart_config::AppConfig;
use trendchart_render::{render_page, PageSection, SectionBody};
use trendchart_service::{BatchRequest, BatchResponse, ChartOutcome};
use tracing::info;

use super::{build_service, write_page};
use crate::cli::{BatchArgs, OutputFormat};

pub async fn run(args: BatchArgs, config: &AppConfig) -> Result<()> {
    let request = BatchRequest::new(&args.symbols)?;
    if request.is_empty() {
        anyhow::bail!("No symbols given; pass up to five with --symbols (e.g. -S AAPL,MSFT)");
    }

    info!(symbols = ?request.symbols(), "Charting batch");
    let service = build_service(config)?;
    let response = service.handle_batch(&request).await;

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&response)?),
        OutputFormat::Html => {
            write_page(&args.output, &batch_page(&response))?;
            println!(
                "{} rendered, {} failed",
                response.success_count(),
                response.failure_count()
            );
        }
    }
    Ok(())
}

fn batch_page(response: &BatchResponse) -> String {
    let texts: Vec<String> = response
        .charts
        .iter()
        .map(|c| c.outcome.display_text())
        .collect();

    let sections: Vec<PageSection<'_>> = response
        .charts
        .iter()
        .zip(&texts)
        .map(|(chart, text)| PageSection {
            heading: &chart.symbol,
            body: match chart.outcome {
                ChartOutcome::Rendered { .. } => SectionBody::Chart(text),
                ChartOutcome::Failed { .. } => SectionBody::Error(text),
            },
        })
        .collect();

    render_page("Stock Trend Charts", &sections)
}
