//! Single chart command implementation.

use anyhow::Result;
use trendchart_config::AppConfig;
use trendchart_core::types::ChartOptions;
use trendchart_render::{render_page, PageSection, SectionBody};
use trendchart_service::UpdateRequest;

use super::{build_service, write_page};
use crate::cli::{ChartArgs, OutputFormat};

pub async fn run(args: ChartArgs, config: &AppConfig) -> Result<()> {
    let request = UpdateRequest::new(&args.symbol, ChartOptions::new(args.ma20, args.ma50))?;
    let service = build_service(config)?;
    let response = service.handle_update(&request).await;

    if args.format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    let body = match (&response.chart, &response.error) {
        (Some(markup), _) => SectionBody::Chart(markup),
        (None, Some(error)) => SectionBody::Error(error),
        (None, None) => SectionBody::Error("Error: no chart produced"),
    };
    let page = render_page(
        &format!("{} Stock Analysis", request.symbol),
        &[PageSection {
            heading: &request.symbol,
            body,
        }],
    );
    write_page(&args.output, &page)?;

    if !response.success {
        anyhow::bail!(
            "{}",
            response.error.unwrap_or_else(|| "chart failed".to_string())
        );
    }
    Ok(())
}
