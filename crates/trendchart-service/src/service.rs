//! Fetch, analyze and render pipeline.

use chrono::{Duration as DateDuration, NaiveDate, Utc};
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use trendchart_core::error::{ChartError, ChartResult, FetchError};
use trendchart_core::traits::{ChartRenderer, SeriesProvider};
use trendchart_core::types::{ChartOptions, ChartSpec, PriceSeries};
use trendchart_indicators::{moving_averages, trend_channel};
use tracing::{info, instrument, warn};

use crate::request::{BatchEntry, BatchRequest, UpdateRequest};
use crate::response::{BatchResponse, ChartOutcome, SymbolChart, UpdateResponse};

/// Pipeline settings.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Upper bound on one symbol's fetch
    pub fetch_timeout: Duration,
    /// Calendar days of history charted by default
    pub lookback_days: i64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            fetch_timeout: Duration::from_secs(15),
            lookback_days: 365,
        }
    }
}

/// Handles chart requests against one provider and renderer.
///
/// Holds no per-request state; every call fetches and computes afresh.
pub struct ChartService {
    provider: Arc<dyn SeriesProvider>,
    renderer: Arc<dyn ChartRenderer>,
    config: ServiceConfig,
}

impl ChartService {
    /// Create a new service.
    pub fn new(
        provider: Arc<dyn SeriesProvider>,
        renderer: Arc<dyn ChartRenderer>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            provider,
            renderer,
            config,
        }
    }

    /// Default range: the trailing `lookback_days` ending today.
    pub fn default_range(&self) -> (NaiveDate, NaiveDate) {
        let end = Utc::now().date_naive();
        (end - DateDuration::days(self.config.lookback_days), end)
    }

    /// Fetch a series, converting timeout expiry into a fetch failure.
    pub async fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, FetchError> {
        match timeout(self.config.fetch_timeout, self.provider.fetch(symbol, start, end)).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout {
                symbol: symbol.to_string(),
                millis: self.config.fetch_timeout.as_millis() as u64,
            }),
        }
    }

    /// Trendline, channel and requested averages rendered for one series.
    pub fn compose(&self, series: &PriceSeries, options: ChartOptions) -> ChartResult<String> {
        let closes = series.closes();
        let channel = trend_channel(&closes)?;
        let averages = moving_averages(&closes, &options.windows())?;

        let spec = ChartSpec {
            title: series.symbol().to_string(),
            series,
            channel: Some(&channel),
            moving_averages: averages,
            show_volume: true,
        };
        Ok(self.renderer.render(&spec)?)
    }

    /// Full analysis chart over the default range.
    #[instrument(skip(self), fields(provider = self.provider.name()))]
    pub async fn create_chart(&self, symbol: &str, options: ChartOptions) -> ChartResult<String> {
        let (start, end) = self.default_range();
        let series = self.fetch(symbol, start, end).await?;
        self.compose(&series, options)
    }

    /// Candlesticks and volume only, over an explicit range.
    #[instrument(skip(self))]
    pub async fn create_candles(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ChartResult<String> {
        let series = self.fetch(symbol, start, end).await?;
        let spec = ChartSpec::candles(symbol, &series);
        Ok(self.renderer.render(&spec)?)
    }

    /// Chart every symbol of a batch; a failure stays in its own slot.
    pub async fn handle_batch(&self, request: &BatchRequest) -> BatchResponse {
        let jobs = request.entries().iter().map(|entry| async move {
            let result = match entry {
                BatchEntry::Symbol(symbol) => {
                    self.create_chart(symbol, ChartOptions::default()).await
                }
                BatchEntry::Rejected { error, .. } => Err(ChartError::from(error.clone())),
            };
            let outcome = ChartOutcome::from_result(result);
            if let ChartOutcome::Failed { kind, message } = &outcome {
                warn!(symbol = %entry.label(), %kind, "Chart failed: {}", message);
            }
            SymbolChart {
                symbol: entry.label().to_string(),
                outcome,
            }
        });

        let response = BatchResponse {
            charts: join_all(jobs).await,
        };
        info!(
            rendered = response.success_count(),
            failed = response.failure_count(),
            "Batch complete"
        );
        response
    }

    /// Re-render one symbol with the requested overlays.
    pub async fn handle_update(&self, request: &UpdateRequest) -> UpdateResponse {
        let result = self.create_chart(&request.symbol, request.options).await;
        let outcome = ChartOutcome::from_result(result);
        if let ChartOutcome::Failed { kind, message } = &outcome {
            warn!(symbol = %request.symbol, %kind, "Chart update failed: {}", message);
        }
        outcome.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use trendchart_core::error::{ErrorKind, RenderError};
    use trendchart_core::types::PriceBar;
    use trendchart_render::PlotlyRenderer;

    struct MockProvider {
        closes: HashMap<String, Vec<f64>>,
        delay: Option<Duration>,
    }

    impl MockProvider {
        fn new(entries: &[(&str, Vec<f64>)]) -> Self {
            Self {
                closes: entries
                    .iter()
                    .map(|(s, c)| (s.to_string(), c.clone()))
                    .collect(),
                delay: None,
            }
        }
    }

    #[async_trait]
    impl SeriesProvider for MockProvider {
        async fn fetch(
            &self,
            symbol: &str,
            start: NaiveDate,
            _end: NaiveDate,
        ) -> Result<PriceSeries, FetchError> {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            let closes = self
                .closes
                .get(symbol)
                .ok_or_else(|| FetchError::SymbolNotFound(symbol.to_string()))?;
            let bars = closes
                .iter()
                .enumerate()
                .map(|(i, &c)| {
                    let date = start + DateDuration::days(i as i64);
                    PriceBar::new(date, c, c + 1.0, c - 1.0, c, 1_000)
                })
                .collect();
            PriceSeries::new(symbol, bars).map_err(|e| FetchError::Parse(e.to_string()))
        }

        fn name(&self) -> &str {
            "mock"
        }
    }

    struct FailingRenderer;

    impl ChartRenderer for FailingRenderer {
        fn render(&self, _spec: &ChartSpec<'_>) -> Result<String, RenderError> {
            Err(RenderError::Serialization("broken".into()))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    fn service(provider: MockProvider) -> ChartService {
        ChartService::new(
            Arc::new(provider),
            Arc::new(PlotlyRenderer::default()),
            ServiceConfig::default(),
        )
    }

    fn closes(n: usize) -> Vec<f64> {
        (0..n).map(|i| 100.0 + (i as f64 * 0.3).sin() * 5.0).collect()
    }

    #[tokio::test]
    async fn test_batch_isolates_failures() {
        let svc = service(MockProvider::new(&[("AAPL", closes(60))]));
        let request = BatchRequest::new(["AAPL", "ZZZZINVALID"]).unwrap();

        let response = svc.handle_batch(&request).await;

        assert_eq!(response.charts.len(), 2);
        assert_eq!(response.charts[0].symbol, "AAPL");
        assert_eq!(response.charts[1].symbol, "ZZZZINVALID");

        let aapl = response.get("AAPL").unwrap();
        assert!(aapl.is_success());
        assert!(aapl.display_text().contains("chart-AAPL"));

        match response.get("ZZZZINVALID").unwrap() {
            ChartOutcome::Failed { kind, message } => {
                assert_eq!(*kind, ErrorKind::Fetch);
                assert!(message.contains("ZZZZINVALID"));
            }
            other => panic!("expected failure, got {:?}", other),
        }
        assert!(response
            .get("ZZZZINVALID")
            .unwrap()
            .display_text()
            .starts_with("Error: "));
    }

    #[tokio::test]
    async fn test_batch_malformed_symbol_keeps_others() {
        let svc = service(MockProvider::new(&[("AAPL", closes(40))]));
        let request = BatchRequest::new(["AAPL", "BRK/B"]).unwrap();

        let response = svc.handle_batch(&request).await;

        assert_eq!(response.charts.len(), 2);
        assert!(response.get("AAPL").unwrap().is_success());
        match response.get("BRK/B").unwrap() {
            ChartOutcome::Failed { kind, message } => {
                assert_eq!(*kind, ErrorKind::InvalidInput);
                assert!(message.contains("BRK/B"));
            }
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_update_with_moving_averages() {
        let svc = service(MockProvider::new(&[("TSLA", closes(80))]));
        let request = UpdateRequest::new("tsla", ChartOptions::new(true, true)).unwrap();

        let response = svc.handle_update(&request).await;

        assert!(response.success);
        let chart = response.chart.unwrap();
        assert!(chart.contains("20-day MA"));
        assert!(chart.contains("50-day MA"));
        assert!(chart.contains("Upper Channel"));
    }

    #[tokio::test]
    async fn test_update_failure_is_not_success() {
        let svc = service(MockProvider::new(&[]));
        let request = UpdateRequest::new("NOPE", ChartOptions::default()).unwrap();

        let response = svc.handle_update(&request).await;

        assert!(!response.success);
        assert!(response.chart.is_none());
        assert_eq!(response.kind, Some(ErrorKind::Fetch));
        assert!(response.error.unwrap().starts_with("Error: "));
    }

    #[tokio::test]
    async fn test_short_series_without_averages() {
        // Fewer bars than either window still renders, averages are all null
        let svc = service(MockProvider::new(&[("NEW", closes(5))]));
        let chart = svc
            .create_chart("NEW", ChartOptions::new(true, true))
            .await
            .unwrap();
        assert!(chart.contains("20-day MA"));
    }

    #[tokio::test]
    async fn test_fetch_timeout() {
        let mut provider = MockProvider::new(&[("SLOW", closes(10))]);
        provider.delay = Some(Duration::from_secs(5));
        let svc = ChartService::new(
            Arc::new(provider),
            Arc::new(PlotlyRenderer::default()),
            ServiceConfig {
                fetch_timeout: Duration::from_millis(20),
                ..ServiceConfig::default()
            },
        );

        let err = svc
            .create_chart("SLOW", ChartOptions::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Fetch);
        assert!(err.to_string().contains("timed out after 20ms"), "{}", err);
    }

    #[tokio::test]
    async fn test_render_failure_is_isolated() {
        let svc = ChartService::new(
            Arc::new(MockProvider::new(&[("AAPL", closes(30)), ("MSFT", closes(30))])),
            Arc::new(FailingRenderer),
            ServiceConfig::default(),
        );
        let request = BatchRequest::new(["AAPL", "MSFT"]).unwrap();

        let response = svc.handle_batch(&request).await;

        assert_eq!(response.failure_count(), 2);
        assert!(response.charts.iter().all(|c| matches!(
            c.outcome,
            ChartOutcome::Failed {
                kind: ErrorKind::Render,
                ..
            }
        )));
    }

    #[tokio::test]
    async fn test_candles_chart() {
        let svc = service(MockProvider::new(&[("TSLA", closes(10))]));
        let start = NaiveDate::from_ymd_opt(2024, 12, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();

        let chart = svc.create_candles("TSLA", start, end).await.unwrap();
        assert!(chart.contains("candlestick"));
        assert!(!chart.contains("Trendline"));
    }

    #[test]
    fn test_default_range() {
        let svc = service(MockProvider::new(&[]));
        let (start, end) = svc.default_range();
        assert_eq!((end - start).num_days(), 365);
    }
}
