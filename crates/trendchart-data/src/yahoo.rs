//! Yahoo Finance chart API provider.

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime};
use reqwest::{header, Client, StatusCode};
use serde::Deserialize;
use trendchart_core::error::FetchError;
use trendchart_core::traits::{check_range, SeriesProvider};
use trendchart_core::types::PriceSeries;
use tracing::{debug, info};

use crate::normalize::{normalize_rows, RawRow};

/// Yahoo Finance connection settings.
#[derive(Debug, Clone)]
pub struct YahooConfig {
    pub base_url: String,
    pub user_agent: String,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for YahooConfig {
    fn default() -> Self {
        Self {
            base_url: "https://query1.finance.yahoo.com".to_string(),
            user_agent: "Mozilla/5.0 (compatible; trendchart/0.1)".to_string(),
            request_timeout_secs: 10,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartApiError>,
}

#[derive(Debug, Deserialize)]
struct ChartApiError {
    code: String,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: ChartMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
struct ChartMeta {
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<QuoteColumns>,
}

/// Column-oriented quote block; entries are null on halted days.
#[derive(Debug, Default, Deserialize)]
struct QuoteColumns {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

impl QuoteColumns {
    fn row(&self, i: usize) -> RawRow {
        let at = |col: &Vec<Option<f64>>| col.get(i).copied().flatten();
        RawRow {
            date: None,
            open: at(&self.open),
            high: at(&self.high),
            low: at(&self.low),
            close: at(&self.close),
            volume: at(&self.volume),
        }
    }
}

/// Historical daily bars from the Yahoo Finance chart endpoint.
pub struct YahooProvider {
    config: YahooConfig,
    client: Client,
}

impl YahooProvider {
    /// Create a new provider.
    pub fn new(config: YahooConfig) -> Result<Self, FetchError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_str(&config.user_agent)
                .map_err(|e| FetchError::Connection(e.to_string()))?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| FetchError::Connection(e.to_string()))?;

        Ok(Self { config, client })
    }

    fn chart_url(&self, symbol: &str) -> String {
        format!(
            "{}/v8/finance/chart/{}",
            self.config.base_url.trim_end_matches('/'),
            symbol
        )
    }
}

/// Unix seconds at midnight UTC of `date`.
fn epoch_secs(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp()
}

/// Decode a chart API payload into a series.
///
/// Timestamps mark the session open; shifting by the exchange offset before
/// taking the date keeps each bar on its local trading day.
pub fn parse_chart_response(
    symbol: &str,
    body: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<PriceSeries, FetchError> {
    let envelope: ChartEnvelope =
        serde_json::from_str(body).map_err(|e| FetchError::Parse(e.to_string()))?;

    if let Some(err) = envelope.chart.error {
        return Err(api_error(symbol, err));
    }

    let result = envelope
        .chart
        .result
        .and_then(|mut r| if r.is_empty() { None } else { Some(r.swap_remove(0)) })
        .ok_or_else(|| FetchError::NoData {
            symbol: symbol.to_string(),
        })?;

    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();
    let offset = result.meta.gmtoffset;

    let rows = result.timestamp.iter().enumerate().map(|(i, &ts)| {
        let mut row = quote.row(i);
        row.date = DateTime::from_timestamp(ts + offset, 0).map(|dt| dt.date_naive());
        row
    });

    normalize_rows(symbol, rows, start, end)
}

/// Map a non-success response to a fetch error.
///
/// Error envelopes arrive with 4xx statuses; their code wins over the
/// status line.
fn status_error(symbol: &str, status: StatusCode, body: &str) -> FetchError {
    if let Ok(envelope) = serde_json::from_str::<ChartEnvelope>(body) {
        if let Some(err) = envelope.chart.error {
            return api_error(symbol, err);
        }
    }
    if status == StatusCode::NOT_FOUND {
        FetchError::SymbolNotFound(symbol.to_string())
    } else {
        FetchError::Api(format!("{}: {}", status, body))
    }
}

fn api_error(symbol: &str, err: ChartApiError) -> FetchError {
    if err.code.eq_ignore_ascii_case("Not Found") {
        FetchError::SymbolNotFound(symbol.to_string())
    } else {
        FetchError::Api(format!(
            "{}: {}",
            err.code,
            err.description.unwrap_or_default()
        ))
    }
}

#[async_trait]
impl SeriesProvider for YahooProvider {
    async fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, FetchError> {
        check_range(start, end)?;

        let params = [
            ("period1", epoch_secs(start).to_string()),
            ("period2", epoch_secs(end + Duration::days(1)).to_string()),
            ("interval", "1d".to_string()),
            ("events", "history".to_string()),
        ];

        debug!(symbol, %start, %end, "Requesting chart data");
        let resp = self
            .client
            .get(self.chart_url(symbol))
            .query(&params)
            .send()
            .await
            .map_err(|e| FetchError::Connection(e.to_string()))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| FetchError::Connection(e.to_string()))?;

        if !status.is_success() {
            return Err(status_error(symbol, status, &text));
        }

        let series = parse_chart_response(symbol, &text, start, end)?;
        info!(symbol, bars = series.len(), "Fetched price series");
        Ok(series)
    }

    fn name(&self) -> &str {
        "Yahoo Finance"
    }
}
