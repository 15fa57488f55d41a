//! CSV directory provider.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord};
use std::path::{Path, PathBuf};
use trendchart_core::error::FetchError;
use trendchart_core::traits::{check_range, SeriesProvider};
use trendchart_core::types::PriceSeries;
use tracing::{debug, info};

use crate::normalize::{normalize_rows, RawRow};

/// Column positions resolved from the header row.
#[derive(Debug, Default)]
struct Columns {
    date: Option<usize>,
    open: Option<usize>,
    high: Option<usize>,
    low: Option<usize>,
    close: Option<usize>,
    adj_close: Option<usize>,
    volume: Option<usize>,
}

impl Columns {
    fn from_header(header: &StringRecord) -> Self {
        let mut cols = Columns::default();
        for (i, name) in header.iter().enumerate() {
            match name.trim().to_ascii_lowercase().as_str() {
                // Exports with a two-level header label the index column "Price"
                "date" | "timestamp" | "datetime" | "price" => cols.date = Some(i),
                "open" => cols.open = Some(i),
                "high" => cols.high = Some(i),
                "low" => cols.low = Some(i),
                "close" => cols.close = Some(i),
                "adj close" | "adj_close" => cols.adj_close = Some(i),
                "volume" => cols.volume = Some(i),
                _ => {}
            }
        }
        if cols.date.is_none() && !header.is_empty() {
            cols.date = Some(0);
        }
        cols
    }

    fn close(&self) -> Option<usize> {
        self.close.or(self.adj_close)
    }
}

/// Reads `{symbol}.csv` files from a directory.
pub struct CsvSeriesProvider {
    data_dir: PathBuf,
}

impl CsvSeriesProvider {
    /// Create a provider over an existing directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Result<Self, FetchError> {
        let data_dir = data_dir.into();
        if !data_dir.is_dir() {
            return Err(FetchError::Connection(format!(
                "data directory '{}' does not exist",
                data_dir.display()
            )));
        }
        Ok(Self { data_dir })
    }

    /// Find the file for a symbol, trying common naming variants.
    fn locate(&self, symbol: &str) -> Option<PathBuf> {
        let upper = symbol.to_uppercase();
        let lower = symbol.to_lowercase();
        [
            format!("{}.csv", upper),
            format!("{}.csv", lower),
            format!("{}_daily.csv", upper),
            format!("{}_daily.csv", lower),
        ]
        .into_iter()
        .map(|name| self.data_dir.join(name))
        .find(|path| path.is_file())
    }
}

/// Load every row of a CSV file.
///
/// Header rows after the first (`Ticker,...` and `Date,,,` in multi-level
/// exports) are skipped, which flattens the header to its first level.
pub fn load_rows(path: &Path) -> Result<Vec<RawRow>, FetchError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|e| FetchError::Parse(e.to_string()))?;

    let header = reader
        .headers()
        .map_err(|e| FetchError::Parse(e.to_string()))?
        .clone();
    let cols = Columns::from_header(&header);

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| FetchError::Parse(e.to_string()))?;
        if is_level_row(&record) {
            continue;
        }

        let field = |idx: Option<usize>| idx.and_then(|i| record.get(i)).map(str::trim);
        let number = |idx: Option<usize>| field(idx).and_then(|v| v.parse::<f64>().ok());

        // An unreadable date drops the row, like a missing price does
        let date = field(cols.date).and_then(|raw| parse_date(raw).ok());

        rows.push(RawRow {
            date,
            open: number(cols.open),
            high: number(cols.high),
            low: number(cols.low),
            close: number(cols.close()),
            volume: number(cols.volume),
        });
    }

    debug!(path = %path.display(), rows = rows.len(), "Loaded CSV rows");
    Ok(rows)
}

fn is_level_row(record: &StringRecord) -> bool {
    let first = record.get(0).map(str::trim).unwrap_or_default();
    let rest_blank = record.iter().skip(1).all(|v| v.trim().is_empty());
    first.eq_ignore_ascii_case("ticker") || (first.eq_ignore_ascii_case("date") && rest_blank)
}

/// Parse various date formats.
fn parse_date(date_str: &str) -> Result<NaiveDate, FetchError> {
    let formats = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%m-%Y"];
    for format in formats {
        if let Ok(d) = NaiveDate::parse_from_str(date_str, format) {
            return Ok(d);
        }
    }

    // Any UTC offset is ignored; only the calendar date matters
    let datetime_formats = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M:%S%:z"];
    for format in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(date_str, format) {
            return Ok(dt.date());
        }
    }

    Err(FetchError::Parse(format!("Could not parse date: {}", date_str)))
}

#[async_trait]
impl SeriesProvider for CsvSeriesProvider {
    async fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, FetchError> {
        check_range(start, end)?;

        let path = self
            .locate(symbol)
            .ok_or_else(|| FetchError::SymbolNotFound(symbol.to_string()))?;

        let rows = tokio::task::spawn_blocking(move || load_rows(&path))
            .await
            .map_err(|e| FetchError::Connection(e.to_string()))??;

        let series = normalize_rows(symbol, rows, start, end)?;
        info!(symbol, bars = series.len(), "Loaded price series from CSV");
        Ok(series)
    }

    fn name(&self) -> &str {
        "CSV"
    }
}
