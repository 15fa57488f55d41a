//! Conversion of vendor rows into a canonical price series.

use chrono::NaiveDate;
use std::collections::BTreeMap;
use trendchart_core::error::FetchError;
use trendchart_core::types::{PriceBar, PriceSeries};
use tracing::debug;

/// One row as a vendor reports it; any price field may be missing.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RawRow {
    pub date: Option<NaiveDate>,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<f64>,
}

impl RawRow {
    fn into_bar(self) -> Option<PriceBar> {
        let date = self.date?;
        let open = positive(self.open)?;
        let high = positive(self.high)?;
        let low = positive(self.low)?;
        let close = positive(self.close)?;
        let volume = self
            .volume
            .filter(|v| v.is_finite() && *v >= 0.0)
            .map(|v| v.round() as u64)
            .unwrap_or(0);

        Some(PriceBar::new(date, open, high, low, close, volume))
    }
}

/// Prices must be finite and above zero.
fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

/// Build a series from vendor rows restricted to `[start, end]`.
///
/// Incomplete rows and rows with a non-positive price are dropped, rows are ordered by date and a repeated
/// date keeps the row reported last.
pub fn normalize_rows(
    symbol: &str,
    rows: impl IntoIterator<Item = RawRow>,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<PriceSeries, FetchError> {
    let mut by_date = BTreeMap::new();
    let mut dropped = 0usize;

    for row in rows {
        match row.into_bar() {
            Some(bar) if bar.date >= start && bar.date <= end => {
                by_date.insert(bar.date, bar);
            }
            Some(_) => {}
            None => dropped += 1,
        }
    }

    if dropped > 0 {
        debug!(symbol, dropped, "Dropped incomplete rows");
    }

    if by_date.is_empty() {
        return Err(FetchError::NoData {
            symbol: symbol.to_string(),
        });
    }

    PriceSeries::new(symbol, by_date.into_values().collect())
        .map_err(|e| FetchError::Parse(e.to_string()))
}
