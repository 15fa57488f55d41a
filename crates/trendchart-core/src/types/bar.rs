//! Daily price bar and series types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::InputError;

/// One trading day's open, high, low, close and volume.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    /// Trading day
    pub date: NaiveDate,
    /// Opening price
    pub open: f64,
    /// Highest price
    pub high: f64,
    /// Lowest price
    pub low: f64,
    /// Closing price
    pub close: f64,
    /// Shares traded
    pub volume: u64,
}

impl PriceBar {
    /// Create a new bar.
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: u64) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Check if the bar is bullish (close > open).
    #[inline]
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    /// Calculate the bar's range (high - low).
    #[inline]
    pub fn range(&self) -> f64 {
        self.high - self.low
    }
}

/// Ordered daily bars for one symbol over one date range.
///
/// Dates are strictly increasing; the constructor rejects anything else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    symbol: String,
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    /// Create a series, checking that dates strictly increase.
    pub fn new(symbol: impl Into<String>, bars: Vec<PriceBar>) -> Result<Self, InputError> {
        if let Some(index) = bars
            .windows(2)
            .position(|pair| pair[1].date <= pair[0].date)
        {
            return Err(InputError::UnorderedDates { index: index + 1 });
        }

        Ok(Self {
            symbol: symbol.into(),
            bars,
        })
    }

    /// Symbol this series belongs to.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Get the number of bars.
    #[inline]
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Check if the series is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Get all bars.
    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    /// Get the first bar.
    pub fn first(&self) -> Option<&PriceBar> {
        self.bars.first()
    }

    /// Get the last bar.
    pub fn last(&self) -> Option<&PriceBar> {
        self.bars.last()
    }

    /// Extract close prices.
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// Extract volumes.
    pub fn volumes(&self) -> Vec<u64> {
        self.bars.iter().map(|b| b.volume).collect()
    }

    /// Extract trading dates.
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.bars.iter().map(|b| b.date).collect()
    }

    /// Get an iterator over the bars.
    pub fn iter(&self) -> impl Iterator<Item = &PriceBar> {
        self.bars.iter()
    }
}
