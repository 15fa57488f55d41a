//! Series provider trait definition.

use crate::error::FetchError;
use crate::types::PriceSeries;
use async_trait::async_trait;
use chrono::NaiveDate;

/// Source of historical daily bars.
///
/// Implementations normalize whatever shape their vendor returns into a
/// [`PriceSeries`]; callers never see provider-specific layouts.
#[async_trait]
pub trait SeriesProvider: Send + Sync {
    /// Fetch daily bars.
    ///
    /// # Arguments
    /// * `symbol` - Ticker to fetch
    /// * `start` - First trading day of the range (inclusive)
    /// * `end` - Last trading day of the range (inclusive)
    ///
    /// # Returns
    /// A non-empty series ordered from oldest to newest, or an error for
    /// unknown symbols, empty ranges and transport failures
    async fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, FetchError>;

    /// Get the provider name.
    fn name(&self) -> &str;
}

/// Reject ranges whose start falls after their end.
pub fn check_range(start: NaiveDate, end: NaiveDate) -> Result<(), FetchError> {
    if start > end {
        return Err(FetchError::EmptyRange {
            start: start.to_string(),
            end: end.to_string(),
        });
    }
    Ok(())
}
