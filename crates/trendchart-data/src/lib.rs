//! Price series providers.
//!
//! Each provider turns its vendor's layout into a canonical
//! [`PriceSeries`](trendchart_core::types::PriceSeries) before returning.

mod csv_source;
mod normalize;
mod yahoo;

pub use csv_source::{load_rows, CsvSeriesProvider};
pub use normalize::{normalize_rows, RawRow};
pub use yahoo::{parse_chart_response, YahooConfig, YahooProvider};
