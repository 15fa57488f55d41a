//! Trendline, price channel and moving average calculations.
//!
//! All functions take closing prices ordered oldest to newest and return
//! output aligned with the input, one value per bar:
//! - Least-squares trendline and its parallel channel
//! - Simple moving averages with undefined leading values

pub mod moving_average;
pub mod trend;

pub use moving_average::{moving_averages, rolling_mean, Sma};
pub use trend::{channel_bands, fit_trend, linear_fit, trend_channel, LinearTrend};
