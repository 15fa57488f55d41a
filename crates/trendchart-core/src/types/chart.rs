//! Derived chart overlays and the composition handed to renderers.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::PriceSeries;

/// Window of the short moving average.
pub const MA_SHORT_WINDOW: usize = 20;
/// Window of the long moving average.
pub const MA_LONG_WINDOW: usize = 50;

/// Least-squares trendline with its parallel channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendChannel {
    /// Change in fitted price per bar
    pub slope: f64,
    /// Fitted price at index 0
    pub intercept: f64,
    /// Fitted value at each index
    pub trend: Vec<f64>,
    /// Trend shifted up by the largest close deviation
    pub upper: Vec<f64>,
    /// Trend shifted down by the smallest close deviation
    pub lower: Vec<f64>,
}

impl TrendChannel {
    /// Number of points in the channel.
    pub fn len(&self) -> usize {
        self.trend.len()
    }

    /// Check if the channel is empty.
    pub fn is_empty(&self) -> bool {
        self.trend.is_empty()
    }

    /// Vertical distance between the upper and lower band.
    pub fn width(&self) -> f64 {
        match (self.upper.first(), self.lower.first()) {
            (Some(u), Some(l)) => u - l,
            _ => 0.0,
        }
    }
}

/// Moving-average series keyed by window size.
pub type MovingAverages = BTreeMap<usize, Vec<Option<f64>>>;

/// Display flags of a single-chart refresh.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartOptions {
    pub show_ma20: bool,
    pub show_ma50: bool,
}

impl ChartOptions {
    /// Create options with both averages enabled or disabled.
    pub fn new(show_ma20: bool, show_ma50: bool) -> Self {
        Self {
            show_ma20,
            show_ma50,
        }
    }

    /// Moving-average windows requested by these options.
    pub fn windows(&self) -> Vec<usize> {
        let mut windows = Vec::with_capacity(2);
        if self.show_ma20 {
            windows.push(MA_SHORT_WINDOW);
        }
        if self.show_ma50 {
            windows.push(MA_LONG_WINDOW);
        }
        windows
    }
}

/// Everything a renderer needs to draw one chart.
#[derive(Debug, Clone)]
pub struct ChartSpec<'a> {
    /// Chart title, normally the ticker
    pub title: String,
    /// Bars drawn as candlesticks
    pub series: &'a PriceSeries,
    /// Trendline and channel overlay
    pub channel: Option<&'a TrendChannel>,
    /// Moving averages to overlay
    pub moving_averages: MovingAverages,
    /// Draw the volume panel
    pub show_volume: bool,
}

impl<'a> ChartSpec<'a> {
    /// Candlesticks and volume only.
    pub fn candles(title: impl Into<String>, series: &'a PriceSeries) -> Self {
        Self {
            title: title.into(),
            series,
            channel: None,
            moving_averages: MovingAverages::new(),
            show_volume: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_windows() {
        assert!(ChartOptions::default().windows().is_empty());
        assert_eq!(ChartOptions::new(true, false).windows(), vec![20]);
        assert_eq!(ChartOptions::new(true, true).windows(), vec![20, 50]);
        assert_eq!(ChartOptions::new(false, true).windows(), vec![50]);
    }

    #[test]
    fn test_channel_width() {
        let channel = TrendChannel {
            slope: 1.0,
            intercept: 10.0,
            trend: vec![10.0, 11.0],
            upper: vec![12.0, 13.0],
            lower: vec![9.5, 10.5],
        };
        assert!((channel.width() - 2.5).abs() < 1e-12);
        assert_eq!(channel.len(), 2);
    }
}
