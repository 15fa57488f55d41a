//! Core data types for trend charts.

mod bar;
mod chart;

pub use bar::{PriceBar, PriceSeries};
pub use chart::{
    ChartOptions, ChartSpec, MovingAverages, TrendChannel, MA_LONG_WINDOW, MA_SHORT_WINDOW,
};
