//! Core traits for trend charts.

mod indicator;
mod provider;
mod renderer;

pub use indicator::Indicator;
pub use provider::{check_range, SeriesProvider};
pub use renderer::ChartRenderer;
