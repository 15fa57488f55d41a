//! Candlestick and channel chart markup.
//!
//! [`PlotlyRenderer`] turns a [`ChartSpec`](trendchart_core::types::ChartSpec)
//! into a two-panel figure: candlesticks with trendline, channel and moving
//! averages on top, volume underneath. [`render_page`] wraps several of those
//! fragments into a standalone HTML document.

mod page;
mod plotly;

pub use page::{escape_html, render_page, PageSection, SectionBody};
pub use plotly::{element_id, PlotlyRenderer, RenderSettings};
