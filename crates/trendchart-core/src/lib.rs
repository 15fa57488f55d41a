//! Core types and traits for trend charts.
//!
//! This crate provides the foundational building blocks including:
//! - Market data types (PriceBar, PriceSeries)
//! - Chart overlays (TrendChannel, MovingAverages) and the ChartSpec handed to renderers
//! - Error kinds shared by every stage of the pipeline
//! - Traits for indicators, series providers and chart renderers

pub mod types;
pub mod traits;
pub mod error;

pub use error::{ChartError, ChartResult, ErrorKind, FetchError, InputError, RenderError};
pub use types::*;
pub use traits::*;
