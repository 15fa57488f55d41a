//! Chart request handling.
//!
//! Turns batch and single-chart requests into per-symbol outcomes by
//! fetching a series, fitting a trend channel and rendering the chart.

mod request;
mod response;
mod service;

pub use request::{normalize_symbol, BatchEntry, BatchRequest, UpdateRequest, MAX_BATCH_SYMBOLS};
pub use response::{BatchResponse, ChartOutcome, SymbolChart, UpdateResponse, ERROR_PREFIX};
pub use service::{ChartService, ServiceConfig};
