//! Logging setup for the chart service.

mod logging;

pub use logging::{setup_logging, LogGuard};
