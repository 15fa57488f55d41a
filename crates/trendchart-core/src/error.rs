//! Error types for the chart pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Top-level chart pipeline error.
#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] InputError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ChartError {
    /// Classify the error for callers that report it per symbol.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ChartError::InvalidInput(_) => ErrorKind::InvalidInput,
            ChartError::Fetch(_) => ErrorKind::Fetch,
            ChartError::Render(_) => ErrorKind::Render,
            ChartError::Config(_) | ChartError::Io(_) | ChartError::Internal(_) => {
                ErrorKind::Internal
            }
        }
    }
}

/// Structured error discriminant carried in responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidInput,
    Fetch,
    Render,
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::InvalidInput => "invalid_input",
            ErrorKind::Fetch => "fetch",
            ErrorKind::Render => "render",
            ErrorKind::Internal => "internal",
        };
        write!(f, "{}", s)
    }
}

/// Malformed arguments to the estimator, augmenter or request parsing.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    #[error("series is empty, at least one point is required")]
    EmptySeries,

    #[error("length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("window must be positive, got {0}")]
    InvalidWindow(usize),

    #[error("non-finite value at index {index}")]
    NonFinite { index: usize },

    #[error("dates must be strictly increasing (index {index})")]
    UnorderedDates { index: usize },

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// Series provider errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    #[error("symbol not found: {0}")]
    SymbolNotFound(String),

    #[error("no data available for {symbol} in the requested range")]
    NoData { symbol: String },

    #[error("empty date range: {start} is after {end}")]
    EmptyRange { start: String, end: String },

    #[error("fetch for {symbol} timed out after {millis}ms")]
    Timeout { symbol: String, millis: u64 },

    #[error("connection error: {0}")]
    Connection(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("parse error: {0}")]
    Parse(String),
}

/// Chart serialization errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("cannot render an empty series")]
    EmptySeries,

    #[error("{series} has {actual} points, expected {expected}")]
    LengthMismatch {
        series: String,
        expected: usize,
        actual: usize,
    },

    #[error("serialization failed: {0}")]
    Serialization(String),
}

/// Result type alias for chart operations.
pub type ChartResult<T> = Result<T, ChartError>;
