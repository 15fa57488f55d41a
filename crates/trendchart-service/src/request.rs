//! Inbound chart requests.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use trendchart_core::error::InputError;
use trendchart_core::types::ChartOptions;

/// Most symbols accepted in one batch submission.
pub const MAX_BATCH_SYMBOLS: usize = 5;

const MAX_SYMBOL_LEN: usize = 16;

/// Trim and uppercase a ticker; blank input yields `None`.
pub fn normalize_symbol(raw: &str) -> Result<Option<String>, InputError> {
    let symbol = raw.trim();
    if symbol.is_empty() {
        return Ok(None);
    }
    if symbol.len() > MAX_SYMBOL_LEN {
        return Err(InputError::InvalidRequest(format!(
            "symbol longer than {} characters",
            MAX_SYMBOL_LEN
        )));
    }
    if !symbol
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^' | '='))
    {
        return Err(InputError::InvalidRequest(format!(
            "invalid symbol: {}",
            symbol
        )));
    }
    Ok(Some(symbol.to_ascii_uppercase()))
}

/// One slot of a batch submission.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchEntry {
    /// A normalized symbol to chart
    Symbol(String),
    /// Input that is not a valid symbol, reported in its own slot
    Rejected { input: String, error: InputError },
}

impl BatchEntry {
    /// Symbol as shown in the response: normalized, or the trimmed input.
    pub fn label(&self) -> &str {
        match self {
            BatchEntry::Symbol(symbol) => symbol,
            BatchEntry::Rejected { input, .. } => input,
        }
    }
}

/// Several symbols charted with default options.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchRequest {
    entries: Vec<BatchEntry>,
}

impl BatchRequest {
    /// Build a batch, skipping blanks and repeated symbols.
    ///
    /// A malformed symbol does not fail the batch; it becomes a rejected
    /// entry. Only more than [`MAX_BATCH_SYMBOLS`] entries is an error.
    pub fn new<I, S>(symbols: I) -> Result<Self, InputError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut entries: Vec<BatchEntry> = Vec::new();
        for raw in symbols {
            let entry = match normalize_symbol(raw.as_ref()) {
                Ok(Some(symbol)) => BatchEntry::Symbol(symbol),
                Ok(None) => continue,
                Err(error) => BatchEntry::Rejected {
                    input: raw.as_ref().trim().to_string(),
                    error,
                },
            };
            if !entries.iter().any(|e| e.label() == entry.label()) {
                entries.push(entry);
            }
        }

        if entries.len() > MAX_BATCH_SYMBOLS {
            return Err(InputError::InvalidRequest(format!(
                "at most {} symbols per batch, got {}",
                MAX_BATCH_SYMBOLS,
                entries.len()
            )));
        }
        Ok(Self { entries })
    }

    /// Read the `stock1` .. `stock5` form fields.
    pub fn from_form(form: &HashMap<String, String>) -> Result<Self, InputError> {
        let fields = (1..=MAX_BATCH_SYMBOLS).filter_map(|i| form.get(&format!("stock{}", i)));
        Self::new(fields)
    }

    /// Entries in submission order.
    pub fn entries(&self) -> &[BatchEntry] {
        &self.entries
    }

    /// Valid symbols in submission order.
    pub fn symbols(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter_map(|e| match e {
                BatchEntry::Symbol(symbol) => Some(symbol.as_str()),
                BatchEntry::Rejected { .. } => None,
            })
            .collect()
    }

    /// Check if no symbol was submitted.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One symbol re-rendered with display flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateRequest {
    pub symbol: String,
    pub options: ChartOptions,
}

impl UpdateRequest {
    /// Create a request for a single symbol.
    pub fn new(symbol: &str, options: ChartOptions) -> Result<Self, InputError> {
        let symbol = normalize_symbol(symbol)?
            .ok_or_else(|| InputError::InvalidRequest("ticker is required".to_string()))?;
        Ok(Self { symbol, options })
    }

    /// Read the `ticker`, `show_ma20` and `show_ma50` form fields.
    ///
    /// A flag is enabled only by the exact value `"true"`.
    pub fn from_form(form: &HashMap<String, String>) -> Result<Self, InputError> {
        let flag = |name: &str| form.get(name).map(|v| v == "true").unwrap_or(false);
        let ticker = form.get("ticker").map(String::as_str).unwrap_or_default();

        Self::new(ticker, ChartOptions::new(flag("show_ma20"), flag("show_ma50")))
    }
}
