//! Per-symbol results returned to callers.

use serde::{Deserialize, Serialize};
use trendchart_core::error::{ChartError, ErrorKind};

/// Prefix marking failure text shown in place of a chart.
pub const ERROR_PREFIX: &str = "Error: ";

/// Result of one symbol's pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ChartOutcome {
    Rendered { markup: String },
    Failed { kind: ErrorKind, message: String },
}

impl ChartOutcome {
    /// Convert a pipeline result, keeping the error's kind.
    pub fn from_result(result: Result<String, ChartError>) -> Self {
        match result {
            Ok(markup) => ChartOutcome::Rendered { markup },
            Err(e) => ChartOutcome::Failed {
                kind: e.kind(),
                message: e.to_string(),
            },
        }
    }

    /// Check if a chart was rendered.
    pub fn is_success(&self) -> bool {
        matches!(self, ChartOutcome::Rendered { .. })
    }

    /// Markup on success, prefixed error text on failure.
    pub fn display_text(&self) -> String {
        match self {
            ChartOutcome::Rendered { markup } => markup.clone(),
            ChartOutcome::Failed { message, .. } => format!("{}{}", ERROR_PREFIX, message),
        }
    }
}

/// One slot of a batch response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolChart {
    pub symbol: String,
    #[serde(flatten)]
    pub outcome: ChartOutcome,
}

/// Results of a batch submission, in submission order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchResponse {
    pub charts: Vec<SymbolChart>,
}

impl BatchResponse {
    /// Look up the entry for a symbol.
    pub fn get(&self, symbol: &str) -> Option<&ChartOutcome> {
        self.charts
            .iter()
            .find(|c| c.symbol == symbol)
            .map(|c| &c.outcome)
    }

    /// Number of symbols that rendered.
    pub fn success_count(&self) -> usize {
        self.charts.iter().filter(|c| c.outcome.is_success()).count()
    }

    /// Number of symbols that failed.
    pub fn failure_count(&self) -> usize {
        self.charts.len() - self.success_count()
    }
}

/// Reply to a single-chart refresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<ErrorKind>,
}

impl From<ChartOutcome> for UpdateResponse {
    fn from(outcome: ChartOutcome) -> Self {
        match outcome {
            ChartOutcome::Rendered { markup } => Self {
                success: true,
                chart: Some(markup),
                error: None,
                kind: None,
            },
            ChartOutcome::Failed { kind, message } => Self {
                success: false,
                chart: None,
                error: Some(format!("{}{}", ERROR_PREFIX, message)),
                kind: Some(kind),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trendchart_core::error::FetchError;

    #[test]
    fn test_outcome_from_error() {
        let outcome =
            ChartOutcome::from_result(Err(FetchError::SymbolNotFound("ZZZZ".into()).into()));

        assert!(!outcome.is_success());
        assert_eq!(
            outcome.display_text(),
            "Error: Fetch error: symbol not found: ZZZZ"
        );
        assert!(matches!(outcome, ChartOutcome::Failed { kind: ErrorKind::Fetch, .. }));
    }

    #[test]
    fn test_update_response_json() {
        let ok: UpdateResponse = ChartOutcome::Rendered {
            markup: "<div></div>".into(),
        }
        .into();
        let json = serde_json::to_value(&ok).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["chart"], "<div></div>");
        assert!(json.get("error").is_none());

        let failed: UpdateResponse = ChartOutcome::Failed {
            kind: ErrorKind::Render,
            message: "boom".into(),
        }
        .into();
        let json = serde_json::to_value(&failed).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Error: boom");
        assert_eq!(json["kind"], "render");
        assert!(json.get("chart").is_none());
    }

    #[test]
    fn test_batch_response_json_is_tagged() {
        let response = BatchResponse {
            charts: vec![SymbolChart {
                symbol: "AAPL".into(),
                outcome: ChartOutcome::Rendered {
                    markup: "<div></div>".into(),
                },
            }],
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["charts"][0]["symbol"], "AAPL");
        assert_eq!(json["charts"][0]["status"], "rendered");
        assert_eq!(response.success_count(), 1);
        assert_eq!(response.failure_count(), 0);
    }
}
