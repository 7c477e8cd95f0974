use serde::Serialize;
use thiserror::Error;

/// Terminal failure of one analysis call. Never accompanied by a partial result.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnalysisError {
    #[error("Insufficient data: {candles} candles supplied (minimum: {required}).")]
    InsufficientData { candles: usize, required: usize },

    #[error("Insufficient data: only {found} swing points detected (minimum: {required}).")]
    InsufficientSwings { found: usize, required: usize },

    #[error("Indeterminate structure: need 2 swing highs and 2 swing lows, found {highs} and {lows}.")]
    IndeterminateStructure { highs: usize, lows: usize },

    #[error("Invalid candles: {reason}")]
    InvalidCandles { reason: String },
}

/// Wire shape handed to collaborators: `{ "error": "..." }`.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorReport {
    pub error: String,
}

impl From<&AnalysisError> for ErrorReport {
    fn from(err: &AnalysisError) -> Self {
        Self {
            error: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_report_carries_message_verbatim() {
        let err = AnalysisError::InsufficientData {
            candles: 19,
            required: 20,
        };
        let report = ErrorReport::from(&err);
        assert_eq!(report.error, err.to_string());
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.starts_with(r#"{"error":"Insufficient data"#));
    }
}
