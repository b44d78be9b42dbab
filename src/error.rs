/// SalesTable error types
///
/// Every transform surfaces failures to its caller through `TransformError`.
/// Dropping unrecognized state codes is not an error and never shows up here.

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransformError {
    /// A column required by a transform is absent from the input table.
    #[error("Column '{column}' not found")]
    MissingColumn { column: String },

    /// A date-like cell could not be parsed. `row` is the 0-based data row.
    #[error("Cannot parse '{value}' in column '{column}' (row {row}) as a date")]
    Parse {
        column: String,
        row: usize,
        value: String,
    },

    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("Type mismatch in column '{column}': expected {expected}, got {found}")]
    TypeMismatch {
        column: String,
        expected: String,
        found: String,
    },

    /// Malformed rows or columns while building a table.
    #[error("{0}")]
    Schema(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TransformError {
    pub(crate) fn missing(column: &str) -> Self {
        TransformError::MissingColumn {
            column: column.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TransformError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = TransformError::missing("Sale Date");
        assert_eq!(err.to_string(), "Column 'Sale Date' not found");

        let err = TransformError::Parse {
            column: "Sale Date".to_string(),
            row: 3,
            value: "yesterday".to_string(),
        };
        assert!(err.to_string().contains("'yesterday'"));
        assert!(err.to_string().contains("row 3"));

        let err = TransformError::InvalidRange {
            start: NaiveDate::from_ymd_opt(2022, 2, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2022, 1, 1).unwrap(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid date range: start 2022-02-01 is after end 2022-01-01"
        );
    }
}
