// Error types
//
// Exactly two user-facing error kinds exist:
// - DataError: fatal at startup, the process cannot train without a dataset
// - InputError: local to a single predict request, surfaced in the TUI
//   status line without terminating the session

use thiserror::Error;

/// Fatal dataset errors. Any of these prevents the application from starting.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to read dataset at {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("dataset is missing the '{0}' label column")]
    MissingLabelColumn(String),

    #[error("dataset has no feature columns besides the label")]
    NoFeatureColumns,

    #[error("dataset has no data rows")]
    Empty,

    #[error("non-numeric value '{value}' in column '{column}' at data row {row}")]
    NonNumericValue {
        column: String,
        row: usize,
        value: String,
    },

    #[error("label '{value}' at data row {row} is not binary (expected 0 or 1)")]
    NonBinaryLabel { row: usize, value: String },

    #[error("row {row} has {actual} fields, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },
}

/// Recoverable errors for a single predict request.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("field '{field}' contains non-numeric value '{value}'")]
    NotNumeric { field: String, value: String },

    #[error("expected {expected} field values, got {actual}")]
    FieldCountMismatch { expected: usize, actual: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_error_names_the_field() {
        let err = InputError::NotNumeric {
            field: "V14".to_string(),
            value: "abc".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("V14"));
        assert!(msg.contains("abc"));
    }

    #[test]
    fn test_data_error_names_the_label_column() {
        let err = DataError::MissingLabelColumn("Class".to_string());
        assert!(err.to_string().contains("Class"));
    }
}
