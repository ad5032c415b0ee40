// file: src/error.rs
// description: Custom error types and result type aliases
// reference: https://docs.rs/thiserror

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TriageError>;

#[derive(Error, Debug)]
pub enum TriageError {
    #[error("CSV file is empty or contains only headers")]
    EmptyInput,

    #[error("Missing required columns: {}", missing.join(", "))]
    Schema { missing: Vec<String> },

    #[error("API key not found. Please set your API key")]
    MissingCredential,

    #[error("API error: {0}")]
    Endpoint(String),

    #[error("Failed to parse classification response: {0}")]
    MalformedResponse(String),

    #[error("No valid messages found in the CSV file ({skipped} rows skipped)")]
    NoValidMessages { skipped: usize },

    #[error("Malformed row at line {line}: {reason}")]
    MalformedRow { line: usize, reason: String },

    #[error("Ingestion cancelled")]
    Cancelled,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for TriageError {
    fn from(err: serde_json::Error) -> Self {
        TriageError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_error_lists_every_column() {
        let err = TriageError::Schema {
            missing: vec!["subject".to_string(), "datetime".to_string()],
        };
        assert_eq!(err.to_string(), "Missing required columns: subject, datetime");
    }

    #[test]
    fn test_no_valid_messages_reports_skipped() {
        let err = TriageError::NoValidMessages { skipped: 3 };
        assert!(err.to_string().contains("3 rows skipped"));
    }
}
