//! Error types for the excelbind library

use thiserror::Error;

/// Result type alias for excelbind operations
pub type Result<T> = std::result::Result<T, ExcelError>;

/// Main error type for all record/sheet marshaling operations
#[derive(Error, Debug)]
pub enum ExcelError {
    /// Malformed column label or address token
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// Row or column coordinate outside the 1-based grid
    #[error("Invalid cell reference: {0}")]
    InvalidCell(String),

    /// Configuration rejected when it was built
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// One or more field validators failed for a row that has data
    #[error("{}", messages.join("\n"))]
    ValidationFailed { row: u32, messages: Vec<String> },

    /// Cell text could not be converted to the field's declared type
    #[error("Assignment failure at row {row}, column {column}, value '{text}': {source}")]
    CoercionFailed {
        row: u32,
        column: String,
        text: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Picture payload could not be decoded
    #[error("Image error: {0}")]
    ImageError(String),

    /// IO error wrapper
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Requested output format is not recognized by a collaborator
    #[error("Conversion not supported: {0}")]
    UnsupportedConversion(String),

    /// Failure reported by a sheet implementation
    #[error("Sheet error: {0}")]
    SheetError(String),
}

impl From<regex::Error> for ExcelError {
    fn from(err: regex::Error) -> Self {
        ExcelError::InvalidConfig(err.to_string())
    }
}

impl From<image::ImageError> for ExcelError {
    fn from(err: image::ImageError) -> Self {
        ExcelError::ImageError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_failed_joins_messages() {
        let err = ExcelError::ValidationFailed {
            row: 3,
            messages: vec!["first".to_string(), "second".to_string()],
        };
        assert_eq!(err.to_string(), "first\nsecond");
    }

    #[test]
    fn test_coercion_failed_keeps_source() {
        let cause = "abc".parse::<i64>().unwrap_err();
        let err = ExcelError::CoercionFailed {
            row: 4,
            column: "B".to_string(),
            text: "abc".to_string(),
            source: Box::new(cause),
        };
        let msg = err.to_string();
        assert!(msg.contains("row 4"));
        assert!(msg.contains("column B"));
        assert!(msg.contains("'abc'"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
